use std::path::Path;

use colored::Colorize;
use sprinkler_core::{Footprint, FootprintShape};

pub fn run(tiles: &Path, code: &str, variant: u32) -> Result<(), String> {
    let db = super::load_tiles(tiles)?;
    let config = db.resolve(code).map_err(|e| e.to_string())?;
    let component = config.sprinkler().map_err(|e| e.to_string())?;

    let spec = component.footprint_spec(variant);
    let footprint = Footprint::build(&spec);
    let (x, y) = spec.extents();
    let shape = match spec.shape {
        FootprintShape::Ellipse => "ellipse",
        FootprintShape::Rectangle => "rectangle",
    };

    println!(
        "  {} '{}' {}",
        "Footprint".bold(),
        code,
        format!("({shape} {x}x{y}, variant {variant})").dimmed()
    );
    if spec.axis_swapped {
        println!("  {}", "axes swapped".dimmed());
    }
    println!();
    for row in footprint.render().lines() {
        println!("  {row}");
    }
    println!();
    println!("  {} cells", footprint.len());
    println!(
        "  every {:.1}s ± {:.1}s",
        component.check_time, component.random_check_time
    );

    Ok(())
}
