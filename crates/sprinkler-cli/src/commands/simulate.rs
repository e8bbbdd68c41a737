use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use log::info;
use sprinkler_core::{EntityId, TileDatabase, Timestep};
use sprinkler_simulation::{Garden, SimConfig, SimEventKind, Simulation};

/// Longest unloaded gap accepted on the command line: one year.
const MAX_SKIP_SECONDS: f64 = 365.0 * 24.0 * 3600.0;

pub struct Options {
    pub ticks: u64,
    pub seed: u64,
    pub step: f64,
    pub skip: Option<f64>,
    pub save: Option<PathBuf>,
    pub verbose: bool,
}

pub fn run(path: &Path, opts: &Options) -> Result<(), String> {
    let scenario = super::load_scenario(path)?;
    let tiles = TileDatabase::from_document(scenario.tiles)
        .map_err(|e| format!("{}: {e}", path.display()))?;

    if scenario.sprinklers.is_empty() {
        println!("  No sprinklers in scenario. Nothing to simulate.");
        return Ok(());
    }
    if !opts.step.is_finite() || opts.step <= 0.0 {
        return Err(format!("step must be positive, got {}", opts.step));
    }
    if let Some(seconds) = opts.skip {
        if !(0.0..=MAX_SKIP_SECONDS).contains(&seconds) {
            return Err(format!(
                "skip must be between 0 and {MAX_SKIP_SECONDS} seconds, got {seconds}"
            ));
        }
    }

    let mut garden = Garden::new();
    for plot in &scenario.plots {
        garden.add_plot(*plot);
    }

    let config = SimConfig::default()
        .with_seed(opts.seed)
        .with_step(Timestep::from_seconds(opts.step))
        .with_max_events(10_000);
    let mut sim = Simulation::new(garden, tiles, config);

    let mut placed: Vec<(EntityId, String)> = Vec::new();
    for sprinkler in &scenario.sprinklers {
        let id = sim
            .place_sprinkler(&sprinkler.tile, sprinkler.location, sprinkler.variant)
            .map_err(|e| format!("cannot place '{}': {e}", sprinkler.tile))?;
        placed.push((id, sprinkler.tile.clone()));
    }

    let first_half = opts.ticks / 2;
    sim.run(first_half)
        .map_err(|e| format!("simulation error: {e}"))?;
    if let Some(seconds) = opts.skip {
        info!("garden unloaded for {seconds}s");
        sim.skip(Timestep::from_seconds(seconds));
    }
    sim.run(opts.ticks - first_half)
        .map_err(|e| format!("simulation error: {e}"))?;

    // Header
    println!(
        "  {} '{}' {}",
        "Simulation".bold(),
        path.display(),
        format!("({} ticks, seed={}, step={}s)", opts.ticks, opts.seed, opts.step).dimmed()
    );
    println!(
        "  {} sprinklers, {} plots, {} events logged",
        placed.len(),
        scenario.plots.len(),
        sim.events().len()
    );
    println!("  World time: {}", sim.clock().now());
    if let Some(seconds) = opts.skip {
        println!("  Unloaded for {seconds}s halfway through");
    }
    println!();

    // Events
    if opts.verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in sim.events().events() {
            let tick_label = format!("[tick {:>3}]", event.tick).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        if sim.events().is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    } else {
        let notable: Vec<_> = sim
            .events()
            .events()
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    SimEventKind::CatchUp { .. }
                        | SimEventKind::PeriodRollover { .. }
                        | SimEventKind::Removed { .. }
                )
            })
            .collect();
        if !notable.is_empty() {
            println!("  {}", "Notable Events".bold().underline());
            for event in &notable {
                let label = match event.kind {
                    SimEventKind::Removed { .. } => "REMOVED".red().bold(),
                    SimEventKind::PeriodRollover { .. } => "NEW DAY".blue().bold(),
                    _ => "CATCH-UP".yellow().bold(),
                };
                println!("  {label}  {}", event.description);
            }
            println!();
        }
    }

    // Sprinkler table
    println!("  {}", "Sprinklers".bold().underline());
    println!();

    let sprinklers = sim.sprinklers().map_err(|e| e.to_string())?;
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Sprinkler",
        "Tile",
        "Location",
        "Cells",
        "Visible",
        "Silent",
        "Catch-ups",
        "Status",
    ]);

    for (id, tile) in &placed {
        let (visible, silent) = sim.events().waterings_by(*id);
        let catch_ups = sim
            .events()
            .events_for_entity(*id)
            .iter()
            .filter(|e| matches!(e.kind, SimEventKind::CatchUp { .. }))
            .count();
        let (location, cells, status) = match sprinklers.get(*id) {
            Some(logic) => (
                logic.location().to_string(),
                logic.footprint().len().to_string(),
                "active".green().to_string(),
            ),
            None => ("--".to_string(), "--".to_string(), "removed".red().to_string()),
        };
        table.add_row(vec![
            id.to_string(),
            tile.clone(),
            location,
            cells,
            visible.to_string(),
            silent.to_string(),
            catch_ups.to_string(),
            status,
        ]);
    }

    println!("{table}");
    println!();

    let watered = sim.garden().plots().iter().filter(|(_, m)| *m > 0).count();
    println!(
        "  {} of {} plots watered, {} effects played",
        watered,
        scenario.plots.len(),
        sim.garden().effects().len()
    );

    if let Some(save_path) = &opts.save {
        let json = sim
            .save()
            .and_then(|save| save.to_json())
            .map_err(|e| format!("cannot build save: {e}"))?;
        fs::write(save_path, json)
            .map_err(|e| format!("cannot write {}: {e}", save_path.display()))?;
        println!("  Saved to {}", save_path.display());
    }

    Ok(())
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::Watered { visible: true, .. } => description.green(),
        SimEventKind::Watered { visible: false, .. } => description.dimmed(),
        SimEventKind::EffectTriggered { .. } => description.cyan(),
        SimEventKind::CatchUp { .. } => description.yellow(),
        SimEventKind::PeriodRollover { .. } => description.blue(),
        SimEventKind::Removed { .. } => description.red().bold(),
    }
}
