use log::debug;
use sprinkler_core::{Footprint, Offset, Timestep};

use crate::random::RandomSource;
use crate::scheduler::{Cadence, SchedulerState};

/// What a dispatch did with the elapsed intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// No interval elapsed.
    Idle,
    /// So many intervals elapsed that every cell was watered once, silently.
    FullPass {
        /// Number of cells acted on.
        cells: usize,
    },
    /// One cell per elapsed interval; only the last one visible.
    Steps {
        /// Number of cells acted on.
        count: usize,
    },
}

impl Dispatch {
    /// Number of cells acted on.
    pub fn cells(&self) -> usize {
        match self {
            Self::Idle => 0,
            Self::FullPass { cells } => *cells,
            Self::Steps { count } => *count,
        }
    }
}

/// Act once on every cell in current order, silently. The index is left alone.
pub fn full_pass<F>(footprint: &Footprint, mut act: F) -> usize
where
    F: FnMut(Offset, bool),
{
    for cell in footprint.iter() {
        act(cell, true);
    }
    footprint.len()
}

/// Consume `count` elapsed intervals against the footprint.
///
/// A backlog at least as large as the footprint collapses into one silent
/// full pass, so catch-up never costs more than one sweep. Smaller backlogs
/// step through the footprint one cell per interval, reshuffling whenever the
/// index wraps, and only the final step is visible.
pub fn dispatch<F>(
    count: u64,
    now: Timestep,
    footprint: &mut Footprint,
    state: &mut SchedulerState,
    cadence: &Cadence,
    rng: &mut dyn RandomSource,
    mut act: F,
) -> Dispatch
where
    F: FnMut(Offset, bool),
{
    if count == 0 || footprint.is_empty() {
        return Dispatch::Idle;
    }

    if count >= footprint.len() as u64 {
        let cells = full_pass(footprint, &mut act);
        state.last_check = Some(now);
        debug!("catch-up of {count} intervals collapsed into a full pass of {cells} cells");
        return Dispatch::FullPass { cells };
    }

    for step in 0..count {
        state.last_check = Some(cadence.jittered(now, rng));
        state.current_index += 1;
        if state.current_index >= footprint.len() {
            state.current_index = 0;
            rng.shuffle(footprint.offsets_mut());
        }
        let Some(cell) = footprint.get(state.current_index) else {
            break;
        };
        act(cell, step + 1 != count);
    }
    Dispatch::Steps {
        count: count as usize,
    }
}

/// Once-per-day hook: a full silent pass whenever the day counter advances.
///
/// The first observation only records the day. Returns true when a pass ran;
/// the interval schedule then restarts from `now`.
pub fn rollover<F>(
    day: i64,
    now: Timestep,
    footprint: &Footprint,
    state: &mut SchedulerState,
    act: F,
) -> bool
where
    F: FnMut(Offset, bool),
{
    match state.last_period {
        Some(previous) if day > previous => {
            state.last_period = Some(day);
            full_pass(footprint, act);
            state.last_check = Some(now);
            true
        }
        Some(_) => false,
        None => {
            state.last_period = Some(day);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use sprinkler_core::{FootprintShape, FootprintSpec};

    use super::*;
    use crate::random::{ScriptedRandom, SeededRandom};

    fn circle() -> Footprint {
        Footprint::build(&FootprintSpec {
            shape: FootprintShape::Ellipse,
            radius_primary: 2,
            radius_secondary: 2,
            axis_swapped: false,
        })
    }

    fn cadence() -> Cadence {
        Cadence {
            interval: Timestep(100),
            jitter: Timestep(0),
        }
    }

    fn run(
        count: u64,
        footprint: &mut Footprint,
        state: &mut SchedulerState,
        rng: &mut dyn RandomSource,
    ) -> (Dispatch, Vec<(Offset, bool)>) {
        let mut calls = Vec::new();
        let outcome = dispatch(
            count,
            Timestep(1_000),
            footprint,
            state,
            &cadence(),
            rng,
            |cell, silent| calls.push((cell, silent)),
        );
        (outcome, calls)
    }

    #[test]
    fn zero_count_is_idle() {
        let mut fp = circle();
        let mut state = SchedulerState::fresh(fp.len());
        let before = state.clone();
        let (outcome, calls) = run(0, &mut fp, &mut state, &mut ScriptedRandom::new());
        assert_eq!(outcome, Dispatch::Idle);
        assert!(calls.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn large_backlog_is_one_silent_pass() {
        let mut fp = circle();
        let mut state = SchedulerState::fresh(fp.len());
        state.current_index = 4;
        state.last_check = Some(Timestep(0));
        let mut rng = ScriptedRandom::new();

        let (outcome, calls) = run(1_000_000, &mut fp, &mut state, &mut rng);
        assert_eq!(outcome, Dispatch::FullPass { cells: 13 });
        assert_eq!(calls.len(), 13);
        assert!(calls.iter().all(|(_, silent)| *silent));
        let mut unique: Vec<Offset> = calls.iter().map(|(c, _)| *c).collect();
        unique.sort_by_key(|c| (c.x, c.z));
        unique.dedup();
        assert_eq!(unique.len(), 13);
        assert_eq!(state.current_index, 4);
        assert_eq!(state.last_check, Some(Timestep(1_000)));
        assert_eq!(rng.shuffles(), 0);
    }

    #[test]
    fn backlog_equal_to_footprint_is_full_pass() {
        let mut fp = circle();
        let mut state = SchedulerState::fresh(fp.len());
        let (outcome, _) = run(13, &mut fp, &mut state, &mut ScriptedRandom::new());
        assert_eq!(outcome, Dispatch::FullPass { cells: 13 });
    }

    #[test]
    fn burst_has_single_visible_last_step() {
        let mut fp = circle();
        let mut state = SchedulerState::fresh(fp.len());
        let (outcome, calls) = run(5, &mut fp, &mut state, &mut ScriptedRandom::new());
        assert_eq!(outcome, Dispatch::Steps { count: 5 });
        assert_eq!(calls.len(), 5);
        let visible: Vec<_> = calls.iter().filter(|(_, silent)| !silent).collect();
        assert_eq!(visible.len(), 1);
        assert!(!calls[4].1);
    }

    #[test]
    fn first_step_reshuffles_and_starts_at_zero() {
        let mut fp = circle();
        let first = fp.get(0).unwrap();
        let mut state = SchedulerState::fresh(fp.len());
        let mut rng = ScriptedRandom::new();
        let (_, calls) = run(1, &mut fp, &mut state, &mut rng);
        assert_eq!(rng.shuffles(), 1);
        assert_eq!(state.current_index, 0);
        assert_eq!(calls, vec![(first, false)]);
    }

    #[test]
    fn steps_walk_footprint_in_order_and_wrap() {
        let mut fp = circle();
        let order: Vec<Offset> = fp.iter().collect();
        let mut state = SchedulerState::fresh(fp.len());
        let mut rng = ScriptedRandom::new();

        let mut seen = Vec::new();
        for _ in 0..15 {
            let (_, calls) = run(1, &mut fp, &mut state, &mut rng);
            seen.extend(calls.into_iter().map(|(c, _)| c));
        }
        assert_eq!(&seen[..13], &order[..]);
        assert_eq!(seen[13], order[0]);
        assert_eq!(seen[14], order[1]);
        assert_eq!(rng.shuffles(), 2);
    }

    #[test]
    fn each_step_draws_its_own_jitter() {
        let mut fp = circle();
        let mut state = SchedulerState::fresh(fp.len());
        let mut rng = ScriptedRandom::with_draws([0.5, -0.5]);
        let jittery = Cadence {
            interval: Timestep(100),
            jitter: Timestep(40),
        };
        dispatch(
            2,
            Timestep(1_000),
            &mut fp,
            &mut state,
            &jittery,
            &mut rng,
            |_, _| {},
        );
        // Second draw wins: 1000 + floor(40 * -0.5)
        assert_eq!(state.last_check, Some(Timestep(980)));
    }

    #[test]
    fn seeded_reshuffle_keeps_cells() {
        let mut fp = circle();
        let mut state = SchedulerState::fresh(fp.len());
        let mut rng = SeededRandom::new(9);
        run(1, &mut fp, &mut state, &mut rng);

        let mut reference = circle();
        reference.offsets_mut().sort_by_key(|c| (c.x, c.z));
        fp.offsets_mut().sort_by_key(|c| (c.x, c.z));
        assert_eq!(fp, reference);
    }

    #[test]
    fn rollover_records_then_fires_on_new_day() {
        let fp = circle();
        let mut state = SchedulerState::fresh(fp.len());
        let mut count = 0;

        assert!(!rollover(3, Timestep(10), &fp, &mut state, |_, _| count += 1));
        assert_eq!(state.last_period, Some(3));
        assert!(!rollover(3, Timestep(20), &fp, &mut state, |_, _| count += 1));
        assert_eq!(count, 0);

        assert!(rollover(4, Timestep(30), &fp, &mut state, |_, silent| {
            assert!(silent);
            count += 1;
        }));
        assert_eq!(count, 13);
        assert_eq!(state.last_period, Some(4));
        assert_eq!(state.last_check, Some(Timestep(30)));
    }
}
