//! Step advancement: moves every in-flight run one zone along on its cadence.

use crate::config::StairConfig;
use crate::port::ZoneOutput;
use crate::state::{StairState, StepOutcome};
use crate::time::TimeInstant;
use crate::types::Direction;

/// Work done by one advancement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdvanceReport {
    /// Zones lit this pass.
    pub lit: usize,

    /// Runs that lit their last zone and returned their slot.
    pub completed: usize,
}

/// Lights the next zone of every run whose cadence gate is open.
///
/// Each slot keeps its own timer, so runs started at different moments step
/// independently. A lit zone gets a fresh lit record for its direction
/// (restarting any clear already pending there). A run that lights the last
/// zone in its direction is deactivated on the same pass.
pub fn advance<I, O, const ZONES: usize, const SLOTS: usize>(
    state: &mut StairState<I, ZONES, SLOTS>,
    output: &mut O,
    config: &StairConfig<I::Duration>,
    now: I,
) -> AdvanceReport
where
    I: TimeInstant,
    O: ZoneOutput,
{
    let mut report = AdvanceReport::default();

    for direction in Direction::ALL {
        let (pool, lit) = state.parts_mut(direction);

        pool.for_each_active(|handle, slot| {
            if !slot.is_due(now, config.step_advance_interval) {
                return;
            }

            let zone = slot.cursor();
            output.set_zone_level(zone, config.lit_level);
            lit.mark_lit(zone, now);
            report.lit += 1;
            debug!("showing step {}", zone.address());

            if slot.step::<ZONES>(direction, now) == StepOutcome::Finished {
                report.completed += 1;
                info!("{} sequence in slot {} completed", direction, handle.0);
            }
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::OutputFault;
    use crate::time::{Millis, MillisDuration};
    use crate::types::ZoneIndex;
    extern crate std;
    use std::vec::Vec;

    #[derive(Default)]
    struct Recorder {
        writes: Vec<(ZoneIndex, u8)>,
    }

    impl ZoneOutput for Recorder {
        fn set_zone_level(&mut self, zone: ZoneIndex, level: u8) {
            self.writes.push((zone, level));
        }

        fn flush(&mut self) -> Result<(), OutputFault> {
            Ok(())
        }
    }

    fn config() -> StairConfig<MillisDuration> {
        StairConfig::default()
    }

    #[test]
    fn fresh_run_lights_first_zone_immediately() {
        let mut state = StairState::<Millis, 4, 2>::new();
        let mut output = Recorder::default();
        state.pool_mut(Direction::Up).allocate().unwrap();

        let report = advance(&mut state, &mut output, &config(), Millis(0));

        assert_eq!(report, AdvanceReport { lit: 1, completed: 0 });
        assert_eq!(output.writes, [(ZoneIndex(0), 255)]);
        assert!(state.lit(Direction::Up).is_pending(ZoneIndex(0)));
    }

    #[test]
    fn cadence_gate_holds_run_between_steps() {
        let mut state = StairState::<Millis, 4, 2>::new();
        let mut output = Recorder::default();
        state.pool_mut(Direction::Down).allocate().unwrap();

        advance(&mut state, &mut output, &config(), Millis(0));
        advance(&mut state, &mut output, &config(), Millis(499));
        advance(&mut state, &mut output, &config(), Millis(500));

        assert_eq!(output.writes, [(ZoneIndex(3), 255), (ZoneIndex(2), 255)]);
    }

    #[test]
    fn run_deactivates_after_lighting_far_end() {
        let mut state = StairState::<Millis, 2, 1>::new();
        let mut output = Recorder::default();
        state.pool_mut(Direction::Up).allocate().unwrap();

        advance(&mut state, &mut output, &config(), Millis(0));
        let report = advance(&mut state, &mut output, &config(), Millis(500));

        assert_eq!(report.completed, 1);
        assert!(!state.pool(Direction::Up).is_busy());
        assert!(state.lit(Direction::Up).is_pending(ZoneIndex(1)));
    }

    #[test]
    fn cursors_move_monotonically_until_release() {
        let mut state = StairState::<Millis, 8, 1>::new();
        let mut output = Recorder::default();
        state.pool_mut(Direction::Up).allocate().unwrap();
        state.pool_mut(Direction::Down).allocate().unwrap();

        let mut up = Vec::new();
        let mut down = Vec::new();
        for step in 0..8u32 {
            advance(&mut state, &mut output, &config(), Millis(step * 500));
            for (_, slot) in state.pool(Direction::Up).active() {
                up.push(slot.cursor().get());
            }
            for (_, slot) in state.pool(Direction::Down).active() {
                down.push(slot.cursor().get());
            }
        }

        assert_eq!(up, [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(down, [6, 5, 4, 3, 2, 1, 0]);
        assert!(!state.pool(Direction::Up).is_busy());
        assert!(!state.pool(Direction::Down).is_busy());
    }

    #[test]
    fn configured_lit_level_is_written() {
        let config = StairConfig::<MillisDuration>::builder()
            .lit_level(40)
            .build()
            .unwrap();
        let mut state = StairState::<Millis, 4, 1>::new();
        let mut output = Recorder::default();
        state.pool_mut(Direction::Up).allocate().unwrap();

        advance(&mut state, &mut output, &config, Millis(0));
        assert_eq!(output.writes, [(ZoneIndex(0), 40)]);
    }
}
