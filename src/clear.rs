//! Trailing clear: turns zones back off once they have been lit long enough.
//!
//! Runs against the per-direction lit records, not the run slots, so a zone
//! stays lit for the configured clear delay whether the run that lit it is
//! still moving or has already finished. This is what leaves the fading tail
//! behind a walker.
//!
//! The sweep scans every zone in both directions each tick. That is cheap for
//! a staircase-sized strip; very long strips would want an index of pending
//! records instead.

use crate::config::StairConfig;
use crate::port::{LEVEL_OFF, ZoneOutput};
use crate::state::StairState;
use crate::time::TimeInstant;
use crate::types::Direction;

/// Commands off every zone whose clear delay has elapsed.
///
/// Returns the number of zones cleared.
pub fn sweep<I, O, const ZONES: usize, const SLOTS: usize>(
    state: &mut StairState<I, ZONES, SLOTS>,
    output: &mut O,
    config: &StairConfig<I::Duration>,
    now: I,
) -> usize
where
    I: TimeInstant,
    O: ZoneOutput,
{
    let mut cleared = 0;

    for direction in Direction::ALL {
        let before = cleared;
        state
            .lit_mut(direction)
            .settle_expired(now, config.clear_delay, |zone| {
                output.set_zone_level(zone, LEVEL_OFF);
                cleared += 1;
                debug!("clearing step {}", zone.address());
            });

        if cleared > before && !state.has_unfinished(direction) {
            info!("{} steps cleared", direction);
        }
    }

    cleared
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

    fn config(clear_ms: u32) -> StairConfig<MillisDuration> {
        StairConfig::builder()
            .clear_delay(MillisDuration(clear_ms))
            .build()
            .unwrap()
    }

    #[test]
    fn zone_clears_exactly_at_delay() {
        let mut state = StairState::<Millis, 16, 3>::new();
        let mut output = Recorder::default();
        state.lit_mut(Direction::Up).mark_lit(ZoneIndex(4), Millis(1_000));

        assert_eq!(sweep(&mut state, &mut output, &config(2_300), Millis(3_299)), 0);
        assert!(output.writes.is_empty());

        assert_eq!(sweep(&mut state, &mut output, &config(2_300), Millis(3_300)), 1);
        assert_eq!(output.writes, [(ZoneIndex(4), 0)]);
        assert!(!state.lit(Direction::Up).is_pending(ZoneIndex(4)));
    }

    #[test]
    fn cleared_zone_is_not_cleared_twice() {
        let mut state = StairState::<Millis, 16, 3>::new();
        let mut output = Recorder::default();
        state.lit_mut(Direction::Down).mark_lit(ZoneIndex(0), Millis(0));

        sweep(&mut state, &mut output, &config(100), Millis(100));
        sweep(&mut state, &mut output, &config(100), Millis(5_000));

        assert_eq!(output.writes.len(), 1);
    }

    #[test]
    fn directions_clear_independently() {
        let mut state = StairState::<Millis, 16, 3>::new();
        let mut output = Recorder::default();
        state.lit_mut(Direction::Up).mark_lit(ZoneIndex(1), Millis(0));
        state.lit_mut(Direction::Down).mark_lit(ZoneIndex(1), Millis(400));

        assert_eq!(sweep(&mut state, &mut output, &config(500), Millis(500)), 1);
        assert!(!state.lit(Direction::Up).any_pending());
        assert!(state.lit(Direction::Down).is_pending(ZoneIndex(1)));
    }
}
