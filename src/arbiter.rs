//! Debounce and direction arbitration for the two motion sensors.
//!
//! Turns raw sensor levels into run allocations. A sensor fires when it reads
//! triggered and its debounce window is open. A fire is honored only if the
//! opposite direction has nothing left on the strip (no run in flight and no
//! zone waiting to be cleared); same-direction fires are always allowed so
//! several people walking the same way get overlapping trails.

use crate::config::StairConfig;
use crate::port::SensorSnapshot;
use crate::state::{PoolFull, SlotHandle, StairState};
use crate::time::TimeInstant;
use crate::types::{DebouncePolicy, Direction, SensorId, SensorLevel};

/// What happened to one sensor during a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerOutcome {
    /// Sensor not triggered.
    #[default]
    Idle,

    /// Triggered inside the debounce window.
    Debounced,

    /// Triggered while the opposite direction still had state on the strip.
    Blocked,

    /// Fired, but every slot for its direction was busy. Dropped.
    PoolFull,

    /// Fired and started a run in this slot.
    Allocated(SlotHandle),
}

impl TriggerOutcome {
    /// Returns true for a trigger that was eligible but produced no run.
    pub fn is_dropped(&self) -> bool {
        matches!(self, TriggerOutcome::Blocked | TriggerOutcome::PoolFull)
    }
}

/// Per-sensor outcomes of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Triggers {
    outcomes: [TriggerOutcome; 2],
}

impl Triggers {
    /// Outcome for one sensor.
    pub fn outcome(&self, sensor: SensorId) -> TriggerOutcome {
        self.outcomes[sensor.index()]
    }

    /// Slot allocated for `direction` this poll, if any.
    pub fn allocated(&self, direction: Direction) -> Option<SlotHandle> {
        SensorId::ALL
            .iter()
            .filter(|sensor| sensor.direction() == direction)
            .find_map(|&sensor| match self.outcome(sensor) {
                TriggerOutcome::Allocated(handle) => Some(handle),
                _ => None,
            })
    }

    /// Number of eligible triggers that were dropped.
    pub fn dropped(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_dropped()).count()
    }
}

/// Polls both sensors and allocates runs for those that win arbitration.
///
/// Sensors are evaluated bottom first, then top. Under the shared debounce
/// policy a bottom fire closes the window for the top sensor on the same
/// tick.
pub fn poll<I, const ZONES: usize, const SLOTS: usize>(
    state: &mut StairState<I, ZONES, SLOTS>,
    config: &StairConfig<I::Duration>,
    snapshot: SensorSnapshot,
    now: I,
) -> Triggers
where
    I: TimeInstant,
{
    let mut triggers = Triggers::default();
    for sensor in SensorId::ALL {
        triggers.outcomes[sensor.index()] =
            arbitrate(state, config, sensor, snapshot.level(sensor), now);
    }
    triggers
}

fn arbitrate<I, const ZONES: usize, const SLOTS: usize>(
    state: &mut StairState<I, ZONES, SLOTS>,
    config: &StairConfig<I::Duration>,
    sensor: SensorId,
    level: SensorLevel,
    now: I,
) -> TriggerOutcome
where
    I: TimeInstant,
{
    if !config.active_level.is_triggered(level) {
        return TriggerOutcome::Idle;
    }

    let policy = config.debounce_policy;
    if !state
        .debounce()
        .is_open(sensor, policy, now, config.debounce_window)
    {
        return TriggerOutcome::Debounced;
    }

    // The shared window restarts on every eligible edge, blocked or not.
    let shared = policy == DebouncePolicy::Shared;
    if shared {
        state.debounce_mut().record(sensor, policy, now);
    }

    let direction = sensor.direction();
    if state.has_unfinished(direction.opposite()) {
        trace!("{} sensor blocked by {} state", sensor, direction.opposite());
        return TriggerOutcome::Blocked;
    }

    if !shared {
        state.debounce_mut().record(sensor, policy, now);
    }
    debug!("{} sensor triggered", sensor);

    match state.pool_mut(direction).allocate() {
        Ok(handle) => {
            info!("{} run started in slot {}", direction, handle.0);
            TriggerOutcome::Allocated(handle)
        }
        Err(PoolFull) => {
            debug!("{} pool full, trigger dropped", direction);
            TriggerOutcome::PoolFull
        }
    }
}
