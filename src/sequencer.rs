//! Staircase sequencer: the control loop tying sensors, runs and the bus together.
//!
//! Provides [`StairSequencer`], which owns the lighting output and all run
//! state, and advances everything one step each time [`tick`] is called.
//!
//! [`tick`]: StairSequencer::tick

use crate::advance;
use crate::arbiter::{self, Triggers};
use crate::clear;
use crate::command::{CommandError, StairAction};
use crate::config::StairConfig;
use crate::port::{LEVEL_OFF, OutputFault, SensorInput, ZoneOutput};
use crate::state::{PoolFull, StairState};
use crate::time::{TimeInstant, TimeSource};
use crate::types::{Direction, ZoneIndex};

/// One stage of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Read sensors, debounce, arbitrate and allocate runs.
    Sense,
    /// Light the next zone of every run whose cadence is due.
    Advance,
    /// Turn off zones whose clear delay has elapsed.
    Clear,
    /// Commit this tick's writes to the bus.
    Flush,
}

impl Phase {
    /// Order in which every tick runs its phases.
    ///
    /// Sensing first lets a fresh run light its first zone on the tick it
    /// was triggered. Clearing after advancing means a zone relit this tick
    /// is never turned off on the same tick.
    pub const ORDER: [Phase; 4] = [Phase::Sense, Phase::Advance, Phase::Clear, Phase::Flush];
}

/// Summary of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Per-sensor arbitration outcome.
    pub triggers: Triggers,

    /// Zones lit.
    pub lit: usize,

    /// Zones turned off.
    pub cleared: usize,

    /// Runs that reached the far end.
    pub completed: usize,

    /// True if the output was flushed.
    pub flushed: bool,
}

impl TickReport {
    /// Number of zone writes staged this tick.
    pub fn writes(&self) -> usize {
        self.lit + self.cleared
    }
}

/// Errors that can occur during sequencer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StairError {
    /// The output failed to commit; all runs were dropped.
    Output(OutputFault),

    /// A command byte could not be decoded.
    Command(CommandError),
}

impl core::fmt::Display for StairError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StairError::Output(fault) => write!(f, "output fault: {}", fault),
            StairError::Command(err) => write!(f, "command error: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StairError {}

impl From<OutputFault> for StairError {
    fn from(fault: OutputFault) -> Self {
        StairError::Output(fault)
    }
}

impl From<CommandError> for StairError {
    fn from(err: CommandError) -> Self {
        StairError::Command(err)
    }
}

/// Animates a strip of `ZONES` lighting zones following people on the stairs.
///
/// Call [`tick`](Self::tick) from the main loop as often as possible; it never
/// blocks. Each tick runs the phases in [`Phase::ORDER`].
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `O` - Zone output implementation type
/// * `T` - Time source implementation type
/// * `ZONES` - Number of lighting zones on the strip
/// * `SLOTS` - Maximum concurrent runs per direction
pub struct StairSequencer<
    't,
    I: TimeInstant,
    O: ZoneOutput,
    T: TimeSource<I>,
    const ZONES: usize,
    const SLOTS: usize,
> {
    output: O,
    time_source: &'t T,
    config: StairConfig<I::Duration>,
    state: StairState<I, ZONES, SLOTS>,
}

impl<'t, I, O, T, const ZONES: usize, const SLOTS: usize> StairSequencer<'t, I, O, T, ZONES, SLOTS>
where
    I: TimeInstant,
    O: ZoneOutput,
    T: TimeSource<I>,
{
    /// Creates an idle sequencer. The output is not touched until the first
    /// write; send [`StairAction::Clear`] to blank a strip of unknown state.
    pub fn new(output: O, time_source: &'t T, config: StairConfig<I::Duration>) -> Self {
        Self {
            output,
            time_source,
            config,
            state: StairState::new(),
        }
    }

    /// Runs one pass of the control loop.
    ///
    /// # Returns
    /// * `Ok(TickReport)` - What happened this tick
    /// * `Err(StairError::Output)` - The flush failed; every run was dropped.
    ///   Zones already lit keep their clear timers and are turned off by later
    ///   ticks, and the opposite direction stays blocked until they are
    pub fn tick<S: SensorInput>(&mut self, sensors: &mut S) -> Result<TickReport, StairError> {
        let now = self.time_source.now();
        let mut report = TickReport::default();

        for phase in Phase::ORDER {
            match phase {
                Phase::Sense => {
                    let snapshot = sensors.snapshot();
                    trace!("sensors {}", snapshot);
                    report.triggers = arbiter::poll(&mut self.state, &self.config, snapshot, now);
                }
                Phase::Advance => {
                    let advanced =
                        advance::advance(&mut self.state, &mut self.output, &self.config, now);
                    report.lit = advanced.lit;
                    report.completed = advanced.completed;
                }
                Phase::Clear => {
                    report.cleared =
                        clear::sweep(&mut self.state, &mut self.output, &self.config, now);
                }
                Phase::Flush => {
                    if report.writes() > 0 {
                        self.flush()?;
                        report.flushed = true;
                    }
                }
            }
        }

        Ok(report)
    }

    /// Applies a command outside of sensor triggering.
    ///
    /// Both actions turn every zone off and drop all runs first. `Start` then
    /// allocates one run, which lights its first zone on the next tick.
    pub fn handle_action(&mut self, action: StairAction) -> Result<(), StairError> {
        info!("handling {}", action);
        self.blank();
        self.state.reset();

        if let StairAction::Start(direction) = action {
            if let Err(PoolFull) = self.state.pool_mut(direction).allocate() {
                // Unreachable with SLOTS > 0: the pool was just reset.
                warn!("no slot available for forced {} run", direction);
            }
        }

        self.flush()
    }

    /// Decodes a command byte and applies it.
    pub fn handle_byte(&mut self, byte: u8) -> Result<(), StairError> {
        let action = StairAction::from_byte(byte)?;
        self.handle_action(action)
    }

    fn blank(&mut self) {
        for index in 0..ZONES {
            self.output.set_zone_level(ZoneIndex(index), LEVEL_OFF);
        }
    }

    fn flush(&mut self) -> Result<(), StairError> {
        if let Err(fault) = self.output.flush() {
            warn!("output fault {}, dropping all runs", fault);
            self.state.drop_runs();
            return Err(fault.into());
        }
        Ok(())
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &StairConfig<I::Duration> {
        &self.config
    }

    /// Replaces the configuration. Runs already in flight pick up the new
    /// timing on their next step.
    pub fn set_config(&mut self, config: StairConfig<I::Duration>) {
        self.config = config;
    }

    /// Returns the run and lit-record state.
    pub fn state(&self) -> &StairState<I, ZONES, SLOTS> {
        &self.state
    }

    /// Number of runs in flight for `direction`.
    pub fn active_slots(&self, direction: Direction) -> usize {
        self.state.pool(direction).active_count()
    }

    /// Returns true if `zone` is lit in `direction` and waiting for its clear.
    pub fn is_lit_pending(&self, direction: Direction, zone: ZoneIndex) -> bool {
        self.state.lit(direction).is_pending(zone)
    }

    /// Zones currently lit by `direction`, in index order.
    pub fn lit_zones(&self, direction: Direction) -> heapless::Vec<ZoneIndex, ZONES> {
        self.state.lit(direction).pending_zones()
    }

    /// Returns true when nothing is running or lit.
    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// Returns a reference to the output.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Returns a mutable reference to the output.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Consumes the sequencer and returns the output.
    pub fn into_output(self) -> O {
        self.output
    }
}
