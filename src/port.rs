//! Hardware-facing traits: the lighting bus and the two motion sensors.
//!
//! Implement [`ZoneOutput`] for your lighting driver (DMX, PWM expander,
//! addressable strip) and [`SensorInput`] for the sensor GPIOs. Neither trait
//! may block: the sequencer calls them from its single polling loop.

use crate::types::{SensorId, SensorLevel, ZoneIndex};

/// Intensity written to turn a zone off.
pub const LEVEL_OFF: u8 = 0;

/// Signalled by a [`ZoneOutput`] that could not commit its writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputFault {
    /// The bus did not accept the frame (disconnected, busy, NAK).
    Bus,

    /// The driver gave up waiting for the bus.
    Timeout,
}

impl core::fmt::Display for OutputFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OutputFault::Bus => write!(f, "lighting bus rejected the frame"),
            OutputFault::Timeout => write!(f, "lighting bus timed out"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OutputFault {}

/// Trait for abstracting the zone lighting bus.
pub trait ZoneOutput {
    /// Stages an intensity for one zone.
    ///
    /// Use [`ZoneIndex::address`] to obtain the 1-based bus address. Nothing
    /// reaches the hardware until [`flush`](ZoneOutput::flush) is called.
    fn set_zone_level(&mut self, zone: ZoneIndex, level: u8);

    /// Commits every staged write to the bus.
    ///
    /// Called once at the end of any tick that staged at least one write.
    /// Must not block; a driver that can stall should fail fast with
    /// [`OutputFault::Timeout`].
    fn flush(&mut self) -> Result<(), OutputFault>;
}

/// Trait for abstracting the motion sensor inputs.
pub trait SensorInput {
    /// Reads the raw level of one sensor.
    fn read_sensor(&mut self, sensor: SensorId) -> SensorLevel;

    /// Reads both sensors into one snapshot.
    fn snapshot(&mut self) -> SensorSnapshot {
        SensorSnapshot::new(
            self.read_sensor(SensorId::Bottom),
            self.read_sensor(SensorId::Top),
        )
    }
}

/// Raw levels of both sensors captured at the same moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSnapshot {
    levels: [SensorLevel; 2],
}

impl SensorSnapshot {
    /// Creates a snapshot from the bottom and top sensor levels.
    pub fn new(bottom: SensorLevel, top: SensorLevel) -> Self {
        Self {
            levels: [bottom, top],
        }
    }

    /// Returns the captured level of one sensor.
    pub fn level(&self, sensor: SensorId) -> SensorLevel {
        self.levels[sensor.index()]
    }
}

impl SensorInput for SensorSnapshot {
    fn read_sensor(&mut self, sensor: SensorId) -> SensorLevel {
        self.level(sensor)
    }

    fn snapshot(&mut self) -> SensorSnapshot {
        *self
    }
}
