//! Interrupt-safe sensor latch.
//!
//! When the sensor pins are serviced from interrupt handlers, the handlers
//! record levels into a [`SensorLatch`] and the control loop reads one
//! [`SensorSnapshot`] per tick. The latch is a single atomic bitmask, so the
//! loop always sees both levels from the same instant and never shares a
//! mutable flag with the interrupt context.

use portable_atomic::{AtomicU8, Ordering};

use crate::port::{SensorInput, SensorSnapshot};
use crate::types::{SensorId, SensorLevel};

/// Atomic store of the two raw sensor levels (1 == high).
pub struct SensorLatch {
    mask: AtomicU8,
}

fn bit_for(sensor: SensorId) -> u8 {
    1 << sensor.index()
}

impl SensorLatch {
    /// Creates a latch with both sensors low.
    pub const fn new() -> Self {
        Self {
            mask: AtomicU8::new(0),
        }
    }

    /// Records the current level of one sensor. Safe to call from an interrupt.
    pub fn record(&self, sensor: SensorId, level: SensorLevel) {
        let bit = bit_for(sensor);
        match level {
            SensorLevel::High => {
                self.mask.fetch_or(bit, Ordering::Release);
            }
            SensorLevel::Low => {
                self.mask.fetch_and(!bit, Ordering::Release);
            }
        }
    }

    /// Reads both levels in one atomic load.
    pub fn load(&self) -> SensorSnapshot {
        let mask = self.mask.load(Ordering::Acquire);
        let level = |sensor| SensorLevel::from(mask & bit_for(sensor) != 0);
        SensorSnapshot::new(level(SensorId::Bottom), level(SensorId::Top))
    }
}

impl Default for SensorLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorInput for &SensorLatch {
    fn read_sensor(&mut self, sensor: SensorId) -> SensorLevel {
        self.load().level(sensor)
    }

    fn snapshot(&mut self) -> SensorSnapshot {
        self.load()
    }
}
