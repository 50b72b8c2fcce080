//! Shared test infrastructure for stair-sequencer integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use stair_sequencer::{
    Millis, OutputFault, SensorId, SensorInput, SensorLevel, StairSequencer, TickReport,
    TimeSource, ZoneIndex, ZoneOutput,
};

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<Millis>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(millis: u32) -> Self {
        Self {
            current_time: core::cell::Cell::new(Millis(millis)),
        }
    }

    pub fn set_time(&self, millis: u32) {
        self.current_time.set(Millis(millis));
    }

    pub fn millis(&self) -> u32 {
        self.current_time.get().as_millis()
    }
}

impl TimeSource<Millis> for MockTimeSource {
    fn now(&self) -> Millis {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Zone Output
// ============================================================================

/// One call made on the output, stamped with the mock clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEvent {
    Level { at: u32, zone: usize, level: u8 },
    Flush { at: u32 },
}

/// Mock output that records every write and flush
pub struct MockOutput<'t> {
    clock: &'t MockTimeSource,
    events: Vec<OutputEvent>,
    fail_flush_at: Option<u32>,
}

impl<'t> MockOutput<'t> {
    pub fn new(clock: &'t MockTimeSource) -> Self {
        Self {
            clock,
            events: Vec::new(),
            fail_flush_at: None,
        }
    }

    pub fn events(&self) -> &[OutputEvent] {
        &self.events
    }

    pub fn fail_flush_at(&mut self, millis: u32) {
        self.fail_flush_at = Some(millis);
    }

    /// `(at, zone)` for every write at `level`.
    fn writes_at_level(&self, wanted: u8) -> Vec<(u32, usize)> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                OutputEvent::Level { at, zone, level } if level == wanted => Some((at, zone)),
                _ => None,
            })
            .collect()
    }

    /// `(at, zone)` for every zone lit at full intensity.
    pub fn lit(&self) -> Vec<(u32, usize)> {
        self.writes_at_level(u8::MAX)
    }

    /// `(at, zone)` for every zone turned off.
    pub fn cleared(&self) -> Vec<(u32, usize)> {
        self.writes_at_level(0)
    }

    /// Times at which `zone` was lit.
    pub fn lit_times(&self, zone: usize) -> Vec<u32> {
        self.lit()
            .into_iter()
            .filter(|&(_, z)| z == zone)
            .map(|(at, _)| at)
            .collect()
    }

    /// Times at which `zone` was turned off.
    pub fn cleared_times(&self, zone: usize) -> Vec<u32> {
        self.cleared()
            .into_iter()
            .filter(|&(_, z)| z == zone)
            .map(|(at, _)| at)
            .collect()
    }
}

impl ZoneOutput for MockOutput<'_> {
    fn set_zone_level(&mut self, zone: ZoneIndex, level: u8) {
        self.events.push(OutputEvent::Level {
            at: self.clock.millis(),
            zone: zone.get(),
            level,
        });
    }

    fn flush(&mut self) -> Result<(), OutputFault> {
        let at = self.clock.millis();
        self.events.push(OutputEvent::Flush { at });
        if self.fail_flush_at == Some(at) {
            return Err(OutputFault::Bus);
        }
        Ok(())
    }
}

// ============================================================================
// Mock Sensors
// ============================================================================

/// Mock sensor pair whose levels are set directly by the test
#[derive(Debug, Clone, Copy)]
pub struct MockSensors {
    bottom: SensorLevel,
    top: SensorLevel,
}

impl MockSensors {
    pub fn new() -> Self {
        Self {
            bottom: SensorLevel::Low,
            top: SensorLevel::Low,
        }
    }

    pub fn set(&mut self, sensor: SensorId, level: SensorLevel) {
        match sensor {
            SensorId::Bottom => self.bottom = level,
            SensorId::Top => self.top = level,
        }
    }

    pub fn release_all(&mut self) {
        self.bottom = SensorLevel::Low;
        self.top = SensorLevel::Low;
    }
}

impl SensorInput for MockSensors {
    fn read_sensor(&mut self, sensor: SensorId) -> SensorLevel {
        match sensor {
            SensorId::Bottom => self.bottom,
            SensorId::Top => self.top,
        }
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

pub type TestSequencer<'t, const ZONES: usize, const SLOTS: usize> =
    StairSequencer<'t, Millis, MockOutput<'t>, MockTimeSource, ZONES, SLOTS>;

/// Ticks once at `millis`.
pub fn tick_at<const ZONES: usize, const SLOTS: usize>(
    sequencer: &mut TestSequencer<'_, ZONES, SLOTS>,
    clock: &MockTimeSource,
    sensors: &mut MockSensors,
    millis: u32,
) -> TickReport {
    clock.set_time(millis);
    sequencer.tick(sensors).expect("tick failed")
}

/// Holds `sensor` triggered for exactly one tick at `millis`.
pub fn pulse<const ZONES: usize, const SLOTS: usize>(
    sequencer: &mut TestSequencer<'_, ZONES, SLOTS>,
    clock: &MockTimeSource,
    sensor: SensorId,
    millis: u32,
) -> TickReport {
    let mut sensors = MockSensors::new();
    sensors.set(sensor, SensorLevel::High);
    tick_at(sequencer, clock, &mut sensors, millis)
}

/// Ticks every millisecond in `from..=to` with the given sensor levels.
pub fn run_until<const ZONES: usize, const SLOTS: usize>(
    sequencer: &mut TestSequencer<'_, ZONES, SLOTS>,
    clock: &MockTimeSource,
    sensors: &mut MockSensors,
    from: u32,
    to: u32,
) {
    for millis in from..=to {
        tick_at(sequencer, clock, sensors, millis);
    }
}

/// Ticks every millisecond in `from..=to` with both sensors idle.
pub fn run_quiet<const ZONES: usize, const SLOTS: usize>(
    sequencer: &mut TestSequencer<'_, ZONES, SLOTS>,
    clock: &MockTimeSource,
    from: u32,
    to: u32,
) {
    run_until(sequencer, clock, &mut MockSensors::new(), from, to);
}
