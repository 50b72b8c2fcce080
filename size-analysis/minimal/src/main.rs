#![no_std]
#![no_main]

use cortex_m_rt::entry;
use panic_halt as _;
use stair_sequencer::{
    Millis, OutputFault, ReferenceSequencer, SensorId, SensorLatch, SensorLevel, StairConfig,
    StairSequencer, TimeSource, ZoneIndex, ZoneOutput,
};

// ============================================================================
// Minimal Output Implementation
// ============================================================================

/// Zero-size output for measuring library overhead
pub struct MinimalOutput;

impl ZoneOutput for MinimalOutput {
    fn set_zone_level(&mut self, zone: ZoneIndex, level: u8) {
        core::hint::black_box((zone.address(), level));
    }

    fn flush(&mut self) -> Result<(), OutputFault> {
        core::hint::black_box(());
        Ok(())
    }
}

// ============================================================================
// Minimal TimeSource Implementation
// ============================================================================

pub struct MinimalTimeSource;

impl TimeSource<Millis> for MinimalTimeSource {
    fn now(&self) -> Millis {
        core::hint::black_box(Millis(0))
    }
}

static SENSORS: SensorLatch = SensorLatch::new();

// ============================================================================
// Sequencer Sizes
// ============================================================================

// Exercises the library so the optimizer keeps every code path
#[inline(never)]
fn exercise_sequencers() {
    let time_source = MinimalTimeSource;
    SENSORS.record(SensorId::Bottom, SensorLevel::High);

    // Reference staircase: 16 zones, 3 runs per direction
    let mut reference = ReferenceSequencer::new(MinimalOutput, &time_source, StairConfig::default());
    let _ = reference.tick(&mut &SENSORS);
    let _ = reference.handle_byte(core::hint::black_box(b'B'));
    core::hint::black_box(&reference);

    // Long staircase: 32 zones, 4 runs per direction
    let mut long = StairSequencer::<Millis, MinimalOutput, MinimalTimeSource, 32, 4>::new(
        MinimalOutput,
        &time_source,
        StairConfig::default(),
    );
    let _ = long.tick(&mut &SENSORS);
    let _ = long.handle_byte(core::hint::black_box(b'A'));
    core::hint::black_box(&long);
}

#[entry]
fn main() -> ! {
    // Call exercise function to ensure all code is included
    exercise_sequencers();

    // Halt - this is a size analysis binary, not meant to run
    loop {
        cortex_m::asm::nop();
    }
}
