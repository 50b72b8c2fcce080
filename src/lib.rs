#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`StairSequencer`**: Owns the lighting output and all run state; call `tick()` from the main loop
//! - **`StairConfig`**: Debounce window, step cadence, clear delay, sensor polarity and lit level
//! - **`ZoneOutput`**: Trait to implement for your lighting bus (stage levels, then flush)
//! - **`SensorInput`**: Trait to implement for your two motion sensors
//! - **`SensorLatch`**: Atomic sensor store for interrupt-driven inputs
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`StairAction`**: Force-start and force-clear commands, decodable from single bytes
//! - **`Direction`** / **`ZoneIndex`**: Which way a run travels and which zone it lights
//!
//! Zones are 0-based inside the crate. [`ZoneIndex::address`] gives the
//! 1-based address most lighting buses expect.

mod fmt;

pub mod time;
pub mod types;
pub mod config;
pub mod port;
pub mod latch;
pub mod state;
pub mod arbiter;
pub mod advance;
pub mod clear;
pub mod command;
pub mod sequencer;

pub use arbiter::{TriggerOutcome, Triggers};
pub use command::{CLEAR_BYTE, CommandError, START_BYTE, StairAction};
pub use config::{ConfigError, StairConfig, StairConfigBuilder};
pub use latch::SensorLatch;
pub use port::{LEVEL_OFF, OutputFault, SensorInput, SensorSnapshot, ZoneOutput};
pub use sequencer::{Phase, StairError, StairSequencer, TickReport};
pub use state::{PoolFull, SlotHandle, StairState};
pub use time::{Millis, MillisDuration, TimeDuration, TimeInstant, TimeSource};
pub use types::{ActiveLevel, DebouncePolicy, Direction, SensorId, SensorLevel, ZoneIndex};

/// Zone count of the reference sixteen-step staircase.
pub const REFERENCE_ZONES: usize = 16;

/// Concurrent runs per direction on the reference staircase.
pub const REFERENCE_SLOTS: usize = 3;

/// Sequencer sized like the reference staircase, driven by a 32-bit millisecond tick.
pub type ReferenceSequencer<'t, O, T> =
    StairSequencer<'t, Millis, O, T, REFERENCE_ZONES, REFERENCE_SLOTS>;
