//! Time abstraction traits for platform-agnostic timing.
//!
//! Every elapsed-time check in the sequencer goes through
//! [`TimeInstant::duration_since`]. Implementations backed by a wrapping
//! counter must use wrapping subtraction there so a counter rollover never
//! looks like a huge (or negative) elapsed time. [`Millis`] does exactly that
//! for the common 32-bit millisecond tick.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Must stay correct across counter wraparound.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}

/// Returns true once at least `window` has passed since `earlier`.
#[inline]
pub(crate) fn has_elapsed<I: TimeInstant>(now: I, earlier: I, window: I::Duration) -> bool {
    now.duration_since(earlier).as_millis() >= window.as_millis()
}

/// Millisecond duration paired with [`Millis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MillisDuration(pub u32);

impl TimeDuration for MillisDuration {
    const ZERO: Self = MillisDuration(0);

    fn as_millis(&self) -> u64 {
        u64::from(self.0)
    }

    fn from_millis(millis: u64) -> Self {
        MillisDuration(u32::try_from(millis).unwrap_or(u32::MAX))
    }
}

/// 32-bit millisecond instant that wraps after ~49.7 days.
///
/// This is the shape of the classic `millis()` counter found on most
/// microcontroller HALs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl Millis {
    /// Returns the raw counter value.
    pub fn as_millis(&self) -> u32 {
        self.0
    }

    /// Returns the instant `millis` later, wrapping like the hardware counter.
    pub fn wrapping_add(self, millis: u32) -> Self {
        Millis(self.0.wrapping_add(millis))
    }
}

impl TimeInstant for Millis {
    type Duration = MillisDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        MillisDuration(self.0.wrapping_sub(earlier.0))
    }
}
