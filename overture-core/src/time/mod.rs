mod tween;
mod tweener;

use std::{
    fmt::{Debug, Display},
    ops::Div,
    time::Duration,
};

use derive_more::{Add, AddAssign, Sub, SubAssign};
use float_ord::FloatOrd;
use tracing::warn;
pub use tween::{Easing, Tween};
pub use tweener::Tweener;

/// A time value, used both for durations and for accumulated timers.
///
/// The value is stored as a number of "ticks" (60 tps), in an f32.
/// This precision is fine for fades and cue sheets, but should not be used to store something like "time since the process started".
#[derive(Copy, Clone, Default, Add, AddAssign, Sub, SubAssign)]
#[repr(transparent)]
pub struct Ticks(f32);

const TICKS_PER_SECOND: f32 = 60.0;

impl Ticks {
    pub const ZERO: Self = Self(0.0);
    pub const TICKS_PER_SECOND: f32 = TICKS_PER_SECOND;

    pub const fn from_f32(ticks: f32) -> Self {
        Self(ticks)
    }

    pub const fn from_u32(ticks: u32) -> Self {
        Self(ticks as f32)
    }

    pub fn from_seconds(seconds: f32) -> Self {
        Self(seconds * TICKS_PER_SECOND)
    }

    /// Like [`Ticks::from_seconds`], but clamps negative and non-finite inputs to zero.
    ///
    /// Use it for durations coming from callers or files.
    pub fn from_seconds_clamped(seconds: f32) -> Self {
        if !seconds.is_finite() || seconds < 0.0 {
            warn!("Ticks::from_seconds_clamped: invalid duration: {}s", seconds);
            return Self::ZERO;
        }
        Self::from_seconds(seconds)
    }

    pub fn from_duration(duration: Duration) -> Self {
        Self::from_seconds(duration.as_secs_f32())
    }

    pub fn as_seconds(&self) -> f32 {
        self.0 / TICKS_PER_SECOND
    }

    /// Returns `self`, or zero if `self` is negative or not finite.
    pub fn non_negative(self) -> Self {
        if self.0.is_finite() && self.0 > 0.0 {
            self
        } else {
            Self::ZERO
        }
    }
}

// Implement it manually instead of deriving, because dividing two Ticks returns a unitless f32
impl Div for Ticks {
    type Output = f32;

    fn div(self, rhs: Self) -> Self::Output {
        self.0 / rhs.0
    }
}

impl PartialEq for Ticks {
    fn eq(&self, other: &Self) -> bool {
        FloatOrd(self.0).eq(&FloatOrd(other.0))
    }
}

impl Eq for Ticks {}

impl PartialOrd for Ticks {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ticks {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        FloatOrd(self.0).cmp(&FloatOrd(other.0))
    }
}

impl Debug for Ticks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.01}t", self.0)
    }
}

/// Shows the time in seconds, the unit cue sheets and sound banks are written in.
impl Display for Ticks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}s", self.as_seconds())
    }
}
