use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::time::Ticks;

/// Curves the motion of a [`Tween`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    /// Maintains a constant speed for the duration of the [`Tween`].
    #[default]
    Linear,
    /// Causes the [`Tween`] to start slow and speed up.
    SineIn,
    /// Causes the [`Tween`] to start fast and slow down.
    SineOut,
    /// Causes the [`Tween`] to start slow, speed up, and then slow back down.
    SineInOut,
}

const HALF_PI: f32 = PI / 2.0;

impl Easing {
    fn apply(&self, x: f32) -> f32 {
        match *self {
            Easing::Linear => x,
            Easing::SineIn => 1.0 - (x * HALF_PI).cos(),
            Easing::SineOut => (x * HALF_PI).sin(),
            Easing::SineInOut => (1.0 - (PI * x).cos()) / 2.0,
        }
    }
}

/// Describes a smooth transition between values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    /// The duration of the motion.
    pub duration: Ticks,
    /// The curve of the motion.
    pub easing: Easing,
}

impl Tween {
    pub const IMMEDIATE: Self = Self {
        duration: Ticks::ZERO,
        easing: Easing::Linear,
    };

    pub fn linear(duration: Ticks) -> Self {
        Self {
            duration,
            easing: Easing::Linear,
        }
    }

    pub fn with_easing(duration: Ticks, easing: Easing) -> Self {
        Self { duration, easing }
    }

    /// Returns the eased progress of the tween at `time`, in `[0.0, 1.0]`.
    ///
    /// Zero-length (or negative or non-finite) tweens are always complete.
    pub fn value(&self, time: Ticks) -> f32 {
        if self.duration.non_negative() == Ticks::ZERO {
            return 1.0;
        }
        let x = (time / self.duration).clamp(0.0, 1.0);
        self.easing.apply(x)
    }
}
