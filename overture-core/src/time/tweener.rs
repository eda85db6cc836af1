use crate::time::{Ticks, Tween};

type Value = f32;

#[derive(Debug, Clone, Copy)]
enum State {
    Idle,
    Tweening {
        values: (Value, Value),
        time: Ticks,
        tween: Tween,
    },
}

/// Holds a value and plays back a tween which smoothly
/// adjusts that value.
///
/// Starting a new tween replaces the one in flight, starting from the current value.
#[derive(Debug, Clone)]
pub struct Tweener {
    state: State,
    value: Value,
}

impl Tweener {
    pub fn new(value: Value) -> Self {
        Self {
            state: State::Idle,
            value,
        }
    }

    pub fn value(&self) -> Value {
        self.value
    }

    pub fn target_value(&self) -> Value {
        match self.state {
            State::Idle => self.value,
            State::Tweening {
                values: (_, value), ..
            } => value,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// Time spent in the current tween, zero when idle.
    pub fn elapsed(&self) -> Ticks {
        match self.state {
            State::Idle => Ticks::ZERO,
            State::Tweening { time, .. } => time,
        }
    }

    /// Time left until the current tween finishes, zero when idle.
    pub fn remaining(&self) -> Ticks {
        match self.state {
            State::Idle => Ticks::ZERO,
            State::Tweening { time, tween, .. } => (tween.duration - time).non_negative(),
        }
    }

    /// Returns an linearly interpolated value between `a` and `b`.
    ///
    /// An amount of `0.0` should yield `a`, an amount of `1.0` should
    /// yield `b`, and an amount of `0.5` should yield a value halfway
    /// between `a` and `b`.
    fn lerp(a: Value, b: Value, amount: f32) -> Value {
        a + (b - a) * amount
    }

    pub fn update(&mut self, delta_time: Ticks) {
        if let State::Tweening {
            values,
            time,
            tween,
        } = &mut self.state
        {
            *time += delta_time;
            if *time >= tween.duration {
                self.value = values.1;
                self.state = State::Idle;
            } else {
                self.value = Self::lerp(values.0, values.1, tween.value(*time));
            }
        }
    }

    /// Fast-forwards the tweener to the end of the current tween.
    pub fn fast_forward(&mut self) {
        let value = self.target_value();
        self.fast_forward_to(value);
    }

    /// Fast-forwards the tweener to the specified value.
    pub fn fast_forward_to(&mut self, value: Value) {
        self.state = State::Idle;
        self.value = value;
    }

    /// Starts a transition from the current value to the specified value, dropping the tween in flight.
    ///
    /// Zero-length (and negative or non-finite) tweens are applied right away.
    pub fn enqueue_now(&mut self, value: Value, tween: Tween) {
        if tween.duration.non_negative() == Ticks::ZERO {
            self.fast_forward_to(value);
            return;
        }

        self.state = State::Tweening {
            values: (self.value, value),
            time: Ticks::ZERO,
            tween,
        };
    }

    /// Changes the target of the tween in flight, keeping the time it has left.
    ///
    /// The remaining motion starts from the current value, so the value never jumps.
    /// When idle, the value is set directly.
    pub fn retarget(&mut self, value: Value) {
        match self.state {
            State::Idle => self.value = value,
            State::Tweening { tween, .. } => {
                let remaining = self.remaining();
                self.enqueue_now(
                    value,
                    Tween {
                        duration: remaining,
                        easing: tween.easing,
                    },
                );
            }
        }
    }
}
