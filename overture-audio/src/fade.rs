use overture_core::{
    clip::ClipId,
    time::{Easing, Ticks, Tween, Tweener},
    volume::Volume,
};
use strum::Display;

/// What the music channel ends up playing once a fade is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FadeTarget {
    Clip(ClipId),
    Silence,
}

impl FadeTarget {
    pub fn clip(&self) -> Option<&ClipId> {
        match self {
            FadeTarget::Clip(id) => Some(id),
            FadeTarget::Silence => None,
        }
    }
}

#[derive(Display, Debug, Copy, Clone, PartialEq, Eq)]
pub enum FadePhase {
    /// The old clip goes from its volume at the start of the fade down to silence.
    FadingOut,
    /// The old clip is done, the channel has to stop it and start the target.
    /// Never lasts past the tick it was entered in.
    Swapping,
    /// The new clip goes from silence up to the channel's volume.
    FadingIn,
    Finished,
}

/// A music track transition in flight.
///
/// This is a plain state machine, it doesn't touch the channel itself. The controller
/// applies [`FadeTask::volume`] after every step and performs the swap when the task reaches
/// [`FadePhase::Swapping`].
#[derive(Debug, Clone)]
pub struct FadeTask {
    target: FadeTarget,
    duration: Ticks,
    easing: Easing,
    phase: FadePhase,
    elapsed: Ticks,
    volume: Tweener,
}

impl FadeTask {
    /// Starts fading out from `start_volume`.
    ///
    /// Negative and non-finite durations are treated as zero, which completes the fade-out
    /// right away.
    pub fn new(target: FadeTarget, duration: Ticks, easing: Easing, start_volume: f32) -> Self {
        let duration = duration.non_negative();
        let mut volume = Tweener::new(start_volume);
        volume.enqueue_now(0.0, Tween::with_easing(duration, easing));

        let mut task = Self {
            target,
            duration,
            easing,
            phase: FadePhase::FadingOut,
            elapsed: Ticks::ZERO,
            volume,
        };
        task.settle();
        task
    }

    pub fn target(&self) -> &FadeTarget {
        &self.target
    }

    pub fn phase(&self) -> FadePhase {
        self.phase
    }

    pub fn duration(&self) -> Ticks {
        self.duration
    }

    /// Time spent in the current phase.
    pub fn elapsed(&self) -> Ticks {
        self.elapsed
    }

    pub fn volume(&self) -> f32 {
        self.volume.value()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == FadePhase::Finished
    }

    pub fn update(&mut self, delta_time: Ticks) {
        match self.phase {
            FadePhase::FadingOut | FadePhase::FadingIn => {
                self.elapsed += delta_time;
                self.volume.update(delta_time);
                self.settle();
            }
            FadePhase::Swapping | FadePhase::Finished => {}
        }
    }

    /// Called by the controller once it started the target clip.
    pub fn begin_fade_in(&mut self, target: Volume) {
        debug_assert_eq!(self.phase, FadePhase::Swapping);

        self.phase = FadePhase::FadingIn;
        self.elapsed = Ticks::ZERO;
        self.volume.fast_forward_to(0.0);
        self.volume
            .enqueue_now(target.get(), Tween::with_easing(self.duration, self.easing));
        self.settle();
    }

    /// Moves the end point of the fade-in, keeping its remaining time.
    ///
    /// Does nothing in other phases: the fade-out always ends in silence,
    /// and the final volume is recomputed by the controller anyway.
    pub fn retarget_fade_in(&mut self, target: Volume) {
        if self.phase == FadePhase::FadingIn {
            self.volume.retarget(target.get());
            self.settle();
        }
    }

    pub fn finish(&mut self) {
        self.volume.fast_forward();
        self.phase = FadePhase::Finished;
    }

    fn settle(&mut self) {
        if !self.volume.is_idle() {
            return;
        }
        match self.phase {
            FadePhase::FadingOut => {
                self.phase = FadePhase::Swapping;
                self.elapsed = Ticks::ZERO;
            }
            FadePhase::FadingIn => self.phase = FadePhase::Finished,
            FadePhase::Swapping | FadePhase::Finished => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use overture_core::{
        clip::ClipId,
        time::{Easing, Ticks},
        volume::Volume,
    };

    use super::{FadePhase, FadeTarget, FadeTask};

    fn clip_target(id: &str) -> FadeTarget {
        FadeTarget::Clip(ClipId::new(id))
    }

    #[test]
    fn phases() {
        let mut task = FadeTask::new(clip_target("b"), Ticks::from_u32(60), Easing::Linear, 0.8);
        assert_eq!(task.phase(), FadePhase::FadingOut);
        assert_eq!(task.volume(), 0.8);

        task.update(Ticks::from_u32(30));
        assert!((task.volume() - 0.4).abs() < 1e-6);
        assert_eq!(task.elapsed(), Ticks::from_u32(30));

        task.update(Ticks::from_u32(30));
        assert_eq!(task.phase(), FadePhase::Swapping);
        assert_eq!(task.volume(), 0.0);

        // nothing moves until the controller performs the swap
        task.update(Ticks::from_u32(30));
        assert_eq!(task.phase(), FadePhase::Swapping);

        task.begin_fade_in(Volume::new(0.5));
        assert_eq!(task.phase(), FadePhase::FadingIn);
        assert_eq!(task.elapsed(), Ticks::ZERO);
        task.update(Ticks::from_u32(30));
        assert!((task.volume() - 0.25).abs() < 1e-6);
        task.update(Ticks::from_u32(30));
        assert!(task.is_finished());
        assert_eq!(task.volume(), 0.5);
    }

    #[test]
    fn zero_and_negative_durations() {
        let mut task = FadeTask::new(clip_target("b"), Ticks::ZERO, Easing::Linear, 1.0);
        assert_eq!(task.phase(), FadePhase::Swapping);
        task.begin_fade_in(Volume::FULL);
        assert!(task.is_finished());
        assert_eq!(task.volume(), 1.0);

        let task = FadeTask::new(
            FadeTarget::Silence,
            Ticks::from_f32(-10.0),
            Easing::Linear,
            1.0,
        );
        assert_eq!(task.duration(), Ticks::ZERO);
        assert_eq!(task.phase(), FadePhase::Swapping);

        let task = FadeTask::new(
            clip_target("b"),
            Ticks::from_f32(f32::NAN),
            Easing::Linear,
            1.0,
        );
        assert_eq!(task.duration(), Ticks::ZERO);
        assert_eq!(task.phase(), FadePhase::Swapping);
    }

    #[test]
    fn retarget_only_in_fade_in() {
        let mut task = FadeTask::new(clip_target("b"), Ticks::from_u32(20), Easing::Linear, 1.0);
        task.update(Ticks::from_u32(10));
        task.retarget_fade_in(Volume::FULL);
        assert!((task.volume() - 0.5).abs() < 1e-6);
        task.update(Ticks::from_u32(10));
        assert_eq!(task.phase(), FadePhase::Swapping);

        task.begin_fade_in(Volume::FULL);
        task.update(Ticks::from_u32(10));
        task.retarget_fade_in(Volume::SILENT);
        assert!((task.volume() - 0.5).abs() < 1e-6);
        task.update(Ticks::from_u32(5));
        assert!((task.volume() - 0.25).abs() < 1e-6);
        task.update(Ticks::from_u32(5));
        assert!(task.is_finished());
        assert_eq!(task.volume(), 0.0);
    }
}
