use overture_core::{
    cue::{CueAction, CueSheet, TimedCue, Timeline},
    time::Ticks,
};
use tracing::{debug, info};

use crate::{
    channel::AudioChannel,
    controller::{AudioController, DEFAULT_FADE, PlayOutcome},
};

/// A cue that was fired, with the result of its action.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CueReport {
    /// Index into [`CuePlayer::timeline`].
    pub index: usize,
    pub outcome: PlayOutcome,
}

/// Plays a cue sheet on an [`AudioController`], driven by the same tick as the controller.
pub struct CuePlayer {
    timeline: Timeline,
    time: Ticks,
    next: usize,
    default_fade: Ticks,
}

impl CuePlayer {
    pub fn new(sheet: &CueSheet) -> Self {
        Self {
            timeline: sheet.timeline(),
            time: Ticks::ZERO,
            next: 0,
            default_fade: DEFAULT_FADE,
        }
    }

    /// Fade used by music cues that don't specify one.
    pub fn with_default_fade(mut self, fade: Ticks) -> Self {
        self.default_fade = fade.non_negative();
        self
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn time(&self) -> Ticks {
        self.time
    }

    /// Number of cues fired (or skipped) so far.
    pub fn position(&self) -> usize {
        self.next
    }

    /// All cues are fired and the music has settled.
    pub fn is_finished<C: AudioChannel>(&self, controller: &AudioController<C>) -> bool {
        self.next >= self.timeline.len() && !controller.is_fading()
    }

    /// Ticks the controller, then fires the cues that became due.
    ///
    /// Call with a zero delta first to fire the cues at the very start of the sheet.
    pub fn update<C: AudioChannel>(
        &mut self,
        delta_time: Ticks,
        controller: &mut AudioController<C>,
    ) -> Vec<CueReport> {
        controller.update(delta_time);
        self.time += delta_time;

        let due = self.timeline.due_count(self.time);
        let mut reports = Vec::new();
        while self.next < due {
            let cue = &self.timeline.cues()[self.next];
            let outcome = self.apply(cue, controller, false);
            debug!("Cue {} at {:?}: {:?} -> {}", self.next, cue.at, cue.action, outcome);
            reports.push(CueReport {
                index: self.next,
                outcome,
            });
            self.next += 1;
        }
        reports
    }

    /// Jumps to `time` without waiting.
    ///
    /// Skipped effects are not played. Skipped music changes and volume changes are applied
    /// in order with no fades, so the mixer ends up where it would have been.
    /// Jumping backwards is not supported and only moves the timer.
    pub fn skip_to<C: AudioChannel>(&mut self, time: Ticks, controller: &mut AudioController<C>) {
        let due = self.timeline.due_count(time);
        info!(
            "Skipping from {:?} to {:?} ({} cues)",
            self.time,
            time,
            due.saturating_sub(self.next)
        );

        while self.next < due {
            let cue = &self.timeline.cues()[self.next];
            self.apply(cue, controller, true);
            self.next += 1;
        }
        self.time = time;
    }

    fn fade(&self, fade: Option<f32>, skipping: bool) -> Ticks {
        if skipping {
            return Ticks::ZERO;
        }
        fade.map_or(self.default_fade, Ticks::from_seconds_clamped)
    }

    fn apply<C: AudioChannel>(
        &self,
        cue: &TimedCue,
        controller: &mut AudioController<C>,
        skipping: bool,
    ) -> PlayOutcome {
        match &cue.action {
            CueAction::Effect(_) if skipping => PlayOutcome::Accepted,
            CueAction::Effect(id) => controller.play_effect(id.as_str()),
            CueAction::Music { id, fade } => {
                controller.play_music(id.as_str(), self.fade(*fade, skipping))
            }
            CueAction::StopMusic { fade } => controller.stop_music(self.fade(*fade, skipping)),
            CueAction::MasterVolume(volume) => {
                controller.set_master_volume(*volume);
                PlayOutcome::Accepted
            }
            CueAction::EffectsVolume(volume) => {
                controller.set_effects_volume(*volume);
                PlayOutcome::Accepted
            }
            CueAction::MusicVolume(volume) => {
                controller.set_music_volume(*volume);
                PlayOutcome::Accepted
            }
            CueAction::ToggleEffectsMute => {
                controller.toggle_effects_mute();
                PlayOutcome::Accepted
            }
            CueAction::ToggleMusicMute => {
                controller.toggle_music_mute();
                PlayOutcome::Accepted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use overture_core::{
        clip::ClipId,
        cue::{Cue, CueAction, CueSheet, Cut},
        time::Ticks,
        volume::ChannelKind,
    };

    use super::CuePlayer;
    use crate::{
        AudioController, PlayOutcome,
        backend::recording::{ChannelEvent, RecordingChannel},
    };

    fn controller() -> AudioController<RecordingChannel> {
        AudioController::new(
            RecordingChannel::new(ChannelKind::Effects),
            RecordingChannel::new(ChannelKind::Music),
            [("door", ()), ("step", ())].into_iter().collect(),
            [("title", ()), ("battle", ())].into_iter().collect(),
        )
    }

    fn cue(at: f32, action: CueAction) -> Cue {
        Cue { at, action }
    }

    fn sheet() -> CueSheet {
        CueSheet {
            name: Some("opening".to_string()),
            cuts: vec![
                Cut {
                    start: 0.0,
                    cues: vec![
                        cue(
                            0.0,
                            CueAction::Music {
                                id: ClipId::new("title"),
                                fade: Some(0.5),
                            },
                        ),
                        cue(1.0, CueAction::Effect(ClipId::new("door"))),
                    ],
                },
                Cut {
                    start: 2.0,
                    cues: vec![
                        cue(0.0, CueAction::Effect(ClipId::new("missing"))),
                        cue(
                            0.5,
                            CueAction::Music {
                                id: ClipId::new("battle"),
                                fade: None,
                            },
                        ),
                        cue(0.5, CueAction::MusicVolume(0.5)),
                    ],
                },
            ],
        }
    }

    fn seconds(seconds: f32) -> Ticks {
        Ticks::from_seconds(seconds)
    }

    #[test]
    fn fires_cues_in_time() {
        let mut controller = controller();
        let mut player = CuePlayer::new(&sheet());

        let reports = player.update(Ticks::ZERO, &mut controller);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].outcome, PlayOutcome::Accepted);
        assert!(controller.is_fading());

        // the title starts once the fade-out half is over
        assert!(player.update(seconds(0.5), &mut controller).is_empty());
        assert!(controller.music().is_playing_clip("title"));

        let reports = player.update(seconds(0.5), &mut controller);
        assert!(!controller.is_fading());
        assert_eq!(reports.len(), 1);
        assert_eq!(
            controller.effects().playback_events(),
            vec![ChannelEvent::PlayOneShot(ClipId::new("door"))]
        );

        let reports = player.update(seconds(1.0), &mut controller);
        assert_eq!(reports[0].outcome, PlayOutcome::ClipNotFound);

        let reports = player.update(seconds(0.5), &mut controller);
        assert_eq!(
            reports.iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![3, 4]
        );
        assert!(controller.is_fading());
        assert!(!player.is_finished(&controller));

        // default fade is one second per half
        for _ in 0..120 {
            player.update(Ticks::from_u32(1), &mut controller);
        }
        assert!(player.is_finished(&controller));
        assert!(controller.music().is_playing_clip("battle"));
        assert!((controller.music().volume().get() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn skip_applies_state_without_effects() {
        let mut controller = controller();
        let mut player = CuePlayer::new(&sheet());

        player.skip_to(seconds(3.0), &mut controller);
        assert_eq!(player.position(), 5);
        assert!(player.is_finished(&controller));
        assert!(controller.music().is_playing_clip("battle"));
        assert_eq!(controller.music().volume().get(), 0.5);
        assert!(controller.effects().playback_events().is_empty());
    }
}
