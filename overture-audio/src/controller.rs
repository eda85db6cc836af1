use overture_core::{
    clip::ClipRegistry,
    time::{Easing, Ticks},
    volume::{ChannelKind, Volume, VolumeSettings},
};
use strum::Display;
use tracing::{debug, trace, warn};

use crate::{
    channel::AudioChannel,
    fade::{FadePhase, FadeTarget, FadeTask},
};

/// Fade duration used when the caller has no preference (one second).
pub const DEFAULT_FADE: Ticks = Ticks::from_f32(Ticks::TICKS_PER_SECOND);

/// How a play/stop request was handled.
///
/// None of these is an error: a request that can't be carried out is simply dropped.
#[derive(Display, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    Accepted,
    /// The channel is muted.
    Muted,
    /// The id has no clip in the registry.
    ClipNotFound,
    /// The music is already playing (or fading to) the requested clip.
    Redundant,
    /// Stop was requested, but no music is playing.
    NotPlaying,
}

/// Plays one-shot effects and crossfades the background music.
///
/// Nothing here runs on its own: fades only progress when [`AudioController::update`]
/// is called, and all calls are expected to come from the same thread as the updates.
pub struct AudioController<C: AudioChannel> {
    effects: C,
    music: C,
    effect_clips: ClipRegistry<C::Clip>,
    music_clips: ClipRegistry<C::Clip>,
    settings: VolumeSettings,
    fade_easing: Easing,
    music_fade: Option<FadeTask>,
}

impl<C: AudioChannel> AudioController<C> {
    pub fn new(
        effects: C,
        music: C,
        effect_clips: ClipRegistry<C::Clip>,
        music_clips: ClipRegistry<C::Clip>,
    ) -> Self {
        Self::with_settings(
            effects,
            music,
            effect_clips,
            music_clips,
            VolumeSettings::new(),
        )
    }

    pub fn with_settings(
        effects: C,
        music: C,
        effect_clips: ClipRegistry<C::Clip>,
        music_clips: ClipRegistry<C::Clip>,
        settings: VolumeSettings,
    ) -> Self {
        let mut controller = Self {
            effects,
            music,
            effect_clips,
            music_clips,
            settings,
            fade_easing: Easing::Linear,
            music_fade: None,
        };
        controller.apply_volume(ChannelKind::Effects);
        controller.apply_volume(ChannelKind::Music);
        controller
    }

    pub fn settings(&self) -> &VolumeSettings {
        &self.settings
    }

    pub fn effects(&self) -> &C {
        &self.effects
    }

    pub fn music(&self) -> &C {
        &self.music
    }

    /// The music transition in flight, if any.
    pub fn music_fade(&self) -> Option<&FadeTask> {
        self.music_fade.as_ref()
    }

    pub fn is_fading(&self) -> bool {
        self.music_fade.is_some()
    }

    /// Curve used by fades started after this call.
    pub fn set_fade_easing(&mut self, easing: Easing) {
        self.fade_easing = easing;
    }

    pub fn play_effect(&mut self, id: &str) -> PlayOutcome {
        if self.settings.is_muted(ChannelKind::Effects) {
            return PlayOutcome::Muted;
        }
        let Some((id, clip)) = self.effect_clips.get_entry(id) else {
            warn!("Tried to play effect {:?}, but there is no such clip", id);
            return PlayOutcome::ClipNotFound;
        };

        debug!("Playing effect {}", id);
        self.effects
            .set_volume(self.settings.unmuted(ChannelKind::Effects));
        self.effects.play_one_shot(id, clip);
        PlayOutcome::Accepted
    }

    /// Crossfades the music to the given clip.
    ///
    /// `fade` is used for each half of the transition, and the fade-out half runs even
    /// when nothing is playing. Supersedes any fade in flight, unless the channel is
    /// still playing `id`.
    pub fn play_music(&mut self, id: &str, fade: Ticks) -> PlayOutcome {
        if self.settings.is_muted(ChannelKind::Music) {
            return PlayOutcome::Muted;
        }
        let Some(id) = self.music_clips.get_entry(id).map(|(id, _)| id.clone()) else {
            warn!("Tried to play music {:?}, but there is no such clip", id);
            return PlayOutcome::ClipNotFound;
        };

        // what the channel is playing right now, even if a fade is about to replace it
        if self.music.is_playing() && self.music.current_clip() == Some(&id) {
            trace!("Music {} is already playing", id);
            return PlayOutcome::Redundant;
        }

        self.start_music_fade(FadeTarget::Clip(id), fade);
        PlayOutcome::Accepted
    }

    /// Fades the music out and stops it.
    pub fn stop_music(&mut self, fade: Ticks) -> PlayOutcome {
        if !self.music.is_playing() {
            return PlayOutcome::NotPlaying;
        }

        self.start_music_fade(FadeTarget::Silence, fade);
        PlayOutcome::Accepted
    }

    /// Returns the stored (clamped) value.
    pub fn set_master_volume(&mut self, volume: f32) -> Volume {
        let volume = Volume::new(volume);
        self.settings.set_master(volume);
        self.apply_volume(ChannelKind::Effects);
        self.apply_volume(ChannelKind::Music);
        volume
    }

    /// Returns the stored (clamped) value.
    pub fn set_effects_volume(&mut self, volume: f32) -> Volume {
        self.set_channel_volume(ChannelKind::Effects, volume)
    }

    /// Returns the stored (clamped) value.
    pub fn set_music_volume(&mut self, volume: f32) -> Volume {
        self.set_channel_volume(ChannelKind::Music, volume)
    }

    /// Returns whether the effects are muted now.
    pub fn toggle_effects_mute(&mut self) -> bool {
        self.toggle_mute(ChannelKind::Effects)
    }

    /// Returns whether the music is muted now.
    pub fn toggle_music_mute(&mut self) -> bool {
        self.toggle_mute(ChannelKind::Music)
    }

    /// Advances the music fade. Call once per frame.
    pub fn update(&mut self, delta_time: Ticks) {
        let Some(fade) = self.music_fade.as_mut() else {
            return;
        };
        trace!("Music fade {:?}: +{:?}", fade.phase(), delta_time);

        fade.update(delta_time);
        self.drive_music_fade();
    }

    fn set_channel_volume(&mut self, channel: ChannelKind, volume: f32) -> Volume {
        let volume = Volume::new(volume);
        self.settings.set_level(channel, volume);
        self.apply_volume(channel);
        volume
    }

    fn toggle_mute(&mut self, channel: ChannelKind) -> bool {
        let muted = self.settings.toggle_muted(channel);
        debug!("{} {}", channel, if muted { "muted" } else { "unmuted" });
        self.apply_volume(channel);
        muted
    }

    /// Pushes the effective volume to the channel.
    ///
    /// A fading music channel keeps following its fade, only the end point of a fade-in moves.
    fn apply_volume(&mut self, channel: ChannelKind) {
        let volume = self.settings.effective(channel);
        match channel {
            ChannelKind::Effects => self.effects.set_volume(volume),
            ChannelKind::Music => match self.music_fade.as_mut() {
                Some(fade) => {
                    fade.retarget_fade_in(volume);
                    self.drive_music_fade();
                }
                None => self.music.set_volume(volume),
            },
        }
    }

    fn start_music_fade(&mut self, target: FadeTarget, duration: Ticks) {
        if duration != duration.non_negative() {
            warn!("Invalid fade duration {:?}, fading immediately", duration);
        }

        // continue from wherever the previous fade left the volume
        let start_volume = match &self.music_fade {
            Some(fade) => fade.volume(),
            None => self.settings.effective(ChannelKind::Music).get(),
        };
        debug!(
            "Starting music fade to {:?} over {:?} from volume {}",
            target, duration, start_volume
        );

        self.music_fade = Some(FadeTask::new(
            target,
            duration,
            self.fade_easing,
            start_volume,
        ));
        self.drive_music_fade();
    }

    /// Applies the state of the fade to the music channel, performing the swap when it's due.
    fn drive_music_fade(&mut self) {
        let Some(fade) = self.music_fade.as_mut() else {
            return;
        };

        loop {
            match fade.phase() {
                FadePhase::FadingOut | FadePhase::FadingIn => {
                    self.music.set_volume(Volume::clamp(fade.volume()).0);
                    return;
                }
                FadePhase::Swapping => {
                    self.music.stop();
                    match fade.target().clone() {
                        FadeTarget::Silence => {
                            debug!("Music stopped");
                            fade.finish();
                        }
                        FadeTarget::Clip(id) => match self.music_clips.get(id.as_str()) {
                            Some(clip) => {
                                debug!("Music swapped to {}", id);
                                self.music.set_volume(Volume::SILENT);
                                self.music.play(&id, clip);
                                fade.begin_fade_in(self.settings.effective(ChannelKind::Music));
                            }
                            None => {
                                warn!("Music clip {} disappeared during the fade", id);
                                fade.finish();
                            }
                        },
                    }
                }
                FadePhase::Finished => {
                    self.music
                        .set_volume(self.settings.effective(ChannelKind::Music));
                    self.music_fade = None;
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use overture_core::{
        time::{Easing, Ticks},
        volume::ChannelKind,
    };

    use super::{AudioController, PlayOutcome};
    use crate::{
        backend::recording::{ChannelEvent, RecordingChannel},
        channel::AudioChannel,
        fade::FadePhase,
    };

    fn controller() -> AudioController<RecordingChannel> {
        AudioController::new(
            RecordingChannel::new(ChannelKind::Effects),
            RecordingChannel::new(ChannelKind::Music),
            [("click", ())].into_iter().collect(),
            [("title", ()), ("battle", ())].into_iter().collect(),
        )
    }

    fn seconds(seconds: f32) -> Ticks {
        Ticks::from_seconds(seconds)
    }

    #[test]
    fn applies_initial_volume() {
        let controller = controller();
        assert_eq!(controller.music().volume().get(), 1.0);
        assert_eq!(controller.effects().volume().get(), 1.0);
    }

    #[test]
    fn first_track_waits_for_fade_out() {
        let mut controller = controller();
        assert_eq!(
            controller.play_music("title", seconds(1.0)),
            PlayOutcome::Accepted
        );
        assert!(!controller.music().is_playing());
        assert_eq!(
            controller.music_fade().map(|fade| fade.phase()),
            Some(FadePhase::FadingOut)
        );

        controller.update(seconds(0.5));
        assert!(!controller.music().is_playing());

        controller.update(seconds(0.5));
        let music = controller.music();
        assert!(music.is_playing_clip("title"));
        assert_eq!(music.volume().get(), 0.0);
        assert_eq!(
            controller.music_fade().map(|fade| fade.phase()),
            Some(FadePhase::FadingIn)
        );

        controller.update(seconds(0.25));
        assert!((controller.music().volume().get() - 0.25).abs() < 1e-6);
        controller.update(seconds(0.75));
        assert!(!controller.is_fading());
        assert_eq!(controller.music().volume().get(), 1.0);
    }

    #[test]
    fn nan_duration_completes_immediately() {
        let mut controller = controller();
        controller.play_music("title", Ticks::ZERO);

        assert_eq!(
            controller.play_music("battle", Ticks::from_f32(f32::NAN)),
            PlayOutcome::Accepted
        );
        assert!(!controller.is_fading());
        assert!(controller.music().is_playing_clip("battle"));
        assert_eq!(controller.music().volume().get(), 1.0);

        assert_eq!(
            controller.stop_music(Ticks::from_f32(f32::INFINITY)),
            PlayOutcome::Accepted
        );
        assert!(!controller.music().is_playing());
        assert!(!controller.is_fading());
    }

    #[test]
    fn muted_requests_are_dropped() {
        let mut controller = controller();
        controller.toggle_music_mute();
        controller.toggle_effects_mute();

        assert_eq!(controller.play_music("title", seconds(1.0)), PlayOutcome::Muted);
        assert_eq!(controller.play_effect("click"), PlayOutcome::Muted);
        assert!(controller.music().playback_events().is_empty());
        assert!(controller.effects().playback_events().is_empty());
    }

    #[test]
    fn effect_uses_unmuted_level() {
        let mut controller = controller();
        controller.set_master_volume(0.5);
        controller.set_effects_volume(0.5);

        assert_eq!(controller.play_effect("click"), PlayOutcome::Accepted);
        assert_eq!(controller.play_effect("click"), PlayOutcome::Accepted);
        assert_eq!(controller.effects().volume().get(), 0.25);
        assert_eq!(
            controller.effects().playback_events(),
            vec![
                ChannelEvent::PlayOneShot("click".into()),
                ChannelEvent::PlayOneShot("click".into()),
            ]
        );
        assert_eq!(controller.effects().current_clip_str(), None);
    }

    #[test]
    fn stop_music_fades_out() {
        let mut controller = controller();
        controller.play_music("title", Ticks::ZERO);
        controller.set_music_volume(0.5);

        assert_eq!(controller.stop_music(seconds(1.0)), PlayOutcome::Accepted);
        controller.update(seconds(0.5));
        assert!((controller.music().volume().get() - 0.25).abs() < 1e-6);
        assert!(controller.music().is_playing_clip("title"));

        controller.update(seconds(0.5));
        assert!(!controller.music().is_playing());
        assert!(!controller.is_fading());
        // back to the static volume, ready for the next track
        assert_eq!(controller.music().volume().get(), 0.5);

        assert_eq!(controller.stop_music(seconds(1.0)), PlayOutcome::NotPlaying);
    }

    #[test]
    fn volume_change_during_fade_in_moves_the_target() {
        let mut controller = controller();
        controller.play_music("title", seconds(1.0));
        // time left over from the fade-out is not carried into the fade-in
        controller.update(seconds(1.0));
        controller.update(seconds(0.5));
        assert!((controller.music().volume().get() - 0.5).abs() < 1e-6);

        // no jump, but the fade now ends at 0.2
        controller.set_master_volume(0.2);
        assert!((controller.music().volume().get() - 0.5).abs() < 1e-6);
        controller.update(seconds(0.25));
        assert!((controller.music().volume().get() - 0.35).abs() < 1e-6);
        controller.update(seconds(0.25));
        assert!((controller.music().volume().get() - 0.2).abs() < 1e-6);
        assert!(!controller.is_fading());
    }

    #[test]
    fn eased_fades_keep_endpoints() {
        let mut controller = controller();
        controller.set_fade_easing(Easing::SineInOut);
        controller.play_music("title", seconds(1.0));
        controller.update(seconds(1.0));
        controller.update(seconds(0.25));
        let quarter = controller.music().volume().get();
        assert!(quarter > 0.0 && quarter < 0.25);
        controller.update(seconds(0.75));
        assert_eq!(controller.music().volume().get(), 1.0);
    }

    #[test]
    fn missing_music() {
        let mut controller = controller();
        assert_eq!(
            controller.play_music("credits", seconds(1.0)),
            PlayOutcome::ClipNotFound
        );
        assert!(!controller.is_fading());
    }
}
