use std::marker::PhantomData;

use overture_core::{
    clip::ClipId,
    volume::{ChannelKind, Volume},
};

use crate::channel::AudioChannel;

/// A call made to a [`RecordingChannel`].
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Play(ClipId),
    PlayOneShot(ClipId),
    Stop,
    SetVolume(f32),
}

/// A channel that outputs nothing and remembers every call made to it.
///
/// Clips never end on their own. Used by tests and by the CLI preview.
#[derive(Debug, Clone)]
pub struct RecordingChannel<C = ()> {
    kind: ChannelKind,
    current: Option<ClipId>,
    playing: bool,
    volume: Volume,
    events: Vec<ChannelEvent>,
    _clip: PhantomData<fn(&C)>,
}

impl<C> RecordingChannel<C> {
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            current: None,
            playing: false,
            volume: Volume::FULL,
            events: Vec::new(),
            _clip: PhantomData,
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn events(&self) -> &[ChannelEvent] {
        &self.events
    }

    /// Everything except volume changes.
    pub fn playback_events(&self) -> Vec<ChannelEvent> {
        self.events
            .iter()
            .filter(|event| !matches!(event, ChannelEvent::SetVolume(_)))
            .cloned()
            .collect()
    }

    pub fn take_events(&mut self) -> Vec<ChannelEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn current_clip_str(&self) -> Option<&str> {
        self.current.as_ref().map(ClipId::as_str)
    }

    pub fn is_playing_clip(&self, id: &str) -> bool {
        self.playing && self.current_clip_str() == Some(id)
    }
}

impl<C> AudioChannel for RecordingChannel<C> {
    type Clip = C;

    fn play(&mut self, id: &ClipId, _clip: &C) {
        self.current = Some(id.clone());
        self.playing = true;
        self.events.push(ChannelEvent::Play(id.clone()));
    }

    fn play_one_shot(&mut self, id: &ClipId, _clip: &C) {
        debug_assert!(!self.kind.loops(), "one-shots on a looping channel");
        self.events.push(ChannelEvent::PlayOneShot(id.clone()));
    }

    fn stop(&mut self) {
        self.playing = false;
        self.events.push(ChannelEvent::Stop);
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
        self.events.push(ChannelEvent::SetVolume(volume.get()));
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn current_clip(&self) -> Option<&ClipId> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use overture_core::{
        clip::ClipId,
        volume::{ChannelKind, Volume},
    };

    use super::{ChannelEvent, RecordingChannel};
    use crate::channel::AudioChannel;

    #[test]
    fn records_calls() {
        let mut channel = RecordingChannel::<()>::new(ChannelKind::Music);
        let id = ClipId::new("title");

        channel.set_volume(Volume::new(0.5));
        channel.play(&id, &());
        assert!(channel.is_playing_clip("title"));

        channel.stop();
        assert!(!channel.is_playing());
        assert_eq!(channel.current_clip(), Some(&id));

        similar_asserts::assert_eq!(
            channel.take_events(),
            vec![
                ChannelEvent::SetVolume(0.5),
                ChannelEvent::Play(id.clone()),
                ChannelEvent::Stop,
            ]
        );
        assert!(channel.events().is_empty());
    }
}
