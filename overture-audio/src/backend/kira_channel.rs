use std::{path::Path, sync::Arc};

use kira::{
    manager::{AudioManager, AudioManagerSettings, backend::Backend},
    sound::{
        FromFileError, PlaybackState,
        static_sound::StaticSoundHandle,
    },
    tween::Tween,
};
use overture_core::{
    clip::ClipId,
    volume::{ChannelKind, Volume},
};
use parking_lot::Mutex;
use tracing::{trace, warn};

use crate::channel::AudioChannel;

pub use kira::{manager::AudioManagerSettings as KiraSettings, sound::static_sound::StaticSoundData};
#[cfg(feature = "cpal")]
pub use kira::manager::backend::cpal::CpalBackend;

fn amplitude(volume: Volume) -> kira::Volume {
    kira::Volume::Amplitude(volume.get() as f64)
}

fn is_alive(handle: &StaticSoundHandle) -> bool {
    !matches!(handle.state(), PlaybackState::Stopped)
}

/// A kira audio manager shared by the channels created from it.
pub struct KiraOutput<B: Backend> {
    manager: Arc<Mutex<AudioManager<B>>>,
}

impl<B: Backend> Clone for KiraOutput<B> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
        }
    }
}

impl<B: Backend> KiraOutput<B> {
    pub fn new(settings: AudioManagerSettings<B>) -> Result<Self, B::Error> {
        let manager = AudioManager::new(settings)?;

        Ok(Self {
            manager: Arc::new(Mutex::new(manager)),
        })
    }

    pub fn channel(&self, kind: ChannelKind) -> KiraChannel<B> {
        KiraChannel {
            kind,
            output: self.clone(),
            current: None,
            handle: None,
            one_shots: Vec::new(),
            volume: Volume::FULL,
        }
    }

    fn play(&self, data: StaticSoundData) -> Option<StaticSoundHandle> {
        let mut manager = self.manager.lock();

        match manager.play(data) {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!("Failed to start playing audio: {:?}", err);
                None
            }
        }
    }
}

/// Decodes a whole clip into memory.
pub fn load_clip(path: &Path) -> Result<StaticSoundData, FromFileError> {
    StaticSoundData::from_file(path)
}

/// Plays [`StaticSoundData`] clips through a [`KiraOutput`].
///
/// The music channel loops its clip over its whole length.
pub struct KiraChannel<B: Backend> {
    kind: ChannelKind,
    output: KiraOutput<B>,
    current: Option<ClipId>,
    handle: Option<StaticSoundHandle>,
    one_shots: Vec<StaticSoundHandle>,
    volume: Volume,
}

impl<B: Backend> AudioChannel for KiraChannel<B> {
    type Clip = StaticSoundData;

    fn play(&mut self, id: &ClipId, clip: &StaticSoundData) {
        self.stop();

        let mut data = clip.clone().volume(amplitude(self.volume));
        if self.kind.loops() {
            data = data.loop_region(..);
        }

        self.handle = self.output.play(data);
        self.current = Some(id.clone());
    }

    fn play_one_shot(&mut self, id: &ClipId, clip: &StaticSoundData) {
        self.one_shots.retain(is_alive);

        trace!(
            "{} one-shot {} ({} still playing)",
            self.kind,
            id,
            self.one_shots.len()
        );
        let data = clip.clone().volume(amplitude(self.volume));
        if let Some(handle) = self.output.play(data) {
            self.one_shots.push(handle);
        }
    }

    fn stop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.stop(Tween::default());
        }
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;

        // the controller updates the volume every tick during a fade, the default tween smooths the steps
        if let Some(handle) = self.handle.as_mut() {
            handle.set_volume(amplitude(volume), Tween::default());
        }
        for handle in self.one_shots.iter_mut() {
            handle.set_volume(amplitude(volume), Tween::default());
        }
    }

    fn is_playing(&self) -> bool {
        self.handle.as_ref().is_some_and(is_alive)
    }

    fn current_clip(&self) -> Option<&ClipId> {
        self.current.as_ref()
    }
}
