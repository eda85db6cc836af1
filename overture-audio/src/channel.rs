use overture_core::{clip::ClipId, volume::Volume};

/// A single audio output line, as seen by the [`AudioController`](crate::AudioController).
///
/// The controller uses two instances: one for effects and one for music.
/// Whether the channel loops is a property of the channel, not of the call.
pub trait AudioChannel {
    /// The playable resource the clip registries hold.
    type Clip;

    /// Starts playing the clip from the beginning, replacing the current one.
    fn play(&mut self, id: &ClipId, clip: &Self::Clip);

    /// Plays the clip once on top of whatever is already playing.
    ///
    /// Does not change [`AudioChannel::current_clip`].
    fn play_one_shot(&mut self, id: &ClipId, clip: &Self::Clip);

    /// Stops the current clip. The clip id is kept.
    fn stop(&mut self);

    fn set_volume(&mut self, volume: Volume);

    fn is_playing(&self) -> bool;

    /// The last clip started with [`AudioChannel::play`], if any.
    fn current_clip(&self) -> Option<&ClipId>;
}
