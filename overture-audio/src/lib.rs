//! Music crossfade controller and playback backends.
//!
//! The [`AudioController`] owns two channels (one-shot effects and looping music),
//! plays effects right away and changes the music track with a fade-out/fade-in,
//! advanced by an externally driven [`AudioController::update`] tick.

mod channel;
mod controller;
mod cue_player;
mod fade;

pub mod backend;

pub use channel::AudioChannel;
pub use controller::{AudioController, DEFAULT_FADE, PlayOutcome};
pub use cue_player::{CuePlayer, CueReport};
pub use fade::{FadePhase, FadeTarget, FadeTask};
