//! Audio cue sheets: the sound timeline of a cutscene.
//!
//! A sheet is a list of cuts, each starting at an absolute time and holding cues
//! timed relative to the cut start. Every cue performs one action on the audio controller.

mod timeline;

use serde::{Deserialize, Serialize};
use snafu::{Snafu, ensure};

pub use timeline::{TimedCue, Timeline};

use crate::{clip::ClipId, volume::ChannelKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueSheet {
    #[serde(default)]
    pub name: Option<String>,
    pub cuts: Vec<Cut>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cut {
    /// Absolute start of the cut, in seconds.
    pub start: f32,
    #[serde(default)]
    pub cues: Vec<Cue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Offset from the start of the cut, in seconds.
    pub at: f32,
    pub action: CueAction,
}

/// Fade durations are in seconds, `None` means the controller default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CueAction {
    Effect(ClipId),
    Music {
        id: ClipId,
        #[serde(default)]
        fade: Option<f32>,
    },
    StopMusic {
        #[serde(default)]
        fade: Option<f32>,
    },
    MasterVolume(f32),
    EffectsVolume(f32),
    MusicVolume(f32),
    ToggleEffectsMute,
    ToggleMusicMute,
}

impl CueAction {
    /// The clip this action refers to, and the channel it is looked up for.
    pub fn clip(&self) -> Option<(ChannelKind, &ClipId)> {
        match self {
            CueAction::Effect(id) => Some((ChannelKind::Effects, id)),
            CueAction::Music { id, .. } => Some((ChannelKind::Music, id)),
            _ => None,
        }
    }

    fn fade(&self) -> Option<f32> {
        match *self {
            CueAction::Music { fade, .. } | CueAction::StopMusic { fade } => fade,
            _ => None,
        }
    }
}

#[derive(Debug, Snafu)]
pub enum CueSheetError {
    #[snafu(display("Cut {cut} starts at an invalid time {start}s"))]
    InvalidCutStart { cut: usize, start: f32 },
    #[snafu(display("Cut {cut} starts at {start}s, before the previous cut at {previous}s"))]
    CutsOutOfOrder {
        cut: usize,
        start: f32,
        previous: f32,
    },
    #[snafu(display("Cue {cue} of cut {cut} has an invalid offset {at}s"))]
    InvalidCueOffset { cut: usize, cue: usize, at: f32 },
    #[snafu(display("Cue {cue} of cut {cut} has an invalid fade duration {fade}s"))]
    InvalidFade { cut: usize, cue: usize, fade: f32 },
}

fn valid_time(seconds: f32) -> bool {
    seconds.is_finite() && seconds >= 0.0
}

impl CueSheet {
    /// Checks that all times are usable and cuts are in order.
    ///
    /// Cues inside a cut may be listed in any order.
    pub fn validate(&self) -> Result<(), CueSheetError> {
        let mut previous = 0.0;
        for (cut_index, cut) in self.cuts.iter().enumerate() {
            ensure!(
                valid_time(cut.start),
                InvalidCutStartSnafu {
                    cut: cut_index,
                    start: cut.start,
                }
            );
            ensure!(
                cut.start >= previous,
                CutsOutOfOrderSnafu {
                    cut: cut_index,
                    start: cut.start,
                    previous,
                }
            );
            previous = cut.start;

            for (cue_index, cue) in cut.cues.iter().enumerate() {
                ensure!(
                    valid_time(cue.at),
                    InvalidCueOffsetSnafu {
                        cut: cut_index,
                        cue: cue_index,
                        at: cue.at,
                    }
                );
                if let Some(fade) = cue.action.fade() {
                    ensure!(
                        valid_time(fade),
                        InvalidFadeSnafu {
                            cut: cut_index,
                            cue: cue_index,
                            fade,
                        }
                    );
                }
            }
        }

        Ok(())
    }

    /// All clips referenced by the sheet, in order of appearance, without duplicates.
    pub fn referenced_clips(&self) -> Vec<(ChannelKind, &ClipId)> {
        use itertools::Itertools;

        self.cuts
            .iter()
            .flat_map(|cut| cut.cues.iter())
            .filter_map(|cue| cue.action.clip())
            .unique()
            .collect()
    }

    pub fn timeline(&self) -> Timeline {
        Timeline::new(self)
    }
}
