//! Mixer volume settings shared by the effect and music channels.

use enum_map::{Enum, EnumMap, enum_map};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::warn;

/// Defines a volume value in the range [0.0, 1.0], on the linear scale.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Volume(f32);

impl Volume {
    pub const SILENT: Self = Self(0.0);
    pub const FULL: Self = Self(1.0);

    /// Makes a volume, clamping the value into range.
    ///
    /// Out of range values are not an error, but they are reported.
    pub fn new(value: f32) -> Self {
        let (volume, clamped) = Self::clamp(value);
        if clamped {
            warn!("Volume {} is out of range, clamped to {}", value, volume.0);
        }
        volume
    }

    /// Clamps the value into range, also reporting whether it was out of range.
    ///
    /// NaN is treated as silence.
    pub fn clamp(value: f32) -> (Self, bool) {
        if value.is_nan() {
            return (Self::SILENT, true);
        }
        let clamped = value.clamp(0.0, 1.0);
        (Self(clamped), clamped != value)
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::FULL
    }
}

impl<'de> Deserialize<'de> for Volume {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f32::deserialize(deserializer).map(Self::new)
    }
}

/// One of the two logical audio outputs.
#[derive(Enum, EnumIter, Display, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChannelKind {
    /// One-shot sound effects, never looping, may overlap.
    Effects,
    /// The background track, always looping, one clip at a time.
    Music,
}

impl ChannelKind {
    pub fn loops(self) -> bool {
        match self {
            ChannelKind::Effects => false,
            ChannelKind::Music => true,
        }
    }
}

/// Master and per-channel volume levels plus mute flags.
///
/// The effective volume of a channel is never stored, it is always derived from these.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeSettings {
    master: Volume,
    levels: EnumMap<ChannelKind, Volume>,
    muted: EnumMap<ChannelKind, bool>,
}

impl VolumeSettings {
    pub fn new() -> Self {
        Self {
            master: Volume::FULL,
            levels: enum_map! { _ => Volume::FULL },
            muted: enum_map! { _ => false },
        }
    }

    pub fn master(&self) -> Volume {
        self.master
    }

    pub fn level(&self, channel: ChannelKind) -> Volume {
        self.levels[channel]
    }

    pub fn is_muted(&self, channel: ChannelKind) -> bool {
        self.muted[channel]
    }

    pub fn set_master(&mut self, volume: Volume) {
        self.master = volume;
    }

    pub fn set_level(&mut self, channel: ChannelKind, volume: Volume) {
        self.levels[channel] = volume;
    }

    pub fn set_muted(&mut self, channel: ChannelKind, muted: bool) {
        self.muted[channel] = muted;
    }

    /// Flips the mute flag of the channel, returning the new state.
    pub fn toggle_muted(&mut self, channel: ChannelKind) -> bool {
        self.muted[channel] = !self.muted[channel];
        self.muted[channel]
    }

    /// Channel level scaled by the master volume, ignoring the mute flag.
    pub fn unmuted(&self, channel: ChannelKind) -> Volume {
        Volume(self.levels[channel].0 * self.master.0)
    }

    /// The volume actually applied to the channel.
    pub fn effective(&self, channel: ChannelKind) -> Volume {
        if self.muted[channel] {
            Volume::SILENT
        } else {
            self.unmuted(channel)
        }
    }
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self::new()
    }
}
