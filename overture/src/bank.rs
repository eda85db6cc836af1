use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use overture_core::{
    clip::{ClipId, ClipRegistry},
    cue::CueSheet,
    time::{Easing, Ticks},
    volume::{ChannelKind, Volume, VolumeSettings},
};
use serde::Deserialize;
use tracing::{debug, instrument, trace};

/// Initial mixer state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    pub master: Volume,
    pub effects: Volume,
    pub music: Volume,
    pub effects_muted: bool,
    pub music_muted: bool,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            master: Volume::FULL,
            effects: Volume::FULL,
            music: Volume::FULL,
            effects_muted: false,
            music_muted: false,
        }
    }
}

impl VolumeConfig {
    pub fn to_settings(&self) -> VolumeSettings {
        let mut settings = VolumeSettings::new();
        settings.set_master(self.master);
        settings.set_level(ChannelKind::Effects, self.effects);
        settings.set_level(ChannelKind::Music, self.music);
        settings.set_muted(ChannelKind::Effects, self.effects_muted);
        settings.set_muted(ChannelKind::Music, self.music_muted);
        settings
    }
}

fn default_fade() -> f32 {
    1.0
}

/// Describes the clips a cue sheet can use and the initial mixer state.
///
/// Clip paths are relative to the bank file.
#[derive(Debug, Clone, Deserialize)]
pub struct SoundBank {
    #[serde(default)]
    pub effects: IndexMap<ClipId, Utf8PathBuf>,
    #[serde(default)]
    pub music: IndexMap<ClipId, Utf8PathBuf>,
    #[serde(default)]
    pub volume: VolumeConfig,
    /// In seconds.
    #[serde(default = "default_fade")]
    pub default_fade: f32,
    #[serde(default)]
    pub fade_easing: Easing,
}

impl SoundBank {
    pub fn parse(text: &str, base_dir: &Utf8Path) -> Result<Self> {
        let mut bank: SoundBank = ron::from_str(text).context("Parsing sound bank")?;

        for path in bank.effects.values_mut().chain(bank.music.values_mut()) {
            if path.is_relative() {
                *path = base_dir.join(&*path);
            }
        }

        Ok(bank)
    }

    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Reading sound bank {}", path))?;
        let base_dir = path.parent().unwrap_or(Utf8Path::new("."));
        Self::parse(&text, base_dir).with_context(|| format!("Loading sound bank {}", path))
    }

    pub fn clips(&self, channel: ChannelKind) -> ClipRegistry<Utf8PathBuf> {
        match channel {
            ChannelKind::Effects => self.effects.clone().into(),
            ChannelKind::Music => self.music.clone().into(),
        }
    }

    pub fn default_fade(&self) -> Ticks {
        Ticks::from_seconds_clamped(self.default_fade)
    }

    /// Clips the sheet refers to that are not in the bank.
    pub fn missing_clips<'a>(&self, sheet: &'a CueSheet) -> Vec<(ChannelKind, &'a ClipId)> {
        sheet
            .referenced_clips()
            .into_iter()
            .filter(|(channel, id)| {
                let table = match channel {
                    ChannelKind::Effects => &self.effects,
                    ChannelKind::Music => &self.music,
                };
                !table.contains_key(id.as_str())
            })
            .collect()
    }
}

pub fn load_cue_sheet(path: &Utf8Path) -> Result<CueSheet> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Reading cue sheet {}", path))?;
    let sheet: CueSheet =
        ron::from_str(&text).with_context(|| format!("Parsing cue sheet {}", path))?;
    sheet
        .validate()
        .with_context(|| format!("Validating cue sheet {}", path))?;
    Ok(sheet)
}

/// Implements the logic for locating the sound bank.
///
/// The candidates are (in order)
/// 1. The file specified on the command line with the `--bank` option
/// 2. The file specified in the `OVERTURE_BANK` environment variable
/// 3. `bank.ron` next to the cue sheet
/// 4. `bank.ron` in the current working directory
///
/// The first one that exists is used.
#[instrument]
pub fn locate_bank(cli_bank: Option<&Utf8Path>, sheet_path: &Utf8Path) -> Result<Utf8PathBuf> {
    let mut try_list = Vec::new();

    if let Some(cli_bank) = cli_bank {
        try_list.push(cli_bank.to_path_buf());
    }

    if let Ok(env_bank) = std::env::var("OVERTURE_BANK") {
        try_list.push(Utf8PathBuf::from(env_bank));
    }

    if let Some(sheet_dir) = sheet_path.parent() {
        try_list.push(sheet_dir.join("bank.ron"));
    }

    try_list.push(Utf8PathBuf::from("bank.ron"));

    for path in try_list.iter() {
        trace!("Trying sound bank {}...", path);
        if path.is_file() {
            debug!("Using sound bank {}", path);
            return Ok(path.clone());
        }
    }

    bail!("Failed to locate the sound bank, tried: {:#?}", try_list);
}
