use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use overture_audio::{
    AudioController, CuePlayer,
    backend::kira_channel::{CpalBackend, KiraOutput, KiraSettings, StaticSoundData, load_clip},
};
use overture_core::{clip::ClipRegistry, cue::CueSheet, time::Ticks, volume::ChannelKind};
use tracing::{debug, info};

use crate::bank::SoundBank;

fn load_clips(
    bank: &SoundBank,
    channel: ChannelKind,
) -> Result<ClipRegistry<StaticSoundData>> {
    bank.clips(channel).try_map(|id, path| {
        debug!("Loading {} clip {} from {}", channel, id, path);
        load_clip(path.as_std_path()).with_context(|| format!("Loading {} clip {}", id, path))
    })
}

/// Plays the sheet through the default audio device in real time.
pub fn play(sheet: &CueSheet, bank: &SoundBank, ticks_per_second: f32) -> Result<()> {
    let output = KiraOutput::<CpalBackend>::new(KiraSettings::default())
        .context("Opening the audio device")?;

    let mut controller = AudioController::with_settings(
        output.channel(ChannelKind::Effects),
        output.channel(ChannelKind::Music),
        load_clips(bank, ChannelKind::Effects)?,
        load_clips(bank, ChannelKind::Music)?,
        bank.volume.to_settings(),
    );
    controller.set_fade_easing(bank.fade_easing);

    let mut player = CuePlayer::new(sheet).with_default_fade(bank.default_fade());
    let frame = Duration::from_secs_f32(1.0 / ticks_per_second.max(1.0));

    info!(
        "Playing {} ({} cues)",
        sheet.name.as_deref().unwrap_or("cue sheet"),
        player.timeline().len()
    );

    let mut last = Instant::now();
    let mut delta = Ticks::ZERO;
    while !player.is_finished(&controller) {
        for report in player.update(delta, &mut controller) {
            let cue = &player.timeline().cues()[report.index];
            info!("{} {:?} -> {}", player.time(), cue.action, report.outcome);
        }

        std::thread::sleep(frame);
        let now = Instant::now();
        delta = Ticks::from_duration(now - last);
        last = now;
    }

    // music loops until stopped
    controller.stop_music(Ticks::ZERO);
    info!("Finished at {}", player.time());
    Ok(())
}
