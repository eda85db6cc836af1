use camino::Utf8PathBuf;
use overture_audio::{
    AudioChannel, AudioController, CuePlayer, CueReport, backend::recording::RecordingChannel,
};
use overture_core::{cue::CueSheet, time::Ticks, volume::ChannelKind};
use tracing::warn;

use crate::bank::SoundBank;

type PreviewController = AudioController<RecordingChannel<Utf8PathBuf>>;

pub struct PreviewOptions {
    pub ticks_per_second: f32,
    /// Print the music state every that many ticks.
    pub every: u32,
    /// Give up this long after the last cue, in case a fade never settles.
    pub grace: Ticks,
}

fn music_state(controller: &PreviewController) -> String {
    let music = controller.music();
    let mut line = format!(
        "music={} {} vol={:.3}",
        music.current_clip_str().unwrap_or("-"),
        if music.is_playing() { "playing" } else { "stopped" },
        music.volume().get()
    );
    if let Some(fade) = controller.music_fade() {
        line += &format!(" fade={}", fade.phase());
        if let Some(target) = fade.target().clip() {
            line += &format!("->{}", target);
        }
    }
    line
}

fn report_line(player: &CuePlayer, report: &CueReport) -> String {
    let cue = &player.timeline().cues()[report.index];
    format!(
        "cue #{} (cut {}): {:?} -> {}",
        report.index, cue.cut, cue.action, report.outcome
    )
}

/// Runs the sheet against silent channels, returning the printed timeline.
pub fn preview(sheet: &CueSheet, bank: &SoundBank, options: &PreviewOptions) -> Vec<String> {
    let mut controller = AudioController::with_settings(
        RecordingChannel::new(ChannelKind::Effects),
        RecordingChannel::new(ChannelKind::Music),
        bank.clips(ChannelKind::Effects),
        bank.clips(ChannelKind::Music),
        bank.volume.to_settings(),
    );
    controller.set_fade_easing(bank.fade_easing);

    let mut player = CuePlayer::new(sheet).with_default_fade(bank.default_fade());
    let delta = Ticks::from_seconds(1.0 / options.ticks_per_second.max(1.0));
    let deadline = player.timeline().end() + options.grace;

    let mut output = Vec::new();
    let mut emit = |player: &CuePlayer, controller: &PreviewController, reports: &[CueReport]| {
        let time = player.time().as_seconds();
        for report in reports {
            output.push(format!("{:.3}s {}", time, report_line(player, report)));
        }
        output.push(format!("{:.3}s {}", time, music_state(controller)));
    };

    let reports = player.update(Ticks::ZERO, &mut controller);
    emit(&player, &controller, &reports);

    let mut tick = 0u32;
    while !player.is_finished(&controller) {
        if player.time() > deadline {
            warn!("The sheet did not settle {:?} after the last cue", options.grace);
            break;
        }

        let reports = player.update(delta, &mut controller);
        tick += 1;
        if !reports.is_empty() || tick % options.every.max(1) == 0 {
            emit(&player, &controller, &reports);
        }
    }

    emit(&player, &controller, &[]);
    output
}
