mod bank;
#[cfg(feature = "cpal")]
mod playback;
mod preview;

use anyhow::{Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use itertools::Itertools;
use overture_core::{cue::CueSheet, time::Ticks};
use tracing_subscriber::EnvFilter;

use crate::{
    bank::{SoundBank, load_cue_sheet, locate_bank},
    preview::PreviewOptions,
};

#[derive(clap::Parser, Debug)]
struct Args {
    #[clap(subcommand)]
    action: Action,
}

#[derive(clap::Args, Debug)]
struct SheetArgs {
    sheet_path: Utf8PathBuf,
    /// Sound bank to resolve clips with, defaults to `bank.ron` next to the sheet
    #[clap(short, long)]
    bank: Option<Utf8PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Action {
    /// Simulate the sheet without audio output and print what happens to the music
    Preview {
        #[clap(flatten)]
        sheet: SheetArgs,
        #[clap(long, default_value = "60")]
        tps: f32,
        /// Print the music state every N ticks
        #[clap(short, long, default_value = "30")]
        every: u32,
    },
    /// Check the sheet and that the bank has every clip it refers to
    Validate {
        #[clap(flatten)]
        sheet: SheetArgs,
    },
    /// Play the sheet through the default audio device
    #[cfg(feature = "cpal")]
    Play {
        #[clap(flatten)]
        sheet: SheetArgs,
        #[clap(long, default_value = "60")]
        tps: f32,
    },
}

fn load(args: &SheetArgs) -> Result<(CueSheet, SoundBank)> {
    let sheet = load_cue_sheet(&args.sheet_path)?;
    let bank_path = locate_bank(args.bank.as_deref(), &args.sheet_path)?;
    let bank = SoundBank::load(&bank_path)?;
    Ok((sheet, bank))
}

fn validate(sheet_path: &Utf8Path, sheet: &CueSheet, bank: &SoundBank) -> Result<()> {
    let missing = bank.missing_clips(sheet);
    if !missing.is_empty() {
        bail!(
            "{} refers to clips missing from the sound bank:\n{}",
            sheet_path,
            missing
                .iter()
                .map(|(channel, id)| format!("  {} {}", channel, id))
                .join("\n")
        );
    }

    let timeline = sheet.timeline();
    println!(
        "{}: {} cuts, {} cues, last cue at {}",
        sheet.name.as_deref().unwrap_or(sheet_path.as_str()),
        sheet.cuts.len(),
        timeline.len(),
        timeline.end()
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .init();
    let args = Args::parse();
    match args.action {
        Action::Preview { sheet, tps, every } => {
            let (cue_sheet, bank) = load(&sheet)?;
            let options = PreviewOptions {
                ticks_per_second: tps,
                every,
                grace: Ticks::from_seconds(60.0),
            };
            for line in preview::preview(&cue_sheet, &bank, &options) {
                println!("{}", line);
            }
            Ok(())
        }
        Action::Validate { sheet } => {
            let (cue_sheet, bank) = load(&sheet)?;
            validate(&sheet.sheet_path, &cue_sheet, &bank)
        }
        #[cfg(feature = "cpal")]
        Action::Play { sheet, tps } => {
            let (cue_sheet, bank) = load(&sheet)?;
            playback::play(&cue_sheet, &bank, tps)
        }
    }
}
