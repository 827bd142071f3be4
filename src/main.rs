mod extractor;
mod keys;
mod mapping;
mod note;
mod player;

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use env_logger::Env;
use midi_file::MidiFile;

use crate::extractor::TrackMessage;
use crate::keys::ConsoleKeyboard;
use crate::mapping::KeyMapping;
use crate::player::Player;

#[derive(Parser, Debug)]
#[command(version, about = "Replay a MIDI file as timed key presses")]
struct Args {
    /// MIDI file to perform.
    midi_file: PathBuf,

    /// JSON table from MIDI note number to key label.
    #[arg(short, long, default_value = "mapping.json")]
    mapping: PathBuf,

    /// Multiplier applied to every note offset.
    #[arg(short, long, default_value_t = 1.0)]
    speed_modifier: f64,

    /// Grace period in seconds before the first press.
    #[arg(short = 'd', long, default_value_t = 2.0)]
    startup_delay: f64,

    /// Print each track's note-onset numbers instead of playing.
    #[arg(long)]
    print_sheet: bool,

    /// Write the extracted sheet as JSON instead of playing.
    #[arg(long)]
    export_sheet: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    ensure!(
        args.speed_modifier >= 0.0,
        "speed modifier must be non-negative"
    );
    ensure!(
        args.startup_delay >= 0.0,
        "startup delay must be non-negative"
    );

    let mapping = KeyMapping::load(&args.mapping).context("load key mapping")?;
    log::info!(
        "mapping {}: {} notes mapped",
        args.mapping.display(),
        mapping.len()
    );

    let file = MidiFile::load(&args.midi_file).context("load midi file")?;
    let tracks = extractor::decode_tracks(&file);
    log::info!(
        "{}: decoded {} tracks",
        args.midi_file.display(),
        tracks.len()
    );

    if args.print_sheet {
        print_sheet(&tracks);
        return Ok(());
    }

    let sheet = extractor::extract(&tracks, &mapping);
    log::info!("extracted {} notes", sheet.len());

    if let Some(path) = &args.export_sheet {
        let json = serde_json::to_string_pretty(&sheet).context("serialize sheet")?;
        std::fs::write(path, json)
            .with_context(|| format!("write sheet to {}", path.display()))?;
        return Ok(());
    }

    let player = Player::new(ConsoleKeyboard::new(), args.speed_modifier);
    log::info!("playback starts in {:.1}s", args.startup_delay);
    let summary = player.perform(sheet, args.startup_delay);
    log::info!(
        "done: {} pressed, {} skipped, {} failed",
        summary.pressed,
        summary.skipped,
        summary.failed
    );

    Ok(())
}

/// One line per track: the note numbers of its onsets, space separated.
fn print_sheet(tracks: &[Vec<TrackMessage>]) {
    for messages in tracks {
        let onsets: Vec<String> = messages
            .iter()
            .filter_map(|msg| match *msg {
                TrackMessage::NoteOn { note, velocity, .. } if velocity > 0 => {
                    Some(note.to_string())
                }
                _ => None,
            })
            .collect();
        println!("{}", onsets.join(" "));
    }
}
