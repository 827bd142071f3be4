use midi_file::core::Message;
use midi_file::file::{Event, MetaEvent};
use midi_file::MidiFile;
use thiserror::Error;

use crate::mapping::KeyMapping;
use crate::note::{Note, Sheet};

/// Tempo divisor in effect before any set-tempo event: 500 ms per quarter
/// note, i.e. 120 BPM.
const DEFAULT_TEMPO_DIVISOR: u32 = 500;

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    /// A set-tempo event below 1000 µs/quarter produces a divisor of zero,
    /// which cannot convert ticks to seconds.
    #[error("tempo divisor is zero at tick {tick}")]
    InvalidTempo { tick: u64 },
}

/// The decoded message form the extractor consumes. The byte-level container
/// format stays behind the `midi_file` crate; only delta-ticks and the few
/// fields that matter for timing cross this boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackMessage {
    NoteOn { delta: u32, note: u8, velocity: u8 },
    SetTempo { delta: u32, micros: u32 },
    /// Any other event. Its delta still advances the track clock.
    Other { delta: u32 },
}

impl TrackMessage {
    fn delta(&self) -> u32 {
        match *self {
            TrackMessage::NoteOn { delta, .. }
            | TrackMessage::SetTempo { delta, .. }
            | TrackMessage::Other { delta } => delta,
        }
    }
}

/// Decode a parsed MIDI file into per-track message sequences.
pub fn decode_tracks(file: &MidiFile) -> Vec<Vec<TrackMessage>> {
    file.tracks()
        .map(|track| {
            track
                .events()
                .map(|track_event| {
                    let delta = track_event.delta_time();
                    match track_event.event() {
                        Event::Midi(Message::NoteOn(note)) => TrackMessage::NoteOn {
                            delta,
                            note: note.note_number().get(),
                            velocity: note.velocity().get(),
                        },
                        Event::Meta(MetaEvent::SetTempo(tempo)) => TrackMessage::SetTempo {
                            delta,
                            micros: tempo.get(),
                        },
                        _ => TrackMessage::Other { delta },
                    }
                })
                .collect()
        })
        .collect()
}

/// Fold one track's messages into notes.
///
/// Ticks accumulate for every message regardless of kind; a set-tempo event
/// replaces the divisor for the notes that follow it. Offsets are computed as
/// `tick / divisor` with whichever divisor is current when the onset arrives,
/// matching the source data model rather than re-deriving elapsed time per
/// tempo segment.
pub fn extract_track(
    messages: &[TrackMessage],
    mapping: &KeyMapping,
) -> Result<Vec<Note>, ExtractError> {
    let mut notes = Vec::new();
    let mut tick: u64 = 0;
    let mut divisor = DEFAULT_TEMPO_DIVISOR;

    for msg in messages {
        tick += u64::from(msg.delta());
        match *msg {
            TrackMessage::SetTempo { micros, .. } => {
                divisor = micros / 1000;
                log::debug!("tempo change: {} µs/qn, divisor {}", micros, divisor);
            }
            TrackMessage::NoteOn { note, velocity, .. } if velocity > 0 => {
                if divisor == 0 {
                    return Err(ExtractError::InvalidTempo { tick });
                }
                notes.push(Note {
                    pitch: note,
                    offset_secs: tick as f64 / f64::from(divisor),
                    key: mapping.lookup(note).to_string(),
                });
            }
            // Zero-velocity onsets and everything else only advance the clock.
            _ => {}
        }
    }

    Ok(notes)
}

/// Extract the whole sheet, tracks concatenated in order. Each track starts
/// from tick zero with the default tempo; a track that fails extraction is
/// reported and dropped without touching its siblings' results.
pub fn extract(tracks: &[Vec<TrackMessage>], mapping: &KeyMapping) -> Sheet {
    let mut sheet = Sheet::new();
    for (index, messages) in tracks.iter().enumerate() {
        match extract_track(messages, mapping) {
            Ok(notes) => sheet.extend(notes),
            Err(err) => log::error!("track {}: {}", index, err),
        }
    }
    sheet
}
