use serde::Serialize;

/// One performance event: a note onset resolved to a wall-clock offset and a
/// keyboard key. `key` is empty when the pitch has no mapping; the player
/// still waits out the offset for such notes but presses nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    /// MIDI note number, 0-127.
    pub pitch: u8,
    /// Seconds since the start of the note's own track.
    pub offset_secs: f64,
    pub key: String,
}

/// All notes of a file, per-track sequences concatenated in track order.
///
/// Offsets restart at zero for each track and the concatenation is not
/// re-sorted by time across tracks; playback relies on per-note delays, not
/// on list order.
pub type Sheet = Vec<Note>;
