use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The mapping file could not be read or is not a valid table.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("cannot read mapping file {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse mapping file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Static table from MIDI note number to keyboard key label.
///
/// Loaded once at startup and read-only afterwards. The backing file is a
/// JSON object whose keys are note numbers in string form, e.g.
/// `{"60": "a", "62": "s"}`.
pub struct KeyMapping {
    table: HashMap<String, String>,
}

impl KeyMapping {
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let file = File::open(path).map_err(|source| MappingError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let table = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            MappingError::Malformed {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(Self { table })
    }

    /// Build a mapping from an in-memory table.
    #[allow(dead_code)]
    pub fn from_table(table: HashMap<String, String>) -> Self {
        Self { table }
    }

    /// Resolve a note number to its key label. Never fails; an unmapped note
    /// yields the empty string, which downstream treats as "skip silently".
    pub fn lookup(&self, note: u8) -> &str {
        self.table
            .get(note.to_string().as_str())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }
}
