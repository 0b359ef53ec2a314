use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use divergence_core::{PuzzleRecord, PuzzleSink, SinkError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ExplorerError;

/// One line of the puzzle store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredPuzzle {
    pub index: u64,
    pub puzzle: PuzzleRecord,
}

#[derive(Serialize)]
struct StoredPuzzleRef<'a> {
    index: u64,
    puzzle: &'a PuzzleRecord,
}

/// Append-only JSON Lines file of puzzles.
///
/// Indices continue after the highest index already in the file, so a rerun
/// against the same path never reuses one.
#[derive(Debug)]
pub struct JsonlStore {
    path: PathBuf,
    next_index: u64,
}

impl JsonlStore {
    /// Open `path`, creating its parent directory if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExplorerError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let next_index = if path.exists() {
            load_puzzles(&path)?
                .iter()
                .map(|stored| stored.index + 1)
                .max()
                .unwrap_or(0)
        } else {
            0
        };
        info!(path = %path.display(), next_index, "opened puzzle store");
        Ok(JsonlStore { path, next_index })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Write one record as a single line and return its index.
    pub fn append_record(&mut self, record: &PuzzleRecord) -> Result<u64, ExplorerError> {
        let index = self.next_index;
        let mut line = serde_json::to_string(&StoredPuzzleRef {
            index,
            puzzle: record,
        })?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        self.next_index += 1;
        Ok(index)
    }
}

impl PuzzleSink for JsonlStore {
    fn append(&mut self, record: &PuzzleRecord) -> Result<u64, SinkError> {
        self.append_record(record)
            .map_err(|err| SinkError::new(err.to_string()))
    }
}

/// Read every puzzle from a JSON Lines store. Blank lines are skipped.
pub fn load_puzzles(path: impl AsRef<Path>) -> Result<Vec<StoredPuzzle>, ExplorerError> {
    let text = fs::read_to_string(path)?;
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line).map_err(|err| ExplorerError::MalformedStoreLine {
                line: number + 1,
                reason: err.to_string(),
            })
        })
        .collect()
}
