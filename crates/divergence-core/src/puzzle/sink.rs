use crate::{error::SinkError, puzzle::record::PuzzleRecord};

/// Append-only destination for validated puzzles.
///
/// A single append either stores the whole record and returns its index or
/// fails without writing anything.
pub trait PuzzleSink {
    fn append(&mut self, record: &PuzzleRecord) -> Result<u64, SinkError>;
}

/// Keeps puzzles in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<PuzzleRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[PuzzleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PuzzleSink for MemorySink {
    fn append(&mut self, record: &PuzzleRecord) -> Result<u64, SinkError> {
        self.records.push(record.clone());
        Ok(self.records.len() as u64 - 1)
    }
}
