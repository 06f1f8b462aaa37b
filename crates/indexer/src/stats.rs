use serde::{Deserialize, Serialize};

/// Statistics about one index run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Source files seen by the scanner
    pub files: usize,

    /// Files that failed to chunk and were skipped
    pub skipped_files: usize,

    /// Chunks embedded and stored
    pub chunks: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl IndexStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self) {
        self.files += 1;
    }

    pub fn add_skipped(&mut self) {
        self.skipped_files += 1;
    }

    pub fn add_chunks(&mut self, count: usize) {
        self.chunks += count;
    }
}
