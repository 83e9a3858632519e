//! Append-only training log sink.
//!
//! Persists one text row per trained feature so operators can analyze
//! labeled advertisements offline. The file gets a CSV header exactly once,
//! when the sink is first created empty; every later open appends.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Header row written once when the sink is first created empty.
pub const TRAINING_LOG_HEADER: &str =
    "time,ignore,featureData,scanRecordRawData,identifier,rssi,deviceModel,deviceName";

/// Append-only text sink for training rows.
#[derive(Debug)]
pub struct TrainingLog {
    path: PathBuf,
    file: File,
}

impl TrainingLog {
    /// Open the sink at `path`, creating the file and its parent
    /// directories as needed. A new or empty file gets the header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories or file cannot be created, or
    /// the header cannot be written.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if file.metadata()?.len() == 0 {
            writeln!(file, "{TRAINING_LOG_HEADER}")?;
        }
        Ok(Self { path, file })
    }

    /// Sink over a pre-opened file, bypassing header handling. Lets tests
    /// point appends at a file that rejects writes.
    #[cfg(test)]
    pub(crate) fn from_parts(path: PathBuf, file: File) -> Self {
        Self { path, file }
    }

    /// Append one row, terminated with a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. The classifier treats appends
    /// as best-effort; a failure here never reaches its callers.
    pub fn append(&mut self, row: &str) -> Result<()> {
        writeln!(self.file, "{row}")?;
        self.file.flush()?;
        Ok(())
    }

    /// Path this sink writes to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
