//! Run-scoped error log.
//!
//! One file per run, truncated at run start, appended to for every
//! non-fatal error. The path is stable so the file can be attached to
//! error notifications and pointed at in the run summary.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    /// Creates (and truncates) the log file.
    pub fn create(path: &Path) -> io::Result<Self> {
        File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one timestamped line. Logging failures are swallowed; the
    /// log must never take the run down with it.
    pub fn record(&self, message: &str) {
        let line = format!("{} {message}\n", Local::now().format("%Y-%m-%d %H:%M:%S"));
        let _ = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .and_then(|mut f| f.write_all(line.as_bytes()));
    }

    /// Whether anything has been recorded this run.
    pub fn has_entries(&self) -> bool {
        std::fs::metadata(&self.path)
            .map(|m| m.len() > 0)
            .unwrap_or(false)
    }
}
