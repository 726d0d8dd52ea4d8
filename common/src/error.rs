use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong during a run.
///
/// The fatal variants abort the whole run before any scanning starts; the
/// rest are isolated to the shard or target they occurred in, recorded in
/// the error log and the run continues.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read target list {}: {source}", .path.display())]
    TargetList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("target list {} contains no targets", .path.display())]
    EmptyTargetList { path: PathBuf },

    #[error("cannot read wordlist {}: {source}", .path.display())]
    Wordlist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fuzz engine '{binary}' not found in PATH")]
    EngineMissing { binary: String },

    #[error("failed to split wordlist into {count} shards: {source}")]
    ShardSplit {
        count: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot prepare output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("engine exited with code {code:?} for {target} shard {shard}")]
    Engine {
        target: String,
        shard: usize,
        code: Option<i32>,
    },

    #[error("shard {shard} report for {target} rejected: {reason}")]
    ShardReport {
        target: String,
        shard: usize,
        reason: String,
    },

    #[error("failed to write combined report for {target}: {reason}")]
    Merge { target: String, reason: String },

    #[error("notification delivery failed: {0}")]
    Notify(String),
}

impl ScanError {
    /// Fatal errors abort the run with a non-zero exit; everything else is
    /// reported and skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScanError::TargetList { .. }
                | ScanError::EmptyTargetList { .. }
                | ScanError::Wordlist { .. }
                | ScanError::EngineMissing { .. }
                | ScanError::ShardSplit { .. }
                | ScanError::OutputDir { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_are_fatal() {
        let err = ScanError::EngineMissing {
            binary: "ffuf".into(),
        };
        assert!(err.is_fatal());

        let err = ScanError::Engine {
            target: "http://a.test".into(),
            shard: 2,
            code: Some(1),
        };
        assert!(!err.is_fatal());

        let err = ScanError::Notify("503".into());
        assert!(!err.is_fatal());
    }
}
