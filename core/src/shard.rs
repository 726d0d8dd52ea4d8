//! Wordlist partitioning.
//!
//! One wordlist is split into N shard files of near-equal line count so
//! each engine invocation works a bounded slice. Line order is preserved
//! within a shard and no line is duplicated or dropped across the set.

use std::fs;
use std::path::{Path, PathBuf};

use probr_common::error::ScanError;

/// The shard files produced for one run, in shard-index order.
///
/// Shards are immutable once written; the files live in the run workspace
/// and go away with it.
#[derive(Debug)]
pub struct ShardSet {
    shards: Vec<PathBuf>,
}

impl ShardSet {
    /// Partitions `wordlist` into `count` files under `dir`.
    ///
    /// The first `lines % count` shards receive one extra line. A missing
    /// wordlist or an unwritable shard directory is fatal: nothing can run
    /// without shards.
    pub fn split(wordlist: &Path, count: usize, dir: &Path) -> Result<Self, ScanError> {
        let raw = fs::read_to_string(wordlist).map_err(|source| ScanError::Wordlist {
            path: wordlist.to_path_buf(),
            source,
        })?;

        let normalized = raw.replace("\r\n", "\n");
        let lines: Vec<&str> = normalized.lines().collect();

        let base = lines.len() / count;
        let extra = lines.len() % count;

        let mut shards = Vec::with_capacity(count);
        let mut cursor = 0usize;

        for index in 1..=count {
            let take = base + usize::from(index <= extra);
            let chunk = &lines[cursor..cursor + take];
            cursor += take;

            let path = dir.join(format!("shard-{index}.txt"));
            let mut body = chunk.join("\n");
            if !body.is_empty() {
                body.push('\n');
            }
            fs::write(&path, body).map_err(|source| ScanError::ShardSplit { count, source })?;
            shards.push(path);
        }

        Ok(Self { shards })
    }

    /// Shard paths in ascending shard-index order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.shards
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }
}
