//! Run-scoped scratch space.
//!
//! Every run gets its own directory under the system temp dir, named with
//! the creation timestamp and pid so concurrent runs never collide. The
//! wordlist shards and the transient per-(target, shard) engine outputs
//! all live here; dropping the [`RunDir`] removes the whole tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Local;
use tracing::debug;

/// Distinguishes runs created within the same second of the same process.
static RUN_SEQ: AtomicU32 = AtomicU32::new(0);

pub struct RunDir {
    root: PathBuf,
}

impl RunDir {
    pub fn create() -> io::Result<Self> {
        let name = format!(
            "probr-{}-{}-{}",
            Local::now().format("%Y%m%d%H%M%S"),
            std::process::id(),
            RUN_SEQ.fetch_add(1, Ordering::Relaxed)
        );
        let root = std::env::temp_dir().join(name);

        fs::create_dir_all(root.join("shards"))?;
        debug!("run workspace at {}", root.display());

        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Directory holding the wordlist shards, shared read-only by every
    /// job in the run.
    pub fn shards_dir(&self) -> PathBuf {
        self.root.join("shards")
    }

    /// Where the engine writes the JSON report for one (target, shard).
    pub fn job_report_path(&self, slug: &str, shard_index: usize) -> PathBuf {
        self.root.join(format!("{slug}-s{shard_index}.json"))
    }

    /// Companion debug log for one (target, shard).
    pub fn job_log_path(&self, slug: &str, shard_index: usize) -> PathBuf {
        self.root.join(format!("{slug}-s{shard_index}.log"))
    }
}

impl Drop for RunDir {
    fn drop(&mut self) {
        // Cleanup runs on success and failure alike. A vanished tree is
        // not worth reporting.
        if let Err(e) = fs::remove_dir_all(&self.root) {
            if e.kind() != io::ErrorKind::NotFound {
                debug!("failed to remove {}: {e}", self.root.display());
            }
        }
    }
}
