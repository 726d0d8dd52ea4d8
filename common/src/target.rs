//! # Scan Target Model
//!
//! Targets are URLs read from a plain-text list, one per line. Lists come
//! from all sorts of tooling, so foreign line endings are normalized to
//! line-feed before splitting and blank lines are skipped.

use std::fs;
use std::path::Path;

use crate::error::ScanError;

/// One URL to be scanned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub url: String,
}

impl Target {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Filesystem-safe name for this target's artifacts.
    ///
    /// Strips the scheme and maps anything outside `[A-Za-z0-9.-]` to `_`,
    /// so `https://a.test:8080/x` becomes `a.test_8080_x`.
    pub fn slug(&self) -> String {
        let stripped = self
            .url
            .strip_prefix("https://")
            .or_else(|| self.url.strip_prefix("http://"))
            .unwrap_or(&self.url);

        stripped
            .trim_end_matches('/')
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// The target URL with the engine's fuzzing placeholder appended to
    /// the path.
    pub fn fuzz_url(&self) -> String {
        format!("{}/FUZZ", self.url.trim_end_matches('/'))
    }
}

/// Reads the target list, normalizing line endings and skipping blanks.
pub fn load_targets(path: &Path) -> Result<Vec<Target>, ScanError> {
    let raw = fs::read_to_string(path).map_err(|source| ScanError::TargetList {
        path: path.to_path_buf(),
        source,
    })?;

    let targets: Vec<Target> = raw
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Target::new)
        .collect();

    if targets.is_empty() {
        return Err(ScanError::EmptyTargetList {
            path: path.to_path_buf(),
        });
    }

    Ok(targets)
}
