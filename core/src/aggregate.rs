//! Per-target report merging.
//!
//! After every shard job for a target has finished, the shard reports
//! that survive validation are concatenated (ascending shard index, no
//! de-duplication) into one combined report. Shards that failed to
//! produce a usable report are warnings; a target with zero usable
//! shards simply yields no combined file.

use std::fs;
use std::path::{Path, PathBuf};

use probr_common::error::ScanError;
use probr_common::report::{CombinedReport, ShardReport};
use probr_common::target::Target;
use probr_common::warn;

/// Outcome of merging one target's shard reports.
pub enum MergeOutcome {
    /// Combined report written; carries the path and the finding count.
    Written { path: PathBuf, findings: usize },
    /// No shard produced a valid report. Logged upstream, not an error.
    NoResults,
}

/// Reads one shard report, returning why it was rejected if it was.
fn read_shard_report(path: &Path) -> Result<ShardReport, String> {
    let raw = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return Err(format!("unreadable: {e}")),
    };
    if raw.is_empty() {
        return Err(String::from("empty file"));
    }
    serde_json::from_slice::<ShardReport>(&raw)
        .map_err(|e| format!("not a results report: {e}"))
}

/// Validates and merges the shard reports for one target.
///
/// `report_paths` must be in ascending shard-index order; the combined
/// `results` array preserves it. Missing files are treated the same as
/// malformed ones: excluded with a warning.
pub fn merge_target_reports(
    target: &Target,
    report_paths: &[PathBuf],
    output_path: &Path,
) -> Result<MergeOutcome, ScanError> {
    let mut valid: Vec<ShardReport> = Vec::new();

    for (idx, path) in report_paths.iter().enumerate() {
        let shard = idx + 1;
        match read_shard_report(path) {
            Ok(report) => valid.push(report),
            Err(reason) => {
                // A warning, not an error: the merge carries on with
                // whatever validated.
                let rejected = ScanError::ShardReport {
                    target: target.url.clone(),
                    shard,
                    reason,
                };
                warn!("{rejected}");
            }
        }
    }

    if valid.is_empty() {
        return Ok(MergeOutcome::NoResults);
    }

    let combined = CombinedReport::from_shards(valid);
    let findings = combined.results.len();

    let body = serde_json::to_vec_pretty(&combined).map_err(|e| ScanError::Merge {
        target: target.url.clone(),
        reason: e.to_string(),
    })?;
    fs::write(output_path, body).map_err(|e| ScanError::Merge {
        target: target.url.clone(),
        reason: e.to_string(),
    })?;

    Ok(MergeOutcome::Written {
        path: output_path.to_path_buf(),
        findings,
    })
}
