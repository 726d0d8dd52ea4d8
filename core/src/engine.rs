//! The fuzz engine seam.
//!
//! The orchestrator never talks to an external binary directly; it drives
//! the [`FuzzEngine`] trait. The default implementation shells out to
//! ffuf, and tests substitute a scripted engine that writes canned
//! reports. High-level modules should depend on the trait, not on the
//! adapter.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use probr_common::config::RunConfig;
use probr_common::error::ScanError;
use probr_common::target::Target;
use tokio::process::Command;
use tracing::debug;

/// One engine invocation: a target crossed with a wordlist shard.
#[derive(Debug)]
pub struct ShardJob {
    pub target: Target,
    pub shard_index: usize,
    pub shard_path: PathBuf,
    /// Where the engine is asked to write its JSON report. May not exist
    /// after the run; callers check before reading.
    pub report_path: PathBuf,
    pub debug_log_path: PathBuf,
}

/// What the engine process reported back.
///
/// `exit_code` 0 means the engine completed, zero matches included.
/// Non-zero is an engine-level failure, never "no findings".
#[derive(Debug, Clone, Copy)]
pub struct JobOutcome {
    pub exit_code: Option<i32>,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[async_trait]
pub trait FuzzEngine: Send + Sync {
    /// Availability check run at INIT, before anything is written.
    async fn probe(&self) -> Result<String, ScanError>;

    /// Runs one job to completion and returns the process exit status.
    async fn run(&self, job: &ShardJob) -> Result<JobOutcome, ScanError>;
}

/// Shells out to ffuf with JSON output.
pub struct FfufEngine {
    binary: String,
    match_codes: String,
    user_agent: String,
    auto_calibrate: bool,
    stop_on_errors: bool,
}

impl FfufEngine {
    /// Engine with default match codes and User-Agent; used by the
    /// availability check where no run config exists yet.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            match_codes: probr_common::config::DEFAULT_MATCH_CODES
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<String>>()
                .join(","),
            user_agent: String::from(probr_common::config::USER_AGENT),
            auto_calibrate: false,
            stop_on_errors: false,
        }
    }

    pub fn from_config(cfg: &RunConfig) -> Self {
        Self {
            binary: cfg.engine_bin.clone(),
            match_codes: cfg.match_codes_arg(),
            user_agent: cfg.user_agent.clone(),
            auto_calibrate: cfg.auto_calibrate,
            stop_on_errors: cfg.stop_on_errors,
        }
    }

    fn command(&self, job: &ShardJob) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-u")
            .arg(job.target.fuzz_url())
            .arg("-w")
            .arg(&job.shard_path)
            .arg("-o")
            .arg(&job.report_path)
            .arg("-of")
            .arg("json")
            .arg("-mc")
            .arg(&self.match_codes)
            .arg("-H")
            .arg(format!("User-Agent: {}", self.user_agent))
            .arg("-debug-log")
            .arg(&job.debug_log_path)
            .arg("-s");

        if self.auto_calibrate {
            cmd.arg("-ac");
        }
        if self.stop_on_errors {
            cmd.arg("-sf");
        }

        cmd.stdout(Stdio::null()).stderr(Stdio::null());
        cmd
    }

    fn missing(&self) -> ScanError {
        ScanError::EngineMissing {
            binary: self.binary.clone(),
        }
    }
}

#[async_trait]
impl FuzzEngine for FfufEngine {
    async fn probe(&self) -> Result<String, ScanError> {
        let output = Command::new(&self.binary)
            .arg("-V")
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|_| self.missing())?;

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(version)
    }

    async fn run(&self, job: &ShardJob) -> Result<JobOutcome, ScanError> {
        debug!(
            "engine: {} shard {} -> {}",
            job.target.url,
            job.shard_index,
            job.report_path.display()
        );

        let status = self
            .command(job)
            .status()
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => self.missing(),
                _ => ScanError::Engine {
                    target: job.target.url.clone(),
                    shard: job.shard_index,
                    code: None,
                },
            })?;

        Ok(JobOutcome {
            exit_code: status.code(),
        })
    }
}

/// Builds the job descriptor for one (target, shard) pair.
pub fn shard_job(
    workdir: &crate::workdir::RunDir,
    target: &Target,
    shard_index: usize,
    shard_path: &Path,
) -> ShardJob {
    let slug = target.slug();
    ShardJob {
        target: target.clone(),
        shard_index,
        shard_path: shard_path.to_path_buf(),
        report_path: workdir.job_report_path(&slug, shard_index),
        debug_log_path: workdir.job_log_path(&slug, shard_index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probr_common::config::RunConfig;

    fn job() -> ShardJob {
        ShardJob {
            target: Target::new("http://a.test"),
            shard_index: 2,
            shard_path: PathBuf::from("/tmp/shard-2.txt"),
            report_path: PathBuf::from("/tmp/a.test-s2.json"),
            debug_log_path: PathBuf::from("/tmp/a.test-s2.log"),
        }
    }

    #[test]
    fn command_line_carries_the_contract_flags() {
        let mut cfg = RunConfig::new("t".into(), "w".into(), "o".into());
        cfg.auto_calibrate = true;
        let engine = FfufEngine::from_config(&cfg);

        let cmd = engine.command(&job());
        let args: Vec<String> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert!(args.contains(&"http://a.test/FUZZ".to_string()));
        assert!(args.contains(&"json".to_string()));
        assert!(args.contains(&"200,301,302,307,401,403,405,500".to_string()));
        assert!(args.contains(&"-ac".to_string()));
        assert!(!args.contains(&"-sf".to_string()));
        assert!(
            args.iter().any(|a| a.starts_with("User-Agent:")),
            "expected a fixed User-Agent header, got {args:?}"
        );
    }

    #[tokio::test]
    async fn probe_reports_a_missing_binary() {
        let cfg = RunConfig {
            engine_bin: "definitely-not-a-real-engine".into(),
            ..RunConfig::new("t".into(), "w".into(), "o".into())
        };
        let engine = FfufEngine::from_config(&cfg);

        let err = engine.probe().await.unwrap_err();
        assert!(matches!(err, ScanError::EngineMissing { .. }));
        assert!(err.is_fatal());
    }
}
