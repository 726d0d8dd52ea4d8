//! The scan run driver.
//!
//! Implements the run lifecycle: validate inputs, split the wordlist
//! once, then for every target run each shard job in ascending shard
//! order, merge the surviving shard reports, notify, and clean up that
//! target's transient files. Non-fatal failures are isolated to the
//! shard or target they hit; the run always carries on to the next one.

use std::fs;
use std::path::PathBuf;

use probr_common::config::RunConfig;
use probr_common::error::ScanError;
use probr_common::target::{self, Target};
use probr_common::{info, success, warn};
use probr_notify::{Notification, Notifier};
use tracing::debug;

use crate::aggregate::{self, MergeOutcome};
use crate::engine::{self, FuzzEngine};
use crate::runlog::ErrorLog;
use crate::shard::ShardSet;
use crate::workdir::RunDir;

/// What one run produced, for the CLI summary.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub targets: usize,
    /// Combined report files written, in target order.
    pub reports: Vec<PathBuf>,
    /// Targets that ended with zero usable shard results.
    pub skipped_targets: usize,
    /// Individual shard jobs that failed at the engine level.
    pub shard_failures: usize,
}

/// Orchestrates one scan run over injected engine and notifier
/// implementations.
pub struct ScanService {
    config: RunConfig,
    engine: Box<dyn FuzzEngine>,
    notifier: Option<Box<dyn Notifier>>,
}

impl ScanService {
    pub fn new(
        config: RunConfig,
        engine: Box<dyn FuzzEngine>,
        notifier: Option<Box<dyn Notifier>>,
    ) -> Self {
        Self {
            config,
            engine,
            notifier,
        }
    }

    /// Runs to completion. `Err` means a fatal input/split failure; every
    /// per-shard and per-target error is absorbed into the summary.
    pub async fn run(&self) -> Result<RunSummary, ScanError> {
        // INIT: nothing may be written before the inputs check out.
        let targets = target::load_targets(&self.config.target_list)?;

        if !self.config.wordlist.is_file() {
            return Err(ScanError::Wordlist {
                path: self.config.wordlist.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }

        let engine_version = self.engine.probe().await?;
        if !engine_version.is_empty() {
            debug!("engine: {engine_version}");
        }

        fs::create_dir_all(&self.config.output_dir).map_err(|source| ScanError::OutputDir {
            path: self.config.output_dir.clone(),
            source,
        })?;
        let error_log = ErrorLog::create(&self.config.error_log_path()).map_err(|source| {
            ScanError::OutputDir {
                path: self.config.output_dir.clone(),
                source,
            }
        })?;

        // SPLIT_WORDLIST: the one failure that is not per-target
        // recoverable.
        let workdir = RunDir::create().map_err(|source| ScanError::ShardSplit {
            count: self.config.shard_count,
            source,
        })?;
        let shards = ShardSet::split(
            &self.config.wordlist,
            self.config.shard_count,
            &workdir.shards_dir(),
        )?;
        info!(
            "wordlist split into {} shards, {} target(s) queued",
            shards.len(),
            targets.len()
        );

        let mut summary = RunSummary {
            targets: targets.len(),
            ..RunSummary::default()
        };

        for target in &targets {
            self.scan_target(target, &shards, &workdir, &error_log, &mut summary)
                .await;
        }

        // CLEANUP_WORDLIST_SHARDS happens when `workdir` drops, success or
        // failure alike.
        Ok(summary)
    }

    /// RUN_SHARDS -> AGGREGATE -> NOTIFY -> CLEANUP_TARGET_TEMP for one
    /// target. Never fails the run.
    async fn scan_target(
        &self,
        target: &Target,
        shards: &ShardSet,
        workdir: &RunDir,
        error_log: &ErrorLog,
        summary: &mut RunSummary,
    ) {
        let slug = target.slug();
        let mut report_paths: Vec<PathBuf> = Vec::with_capacity(shards.len());

        for (idx, shard_path) in shards.paths().iter().enumerate() {
            let shard_index = idx + 1;
            info!("{}: shard {shard_index}/{}", target.url, shards.len());

            let job = engine::shard_job(workdir, target, shard_index, shard_path);
            report_paths.push(job.report_path.clone());

            match self.engine.run(&job).await {
                Ok(outcome) if outcome.succeeded() => {}
                Ok(outcome) => {
                    summary.shard_failures += 1;
                    let err = ScanError::Engine {
                        target: target.url.clone(),
                        shard: shard_index,
                        code: outcome.exit_code,
                    };
                    self.report_failure(&err, &job.debug_log_path, error_log)
                        .await;
                }
                Err(err) => {
                    summary.shard_failures += 1;
                    self.report_failure(&err, &job.debug_log_path, error_log)
                        .await;
                }
            }
        }

        // AGGREGATE only after every shard job for this target finished.
        let output_path = self.config.output_dir.join(format!("{slug}.json"));
        match aggregate::merge_target_reports(target, &report_paths, &output_path) {
            Ok(MergeOutcome::Written { path, findings }) => {
                success!("{}: {} finding(s) -> {}", target.url, findings, path.display());
                let caption = format!(
                    "[{}] {}: {} finding(s)",
                    self.config.session, target.url, findings
                );
                self.notify(Notification::new(caption).with_file(&path))
                    .await;
                summary.reports.push(path);
            }
            Ok(MergeOutcome::NoResults) => {
                warn!("{}: no successful results", target.url);
                summary.skipped_targets += 1;
            }
            Err(err) => {
                summary.skipped_targets += 1;
                self.report_failure(&err, &output_path, error_log).await;
            }
        }

        // CLEANUP_TARGET_TEMP: the shard reports and debug logs served
        // their purpose.
        for idx in 1..=shards.len() {
            let _ = fs::remove_file(workdir.job_report_path(&slug, idx));
            let _ = fs::remove_file(workdir.job_log_path(&slug, idx));
        }
    }

    /// Records a non-fatal error and mirrors it out, attaching whatever
    /// context files exist.
    async fn report_failure(
        &self,
        err: &ScanError,
        context_file: &std::path::Path,
        error_log: &ErrorLog,
    ) {
        warn!("{err}");
        error_log.record(&err.to_string());

        let mut notification = Notification::new(format!("[{}] {err}", self.config.session));
        if context_file.is_file() {
            notification = notification.with_file(context_file);
        }
        if error_log.has_entries() {
            notification = notification.with_file(error_log.path());
        }
        self.notify(notification).await;
    }

    /// Fire-and-forget dispatch: failures are logged, never escalated,
    /// never retried.
    async fn notify(&self, notification: Notification) {
        let Some(notifier) = &self.notifier else {
            debug!("notifications disabled, dropping: {}", notification.caption);
            return;
        };

        if let Err(e) = notifier.send(&notification).await {
            warn!("{}", ScanError::Notify(e.to_string()));
        }
    }
}
