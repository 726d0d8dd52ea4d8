#![cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use probr_common::config::RunConfig;
use probr_common::error::ScanError;
use probr_core::engine::{FuzzEngine, JobOutcome, ShardJob};
use probr_core::orchestrator::ScanService;
use probr_notify::{Notification, Notifier, NotifyError};

/// Engine double that answers each (target, shard) job from a script:
/// `Some(body)` writes the body as the report and exits 0, `None` exits 1
/// without producing a file.
#[derive(Default)]
struct ScriptedEngine {
    scripts: HashMap<(String, usize), String>,
}

impl ScriptedEngine {
    fn script(mut self, url: &str, shard: usize, body: String) -> Self {
        self.scripts.insert((url.to_string(), shard), body);
        self
    }
}

#[async_trait]
impl FuzzEngine for ScriptedEngine {
    async fn probe(&self) -> Result<String, ScanError> {
        Ok(String::from("scripted 0.0"))
    }

    async fn run(&self, job: &ShardJob) -> Result<JobOutcome, ScanError> {
        let key = (job.target.url.clone(), job.shard_index);
        match self.scripts.get(&key) {
            Some(body) => {
                fs::write(&job.report_path, body).expect("report write");
                Ok(JobOutcome { exit_code: Some(0) })
            }
            None => Ok(JobOutcome { exit_code: Some(1) }),
        }
    }
}

/// Engine double that echoes its shard file back as findings, one record
/// per word. Lets tests assert the split/merge pipeline end to end.
struct EchoEngine;

#[async_trait]
impl FuzzEngine for EchoEngine {
    async fn probe(&self) -> Result<String, ScanError> {
        Ok(String::new())
    }

    async fn run(&self, job: &ShardJob) -> Result<JobOutcome, ScanError> {
        let words = fs::read_to_string(&job.shard_path).expect("shard read");
        let results: Vec<serde_json::Value> = words
            .lines()
            .map(|w| serde_json::json!({"input": {"FUZZ": w}, "status": 200}))
            .collect();
        let body = serde_json::json!({"results": results}).to_string();
        fs::write(&job.report_path, body).expect("report write");
        Ok(JobOutcome { exit_code: Some(0) })
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

fn write_inputs(dir: &Path, targets: &[&str], words: usize) -> RunConfig {
    let target_list = dir.join("targets.txt");
    fs::write(&target_list, targets.join("\n")).unwrap();

    let wordlist = dir.join("words.txt");
    let body: Vec<String> = (0..words).map(|i| format!("word{i:02}")).collect();
    fs::write(&wordlist, body.join("\n")).unwrap();

    RunConfig::new(target_list, wordlist, dir.join("out"))
}

fn results_body(inputs: &[&str]) -> String {
    let records: Vec<serde_json::Value> = inputs
        .iter()
        .map(|i| serde_json::json!({"input": i}))
        .collect();
    serde_json::json!({"results": records}).to_string()
}

fn combined_inputs(path: &Path) -> Vec<String> {
    let report: serde_json::Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
    report["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| {
            r["input"]["FUZZ"]
                .as_str()
                .or_else(|| r["input"].as_str())
                .unwrap()
                .to_string()
        })
        .collect()
}

/// Every word of the wordlist must come back exactly once, in wordlist
/// order, when every shard succeeds.
#[tokio::test]
async fn full_run_reassembles_the_wordlist_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = write_inputs(tmp.path(), &["http://a.test"], 8);

    let service = ScanService::new(cfg.clone(), Box::new(EchoEngine), None);
    let summary = service.run().await.expect("run must complete");

    assert_eq!(summary.reports.len(), 1);
    let expected: Vec<String> = (0..8).map(|i| format!("word{i:02}")).collect();
    assert_eq!(
        combined_inputs(&cfg.output_dir.join("a.test.json")),
        expected,
        "shard order must reproduce wordlist order"
    );
}

/// Shard 2 of a.test fails at the engine level while shards 1, 3, 4
/// succeed; b.test is unaffected.
#[tokio::test]
async fn engine_failure_drops_only_that_shard() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = write_inputs(tmp.path(), &["http://a.test", "http://b.test"], 8);

    let engine = ScriptedEngine::default()
        .script("http://a.test", 1, results_body(&["s1"]))
        .script("http://a.test", 3, results_body(&["s3a", "s3b"]))
        .script("http://a.test", 4, results_body(&["s4"]))
        .script("http://b.test", 1, results_body(&["b1"]))
        .script("http://b.test", 2, results_body(&[]))
        .script("http://b.test", 3, results_body(&[]))
        .script("http://b.test", 4, results_body(&[]));

    let notifier = RecordingNotifier::default();
    let service = ScanService::new(
        cfg.clone(),
        Box::new(engine),
        Some(Box::new(notifier.clone())),
    );
    let summary = service.run().await.expect("run must complete");

    assert_eq!(summary.shard_failures, 1);
    assert_eq!(summary.reports.len(), 2);
    assert_eq!(
        combined_inputs(&cfg.output_dir.join("a.test.json")),
        vec!["s1", "s3a", "s3b", "s4"],
        "surviving shards must merge in ascending index order"
    );
    assert_eq!(
        combined_inputs(&cfg.output_dir.join("b.test.json")),
        vec!["b1"]
    );

    let sent = notifier.sent.lock().unwrap();
    let failure = sent
        .iter()
        .find(|n| n.caption.contains("shard 2"))
        .expect("shard failure must be mirrored out");
    assert!(
        failure
            .attachments
            .iter()
            .any(|p| p.ends_with("errors.log")),
        "error notifications carry the run log"
    );

    let success = sent
        .iter()
        .find(|n| n.caption.contains("http://b.test"))
        .expect("successful targets are announced");
    assert!(success.attachments.iter().any(|p| p.ends_with("b.test.json")));
}

/// A run leaves no trace of its scratch space in the output directory:
/// only combined reports and the error log remain. (Removal of the temp
/// tree itself is covered by the workdir unit tests.)
#[tokio::test]
async fn run_output_holds_only_reports_and_the_error_log() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = write_inputs(tmp.path(), &["http://a.test"], 4);

    let service = ScanService::new(cfg.clone(), Box::new(EchoEngine), None);
    service.run().await.expect("run must complete");

    let outputs: Vec<String> = fs::read_dir(&cfg.output_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(outputs.len(), 2, "combined report + error log: {outputs:?}");
    assert!(outputs.contains(&"a.test.json".to_string()));
    assert!(outputs.contains(&"errors.log".to_string()));
}

/// Back-to-back runs need no manual cleanup: fresh shard directories,
/// reports overwritten in place.
#[tokio::test]
async fn rerun_overwrites_reports_without_manual_cleanup() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = write_inputs(tmp.path(), &["http://a.test"], 4);

    let first = ScanService::new(cfg.clone(), Box::new(EchoEngine), None);
    first.run().await.expect("first run");
    let first_report = fs::read(cfg.output_dir.join("a.test.json")).unwrap();

    let second = ScanService::new(
        cfg.clone(),
        Box::new(
            ScriptedEngine::default()
                .script("http://a.test", 1, results_body(&["fresh"]))
                .script("http://a.test", 2, results_body(&[]))
                .script("http://a.test", 3, results_body(&[]))
                .script("http://a.test", 4, results_body(&[])),
        ),
        None,
    );
    second.run().await.expect("second run");
    let second_report = fs::read(cfg.output_dir.join("a.test.json")).unwrap();

    assert_ne!(first_report, second_report, "rerun must overwrite the report");
    assert_eq!(
        combined_inputs(&cfg.output_dir.join("a.test.json")),
        vec!["fresh"]
    );
}

/// Fatal input validation: a missing target list aborts before the run
/// writes anything beyond the base output directory.
#[tokio::test]
async fn missing_target_list_aborts_before_any_output() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cfg = write_inputs(tmp.path(), &["http://a.test"], 4);
    cfg.target_list = tmp.path().join("missing.txt");

    let service = ScanService::new(cfg.clone(), Box::new(EchoEngine), None);
    let err = service.run().await.expect_err("must abort");
    assert!(err.is_fatal());
    assert!(
        !cfg.output_dir.exists() || fs::read_dir(&cfg.output_dir).unwrap().next().is_none(),
        "no output contents may exist after an INIT failure"
    );
}

/// CRLF target lists are normalized and blank lines skipped before
/// scanning starts.
#[tokio::test]
async fn crlf_target_list_is_normalized() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = write_inputs(tmp.path(), &[], 4);
    fs::write(&cfg.target_list, "http://a.test\r\n\r\nhttp://b.test\r\n").unwrap();

    let service = ScanService::new(cfg.clone(), Box::new(EchoEngine), None);
    let summary = service.run().await.expect("run must complete");

    assert_eq!(summary.targets, 2);
    assert!(cfg.output_dir.join("a.test.json").exists());
    assert!(cfg.output_dir.join("b.test.json").exists());
}
