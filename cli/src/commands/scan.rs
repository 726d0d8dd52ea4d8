use std::time::{Duration, Instant};

use colored::*;
use tracing::{Instrument, info_span};

use probr_common::config::RunConfig;
use probr_common::info;
use probr_core::engine::FfufEngine;
use probr_core::orchestrator::{RunSummary, ScanService};
use probr_notify::Credentials;

use crate::commands::ScanArgs;
use crate::terminal::print;

pub async fn scan(args: ScanArgs) -> anyhow::Result<()> {
    if args.shards == 0 {
        anyhow::bail!("shard count must be at least 1");
    }

    let cfg = build_config(&args);
    let engine = Box::new(FfufEngine::from_config(&cfg));
    let notifier = match credentials(&args) {
        Some(creds) => Some(probr_notify::from_credentials(creds)),
        None => {
            info!("no notification credentials supplied, running without dispatch");
            None
        }
    };

    let service = ScanService::new(cfg.clone(), engine, notifier);

    let start_time: Instant = Instant::now();
    let span = info_span!("scan", indicatif.pb_show = true);
    let summary = service.run().instrument(span).await?;

    scan_ends(&cfg, &summary, start_time.elapsed());
    Ok(())
}

fn build_config(args: &ScanArgs) -> RunConfig {
    let mut cfg = RunConfig::new(
        args.targets.clone(),
        args.wordlist.clone(),
        args.output.clone(),
    );
    cfg.session = args.session.clone();
    cfg.shard_count = args.shards;
    cfg.match_codes = args.match_codes.clone();
    cfg.engine_bin = args.engine_bin.clone();
    cfg.auto_calibrate = args.auto_calibrate;
    cfg.stop_on_errors = args.stop_on_errors;
    cfg
}

fn credentials(args: &ScanArgs) -> Option<Credentials> {
    if let Some(url) = &args.webhook_url {
        return Some(Credentials::Webhook { url: url.clone() });
    }
    match (&args.bot_token, &args.chat_id) {
        (Some(token), Some(chat_id)) => Some(Credentials::Bot {
            token: token.clone(),
            chat_id: chat_id.clone(),
        }),
        _ => None,
    }
}

fn scan_ends(cfg: &RunConfig, summary: &RunSummary, total_time: Duration) {
    print::header("Scan Complete");

    print::aligned_line("Targets", summary.targets.to_string().normal());
    print::aligned_line(
        "Reports",
        summary.reports.len().to_string().green().bold(),
    );

    let skipped = summary.skipped_targets.to_string();
    print::aligned_line(
        "Skipped",
        if summary.skipped_targets > 0 {
            skipped.yellow().bold()
        } else {
            skipped.normal()
        },
    );

    let failures = summary.shard_failures.to_string();
    print::aligned_line(
        "Shard failures",
        if summary.shard_failures > 0 {
            failures.red().bold()
        } else {
            failures.normal()
        },
    );

    if summary.shard_failures > 0 || summary.skipped_targets > 0 {
        print::print_status(format!(
            "error log: {}",
            cfg.error_log_path().display()
        ));
    }

    print::fat_separator();
    let elapsed = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    print::centerln(&format!("finished in {elapsed}"));
}
