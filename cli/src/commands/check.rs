use colored::*;

use probr_common::success;
use probr_core::engine::{FfufEngine, FuzzEngine};

use crate::terminal::print;

/// Reports whether the fuzz engine binary can be invoked, and its
/// version if it announces one. Exits non-zero when it cannot.
pub async fn check(engine_bin: &str) -> anyhow::Result<()> {
    print::print_status(format!("probing '{engine_bin}'"));

    let engine = FfufEngine::new(engine_bin);
    let version = engine.probe().await?;

    if version.is_empty() {
        success!("{} is available", engine_bin.green().bold());
    } else {
        success!("{} is available ({version})", engine_bin.green().bold());
    }
    Ok(())
}
