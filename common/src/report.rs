//! Shard and combined report shapes.
//!
//! The engine writes one JSON report per (target, shard) pair. The only
//! contract is a top-level `results` array; the finding records themselves
//! are engine-defined and carried through opaquely.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One engine report, as read back from a shard's output file.
///
/// Unknown top-level keys are tolerated; a missing `results` key is a
/// deserialization error, which is what marks a shard report invalid.
#[derive(Debug, Clone, Deserialize)]
pub struct ShardReport {
    pub results: Vec<Value>,
}

/// The per-target merged report written to the output directory.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedReport {
    pub results: Vec<Value>,
}

impl CombinedReport {
    /// Concatenates shard results in the order given.
    ///
    /// Callers pass shards in ascending shard-index order; no
    /// de-duplication happens across shards.
    pub fn from_shards(shards: Vec<ShardReport>) -> Self {
        let results = shards
            .into_iter()
            .flat_map(|shard| shard.results)
            .collect();
        Self { results }
    }
}
