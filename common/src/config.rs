use std::path::PathBuf;

/// HTTP status codes captured by default.
///
/// Anything outside this set is dropped by the engine to bound the size
/// of the per-shard reports.
pub const DEFAULT_MATCH_CODES: &[u16] = &[200, 301, 302, 307, 401, 403, 405, 500];

/// User-Agent header sent with every engine request.
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; probr)";

/// Number of wordlist shards per run.
pub const DEFAULT_SHARD_COUNT: usize = 4;

/// Everything one scan run needs, resolved up front.
///
/// Built once by the CLI and handed to the orchestrator; components never
/// reach for process-wide state.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// File with one target URL per line.
    pub target_list: PathBuf,
    /// Wordlist to be partitioned across shards.
    pub wordlist: PathBuf,
    /// Cosmetic label carried into notifications and the summary.
    pub session: String,
    /// Directory receiving the per-target combined reports.
    pub output_dir: PathBuf,
    pub shard_count: usize,
    /// Status codes the engine is asked to keep.
    pub match_codes: Vec<u16>,
    /// Engine binary name or path, resolved via PATH lookup.
    pub engine_bin: String,
    pub user_agent: String,
    /// Pass the engine's auto-calibration flag.
    pub auto_calibrate: bool,
    /// Ask the engine to stop a job early when it sees spurious results.
    pub stop_on_errors: bool,
}

impl RunConfig {
    pub fn new(target_list: PathBuf, wordlist: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            target_list,
            wordlist,
            session: String::from("probr"),
            output_dir,
            shard_count: DEFAULT_SHARD_COUNT,
            match_codes: DEFAULT_MATCH_CODES.to_vec(),
            engine_bin: String::from("ffuf"),
            user_agent: String::from(USER_AGENT),
            auto_calibrate: false,
            stop_on_errors: false,
        }
    }

    /// Comma-joined status codes in the form the engine expects.
    pub fn match_codes_arg(&self) -> String {
        self.match_codes
            .iter()
            .map(|code| code.to_string())
            .collect::<Vec<String>>()
            .join(",")
    }

    /// Path of the run-scoped error log, truncated at run start.
    pub fn error_log_path(&self) -> PathBuf {
        self.output_dir.join("errors.log")
    }
}
