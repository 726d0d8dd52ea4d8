pub mod config;
pub mod error;
pub mod report;
pub mod target;

#[doc(hidden)]
pub use tracing;

/// Status-line macros used across the workspace.
///
/// These forward to [`tracing`] under the `probr::status` target so the
/// CLI formatter can render them as user-facing progress lines while
/// library consumers still get plain structured events.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "probr::status", $($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "probr::status", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!(target: "probr::status", $($arg)*)
    };
}
