//! Chat notification dispatch.
//!
//! Scan results and error reports are mirrored to a chat service so a
//! human can monitor long runs. Two interchangeable backends exist:
//! a generic webhook (Discord-style multipart POST) and a Telegram-style
//! bot API. Selection is by which credential set is supplied.
//!
//! Delivery is strictly fire-and-forget: no retries, and a transport
//! failure must never abort or roll back the scan that produced the
//! files being sent.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

pub mod bot;
pub mod webhook;

pub use bot::BotNotifier;
pub use webhook::WebhookNotifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service answered {status}")]
    Rejected { status: u16 },

    #[error("cannot read attachment {path}: {source}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One message: a caption plus zero or more file attachments.
#[derive(Debug, Clone)]
pub struct Notification {
    pub caption: String,
    pub attachments: Vec<PathBuf>,
}

impl Notification {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachments.push(path.into());
        self
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Which credentials the user supplied.
#[derive(Debug, Clone)]
pub enum Credentials {
    Webhook { url: String },
    Bot { token: String, chat_id: String },
}

/// Builds the backend matching the supplied credential set.
pub fn from_credentials(credentials: Credentials) -> Box<dyn Notifier> {
    match credentials {
        Credentials::Webhook { url } => Box::new(WebhookNotifier::new(url)),
        Credentials::Bot { token, chat_id } => Box::new(BotNotifier::new(token, chat_id)),
    }
}

pub(crate) fn read_attachment(path: &Path) -> Result<Vec<u8>, NotifyError> {
    std::fs::read(path).map_err(|source| NotifyError::Attachment {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn attachment_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("attachment"))
}
