//! Generic webhook backend.
//!
//! Discord-compatible: one multipart POST to a fixed URL with a
//! `payload_json` field carrying the caption and `files[n]` fields for
//! the attachments.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use crate::{attachment_name, read_attachment, Notification, Notifier, NotifyError};

pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }

    fn form(&self, notification: &Notification) -> Result<Form, NotifyError> {
        let payload = serde_json::json!({ "content": notification.caption });
        let mut form = Form::new().text("payload_json", payload.to_string());

        for (idx, path) in notification.attachments.iter().enumerate() {
            let bytes = read_attachment(path)?;
            let part = Part::bytes(bytes)
                .file_name(attachment_name(path))
                .mime_str("application/octet-stream")?;
            form = form.part(format!("files[{idx}]"), part);
        }

        Ok(form)
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let form = self.form(notification)?;
        let response = self.client.post(&self.url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!("webhook accepted notification ({status})");
        Ok(())
    }
}
