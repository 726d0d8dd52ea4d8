//! Telegram-style bot API backend.
//!
//! One `sendDocument` multipart POST per attachment against the
//! token-scoped endpoint, with `chat_id`, `caption` and `document`
//! fields. A captionless message (no attachments) degrades to
//! `sendMessage`.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use crate::{attachment_name, read_attachment, Notification, Notifier, NotifyError};

const API_BASE: &str = "https://api.telegram.org";

pub struct BotNotifier {
    client: Client,
    token: String,
    chat_id: String,
}

impl BotNotifier {
    pub fn new(token: String, chat_id: String) -> Self {
        Self {
            client: Client::new(),
            token,
            chat_id,
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{API_BASE}/bot{}/{method}", self.token)
    }

    async fn post(&self, url: &str, form: Form) -> Result<(), NotifyError> {
        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for BotNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        if notification.attachments.is_empty() {
            let form = Form::new()
                .text("chat_id", self.chat_id.clone())
                .text("text", notification.caption.clone());
            self.post(&self.endpoint("sendMessage"), form).await?;
            debug!("bot accepted text notification");
            return Ok(());
        }

        for path in &notification.attachments {
            let bytes = read_attachment(path)?;
            let document = Part::bytes(bytes)
                .file_name(attachment_name(path))
                .mime_str("application/octet-stream")?;

            let form = Form::new()
                .text("chat_id", self.chat_id.clone())
                .text("caption", notification.caption.clone())
                .part("document", document);

            self.post(&self.endpoint("sendDocument"), form).await?;
        }

        debug!(
            "bot accepted {} document(s)",
            notification.attachments.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_token_scoped() {
        let notifier = BotNotifier::new("123:abc".into(), "42".into());
        assert_eq!(
            notifier.endpoint("sendDocument"),
            "https://api.telegram.org/bot123:abc/sendDocument"
        );
    }
}
