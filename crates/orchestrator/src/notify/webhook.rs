#![forbid(unsafe_code)]

use super::{Notifier, SuccessMessage};
use crate::error::Error;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Posts the message as JSON, e.g. to a chat incoming-webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| Error::Notification(err.to_string()))?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &SuccessMessage) -> Result<(), Error> {
        let payload = json!({
            "text": format!("{}\n{}", message.subject(), message.body()),
            "vm_id": message.vm_id,
            "vm_name": message.vm_name,
            "completed_at": message.completed_at,
        });
        self.client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| Error::Notification(err.to_string()))?;
        debug!(url = %self.url, "webhook notified");
        Ok(())
    }
}
