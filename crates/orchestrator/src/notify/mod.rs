#![forbid(unsafe_code)]

mod message;
mod sendmail;
mod webhook;

pub use message::SuccessMessage;
pub use sendmail::SendmailNotifier;
pub use webhook::WebhookNotifier;

use crate::error::Error;
use async_trait::async_trait;
use tracing::info;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Tell the operator that all snapshots of a machine completed.
    async fn notify(&self, message: &SuccessMessage) -> Result<(), Error>;
}

/// Notifier that only logs.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &SuccessMessage) -> Result<(), Error> {
        info!(
            vm_id = %message.vm_id,
            vm_name = %message.vm_name,
            subject = %message.subject(),
            completed = %message.completed_list(),
            "snapshot success"
        );
        Ok(())
    }
}

/// Build the notifier selected in the configuration.
pub fn from_config(notification: &config::Notification) -> Result<Box<dyn Notifier>, Error> {
    Ok(match notification {
        config::Notification::Sendmail { to, from, program } => Box::new(SendmailNotifier::new(
            program.clone(),
            to.clone(),
            from.clone(),
        )),
        config::Notification::Webhook { url } => Box::new(WebhookNotifier::new(url.clone())?),
        config::Notification::Log => Box::new(LogNotifier),
    })
}
