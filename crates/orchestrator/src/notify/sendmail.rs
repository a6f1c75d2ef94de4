#![forbid(unsafe_code)]

use super::{Notifier, SuccessMessage};
use crate::error::Error;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Hands the message to a sendmail-compatible MTA (`sendmail -t -i`).
#[derive(Debug, Clone)]
pub struct SendmailNotifier {
    program: PathBuf,
    to: String,
    from: String,
}

impl SendmailNotifier {
    pub fn new(program: PathBuf, to: String, from: String) -> Self {
        Self { program, to, from }
    }

    fn render(&self, message: &SuccessMessage) -> String {
        format!(
            "To: {}\r\nFrom: {}\r\nSubject: {}\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}",
            self.to,
            self.from,
            message.subject(),
            message.body()
        )
    }
}

#[async_trait]
impl Notifier for SendmailNotifier {
    async fn notify(&self, message: &SuccessMessage) -> Result<(), Error> {
        let mail = self.render(message);
        let mut child = Command::new(&self.program)
            .args(["-t", "-i"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                Error::Notification(format!("cannot run {}: {err}", self.program.display()))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(mail.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(Error::Notification(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        debug!(to = %self.to, subject = %message.subject(), "mail handed to sendmail");
        Ok(())
    }
}
