//! Outbound messengers used by the CLI
//!
//! Orders are "sent" by printing the chat link the visitor would open.
//! Contact messages are appended to an outbox file standing in for the e-mail
//! relay.

use cart_ledger::order::chat_link;
use cart_ledger::{LedgerError, Messenger, OutboundPayload};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Prints a chat link carrying the payload body
pub struct ChatLinkMessenger {
    number: String,
}

impl ChatLinkMessenger {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
        }
    }
}

impl Messenger for ChatLinkMessenger {
    fn send(&mut self, payload: &OutboundPayload) -> cart_ledger::Result<()> {
        if !self.number.chars().any(|c| c.is_ascii_digit()) {
            return Err(LedgerError::Delivery(format!(
                "no chat number configured (got {:?})",
                self.number
            )));
        }

        println!("{}\n", payload.body);
        println!("Open to send: {}", chat_link(&self.number, &payload.body));
        Ok(())
    }
}

/// Appends each payload to a text file
pub struct OutboxMessenger {
    path: PathBuf,
}

impl OutboxMessenger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Messenger for OutboxMessenger {
    fn send(&mut self, payload: &OutboundPayload) -> cart_ledger::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            file,
            "--- {} ({})\n{}\n",
            payload.subject,
            chrono::Utc::now().to_rfc3339(),
            payload.body
        )?;

        log::debug!("Appended '{}' to {:?}", payload.subject, self.path);
        Ok(())
    }
}
