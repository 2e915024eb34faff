//! # vault-gateway
//!
//! The messaging-bot boundary.
//!
//! Outbound: [`Notifier`] delivers fire-and-forget notifications. A
//! notify must never block or fail the domain operation that triggered
//! it; implementations swallow their own errors.
//!
//! Inbound: [`BotUpdate`] is the parsed form of everything the bot can
//! report back into the core.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use vault_types::ChatId;

/// A message queued for delivery to a chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub text: String,
}

/// Fire-and-forget outbound delivery.
pub trait Notifier: Send + Sync {
    /// Queue a message for a chat. Must not block and must not fail the
    /// caller.
    fn notify(&self, chat_id: ChatId, text: &str);
}

/// Notifier backed by a bounded channel. A full or closed channel drops
/// the message with a warning; delivery is best-effort by contract.
pub struct ChannelNotifier {
    tx: mpsc::Sender<OutboundMessage>,
}

impl ChannelNotifier {
    /// Create the notifier and the receiving end the transport drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, chat_id: ChatId, text: &str) {
        let message = OutboundMessage {
            chat_id,
            text: text.to_string(),
        };
        if let Err(e) = self.tx.try_send(message) {
            tracing::warn!(chat_id, "outbound notification dropped: {e}");
        }
    }
}

/// Notifier that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _chat_id: ChatId, _text: &str) {}
}

/// Notifier that records messages for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: std::sync::Mutex<Vec<OutboundMessage>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything notified so far.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, chat_id: ChatId, text: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(OutboundMessage {
                chat_id,
                text: text.to_string(),
            });
        }
    }
}

/// Everything the bot can report back into the core.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BotUpdate {
    /// A registration deep link was opened in a chat.
    DeepLinkOpened {
        reg_id: String,
        chat_id: ChatId,
        first_name: String,
    },
    /// The chat user confirmed the registration.
    ConfirmationRequested {
        reg_id: String,
        chat_id: ChatId,
        first_name: String,
    },
    /// The chat user asked for a login code.
    LoginCodeRequested {
        chat_id: ChatId,
        #[serde(default)]
        username: String,
        #[serde(default)]
        first_name: String,
    },
    /// The chat user asked for their balance.
    BalanceRequested { chat_id: ChatId },
}
