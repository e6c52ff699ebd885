//! Outbound Notification Contract
//!
//! Fire-and-forget acknowledgements back to the chat actor who handed the
//! library a file. Delivery failure never undoes the work being
//! acknowledged; callers log it and move on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Outcome of a message delivery attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Whether the platform accepted the message
    pub ok: bool,
    /// Platform-supplied failure description, when `ok` is false
    pub description: Option<String>,
}

/// Sends text messages to a chat on the platform.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` to `chat_id`.
    ///
    /// A transport-level failure is an `Err`; a platform-level rejection
    /// comes back as `Ok(receipt)` with `ok == false`.
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<DeliveryReceipt>;
}
