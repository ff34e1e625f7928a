use async_trait::async_trait;

use crate::error::TransportError;
use crate::outbound::OutboundMessage;

/// One inbound update. Non-message updates still carry an id so the cursor can move past them.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundUpdate {
    pub update_id: i64,
    pub message: Option<InboundMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub sender_id: i64,
    pub chat_id: i64,
    pub thread_id: Option<i64>,
    pub sender_display_name: String,
    pub sender_handle: Option<String>,
    pub text: Option<String>,
}

/// The chat network the bot lives on. Delivery is at-least-once and ordered by update id.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Long-poll for updates with id >= `offset`.
    async fn fetch_updates(&self, offset: i64) -> Result<Vec<InboundUpdate>, TransportError>;

    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError>;
}
