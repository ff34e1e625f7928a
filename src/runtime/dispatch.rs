use std::fmt::Display;

use crate::outbound::OutboundMessage;
use crate::transport::ChatTransport;

/// Log a failed best-effort operation and carry on. Every swallowed
/// transport or storage error goes through here.
pub fn log_discard<T, E: Display>(what: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("{} failed, skipping: {}", what, e);
            None
        }
    }
}

/// Send each message once, in order. A failed send is logged and never retried.
pub async fn deliver(transport: &dyn ChatTransport, messages: Vec<OutboundMessage>) -> usize {
    let mut sent = 0;
    for message in messages {
        let what = format!("send to chat {}", message.chat_id);
        if log_discard(&what, transport.send(&message).await).is_some() {
            sent += 1;
        }
    }
    sent
}
