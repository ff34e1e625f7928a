//! Ingestion loop: long-poll the transport and feed each new update through the interpreter.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use super::dispatch::{deliver, log_discard};
use super::Engine;
use crate::commands::{self, Context, Sender};
use crate::transport::InboundMessage;

const SEEN_CAPACITY: usize = 1000;

/// Recently handled update ids, so a redelivered update is never applied twice
/// even if the cursor was rolled back by a pull.
#[derive(Debug, Default)]
pub struct SeenUpdates {
    order: VecDeque<i64>,
    ids: HashSet<i64>,
}

impl SeenUpdates {
    /// Record `id`. Returns false if it was already recorded.
    pub fn insert(&mut self, id: i64) -> bool {
        if !self.ids.insert(id) {
            return false;
        }
        self.order.push_back(id);
        if self.order.len() > SEEN_CAPACITY {
            if let Some(old) = self.order.pop_front() {
                self.ids.remove(&old);
            }
        }
        true
    }
}

/// Held while a poll cycle is outstanding.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl From<&InboundMessage> for Sender {
    fn from(message: &InboundMessage) -> Self {
        Sender {
            id: message.sender_id.to_string(),
            chat_id: message.chat_id,
            thread_id: message.thread_id,
            display_name: message.sender_display_name.clone(),
            handle: message.sender_handle.clone(),
        }
    }
}

impl Engine {
    /// One poll cycle. Returns how many updates were applied.
    ///
    /// Refuses to run while another cycle is outstanding or after a stop request,
    /// and re-checks the stop request before touching state once the fetch returns.
    pub async fn poll_once(&self) -> usize {
        let Some(transport) = self.transport.as_deref() else {
            return 0;
        };
        if self.cancel.is_cancelled() {
            return 0;
        }
        let Some(_in_flight) = InFlight::acquire(&self.polling) else {
            tracing::debug!("Previous poll still outstanding, skipping");
            return 0;
        };

        let offset = self.state.lock().await.metadata.last_offset;
        let Some(updates) = log_discard("poll", transport.fetch_updates(offset).await) else {
            return 0;
        };
        if updates.is_empty() {
            return 0;
        }

        let mut state = self.state.lock().await;
        if self.cancel.is_cancelled() {
            tracing::debug!("Stopped during poll, dropping {} updates", updates.len());
            return 0;
        }

        let now = self.clock.now();
        let ctx = Context {
            now,
            rng: self.rng.as_ref(),
            broadcast_chats: &self.broadcast_chats,
            privileged: &self.privileged,
        };

        let mut outbound = Vec::new();
        let mut applied = 0;
        {
            let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
            for update in updates {
                if update.update_id < state.metadata.last_offset || !seen.insert(update.update_id) {
                    tracing::debug!("Skipping already handled update {}", update.update_id);
                    continue;
                }
                state.metadata.last_offset = state.metadata.last_offset.max(update.update_id + 1);
                applied += 1;

                let Some(message) = update.message else { continue };
                let Some(text) = message.text.as_deref() else { continue };

                let sender = Sender::from(&message);
                tracing::info!("Update {} from {} ({}): {:?}", update.update_id, sender.display_name, sender.id, text);
                outbound.extend(commands::interpret(&mut state, &ctx, &sender, text));
            }
        }

        if applied == 0 {
            return 0;
        }
        let snapshot = self.sync.snapshot(&state);
        drop(state);

        if let Some(snapshot) = snapshot {
            self.sync.store(snapshot).await;
        }
        deliver(transport, outbound).await;
        applied
    }
}

/// Poll on a fixed cadence until cancelled.
pub async fn run(engine: Arc<Engine>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!("Ingestion loop started (every {:?})", every);
    loop {
        tokio::select! {
            _ = engine.cancel.cancelled() => break,
            _ = ticker.tick() => {
                engine.poll_once().await;
            }
        }
    }
    tracing::info!("Ingestion loop stopped");
}
