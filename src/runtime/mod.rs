//! The running engine: shared state plus the two periodic tasks that mutate it.

pub mod dispatch;
pub mod poller;
pub mod scheduler;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::clock::{Clock, RandomSource};
use crate::models::GlobalState;
use crate::sync::CloudSync;
use crate::transport::ChatTransport;
use poller::SeenUpdates;

/// Every mutation of [`GlobalState`] happens while holding `state`.
pub struct Engine {
    pub state: Arc<Mutex<GlobalState>>,
    pub sync: CloudSync,
    /// `None` when no bot credential is configured; the ingestion loop then idles.
    transport: Option<Arc<dyn ChatTransport>>,
    clock: Arc<dyn Clock>,
    rng: Arc<dyn RandomSource>,
    broadcast_chats: Vec<i64>,
    privileged: Vec<String>,
    seen: std::sync::Mutex<SeenUpdates>,
    polling: AtomicBool,
    pub cancel: CancellationToken,
}

pub struct EngineParts {
    pub state: GlobalState,
    pub sync: CloudSync,
    pub transport: Option<Arc<dyn ChatTransport>>,
    pub clock: Arc<dyn Clock>,
    pub rng: Arc<dyn RandomSource>,
    pub broadcast_chats: Vec<i64>,
    pub privileged: Vec<String>,
}

impl Engine {
    pub fn new(parts: EngineParts, cancel: CancellationToken) -> Self {
        Self {
            state: Arc::new(Mutex::new(parts.state)),
            sync: parts.sync,
            transport: parts.transport,
            clock: parts.clock,
            rng: parts.rng,
            broadcast_chats: parts.broadcast_chats,
            privileged: parts.privileged,
            seen: std::sync::Mutex::new(SeenUpdates::default()),
            polling: AtomicBool::new(false),
            cancel,
        }
    }

    /// Write the current state out one last time.
    pub async fn flush(&self) {
        let snapshot = self.sync.snapshot(&*self.state.lock().await);
        if let Some(snapshot) = snapshot {
            self.sync.store(snapshot).await;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clock::{FixedClock, ScriptedRandom};
    use crate::error::TransportError;
    use crate::outbound::OutboundMessage;
    use crate::sync::tests::MemoryStore;
    use crate::transport::{InboundMessage, InboundUpdate};
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::VecDeque;
    use std::sync::atomic::Ordering;

    pub const CHANNELS: &[i64] = &[-1001];

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 18, 0, 0).unwrap()
    }

    /// Scripted transport: each `fetch_updates` call pops the next queued batch.
    #[derive(Clone, Default)]
    pub struct FakeTransport {
        batches: Arc<std::sync::Mutex<VecDeque<Vec<InboundUpdate>>>>,
        offsets: Arc<std::sync::Mutex<Vec<i64>>>,
        sent: Arc<std::sync::Mutex<Vec<OutboundMessage>>>,
        fail_fetch: Arc<AtomicBool>,
        fail_send: Arc<AtomicBool>,
    }

    impl FakeTransport {
        pub fn queue(&self, batch: Vec<InboundUpdate>) {
            self.batches.lock().unwrap().push_back(batch);
        }

        pub fn fail_next(&self) {
            self.fail_fetch.store(true, Ordering::SeqCst);
        }

        pub fn fail_sends(&self) {
            self.fail_send.store(true, Ordering::SeqCst);
        }

        pub fn sent(&self) -> Vec<OutboundMessage> {
            self.sent.lock().unwrap().clone()
        }

        pub fn requested_offsets(&self) -> Vec<i64> {
            self.offsets.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatTransport for FakeTransport {
        async fn fetch_updates(&self, offset: i64) -> Result<Vec<InboundUpdate>, TransportError> {
            self.offsets.lock().unwrap().push(offset);
            if self.fail_fetch.swap(false, Ordering::SeqCst) {
                return Err(TransportError::Api("Bad Gateway".into()));
            }
            Ok(self.batches.lock().unwrap().pop_front().unwrap_or_default())
        }

        async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
            if self.fail_send.load(Ordering::SeqCst) {
                return Err(TransportError::Api("Forbidden".into()));
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    pub fn message_update(update_id: i64, sender_id: i64, text: &str) -> InboundUpdate {
        InboundUpdate {
            update_id,
            message: Some(InboundMessage {
                sender_id,
                chat_id: sender_id,
                thread_id: None,
                sender_display_name: "Rin".into(),
                sender_handle: None,
                text: Some(text.into()),
            }),
        }
    }

    pub fn engine_with_rng(transport: FakeTransport, rng: ScriptedRandom) -> (Engine, MemoryStore) {
        let store = MemoryStore::default();
        let parts = EngineParts {
            state: GlobalState::new(now()),
            sync: CloudSync::new(None, Box::new(store.clone())),
            transport: Some(Arc::new(transport)),
            clock: Arc::new(FixedClock(now())),
            rng: Arc::new(rng),
            broadcast_chats: CHANNELS.to_vec(),
            privileged: Vec::new(),
        };
        (Engine::new(parts, CancellationToken::new()), store)
    }

    pub fn engine_with(transport: FakeTransport) -> (Engine, MemoryStore) {
        engine_with_rng(transport, ScriptedRandom::new())
    }

    #[tokio::test]
    async fn test_flush_pushes_current_state() {
        let (engine, store) = engine_with(FakeTransport::default());
        engine.state.lock().await.metadata.last_offset = 77;

        engine.flush().await;

        let blob = store.blob.lock().unwrap().clone().unwrap();
        assert_eq!(GlobalState::from_snapshot(&blob).unwrap().metadata.last_offset, 77);
    }

    #[tokio::test]
    async fn test_loops_exit_on_cancel() {
        let (engine, _) = engine_with(FakeTransport::default());
        let engine = Arc::new(engine);
        let poll = tokio::spawn(poller::run(engine.clone(), std::time::Duration::from_millis(5)));
        let tick = tokio::spawn(scheduler::run(engine.clone(), std::time::Duration::from_millis(5)));

        engine.cancel.cancel();
        poll.await.unwrap();
        tick.await.unwrap();
    }
}
