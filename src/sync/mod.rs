//! Cloud reconciliation. Local memory is authoritative once running; the remote
//! blob and the local snapshot exist for durability and are only read at startup.

mod store;

pub use store::{FileStore, HttpStore, RemoteStore};

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

use crate::models::GlobalState;
use crate::runtime::dispatch::log_discard;

/// A serialized state, numbered in the order it was taken.
#[derive(Debug)]
pub struct Snapshot {
    seq: u64,
    blob: String,
}

pub struct CloudSync {
    remote: Option<Box<dyn RemoteStore>>,
    local: Box<dyn RemoteStore>,
    next_seq: AtomicU64,
    /// Sequence number of the newest snapshot written. Held for the whole write,
    /// so at most one write is in flight.
    written: Mutex<u64>,
}

impl CloudSync {
    pub fn new(remote: Option<Box<dyn RemoteStore>>, local: Box<dyn RemoteStore>) -> Self {
        Self {
            remote,
            local,
            next_seq: AtomicU64::new(1),
            written: Mutex::new(0),
        }
    }

    /// Latest stored state: the remote blob if reachable and valid, else the local snapshot.
    /// `None` means start fresh.
    pub async fn pull(&self) -> Option<GlobalState> {
        if let Some(remote) = &self.remote {
            match remote.load().await {
                Ok(Some(blob)) => match GlobalState::from_snapshot(&blob) {
                    Ok(state) => {
                        tracing::info!("Loaded {} players from cloud store", state.players.len());
                        return Some(state);
                    }
                    Err(e) => tracing::warn!("Cloud state is unreadable, ignoring it: {}", e),
                },
                Ok(None) => tracing::info!("Cloud store is empty"),
                Err(e) => tracing::warn!("Cloud pull failed: {}", e),
            }
        }

        match self.local.load().await {
            Ok(Some(blob)) => match GlobalState::from_snapshot(&blob) {
                Ok(state) => {
                    tracing::info!("Loaded {} players from local snapshot", state.players.len());
                    Some(state)
                }
                Err(e) => {
                    tracing::error!("Local snapshot is unreadable, ignoring it: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Local snapshot load failed: {}", e);
                None
            }
        }
    }

    /// Serialize `state`. Call this while holding the state lock, so snapshot
    /// numbers follow the order of the mutations they capture.
    pub fn snapshot(&self, state: &GlobalState) -> Option<Snapshot> {
        match state.to_snapshot() {
            Ok(blob) => Some(Snapshot {
                seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
                blob,
            }),
            Err(e) => {
                tracing::error!("Failed to serialize state: {}", e);
                None
            }
        }
    }

    /// Overwrite both copies with `snapshot`. Writes never overlap, and a snapshot
    /// older than one already written is dropped. Failures are logged and dropped.
    pub async fn store(&self, snapshot: Snapshot) {
        let mut written = self.written.lock().await;
        if snapshot.seq <= *written {
            tracing::debug!("Skipping stale snapshot {} (have {})", snapshot.seq, *written);
            return;
        }

        log_discard("local snapshot write", self.local.store(&snapshot.blob).await);
        if let Some(remote) = &self.remote {
            log_discard("cloud push", remote.store(&snapshot.blob).await);
        }
        *written = snapshot.seq;
    }
}
