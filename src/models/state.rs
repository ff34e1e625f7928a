use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::player::PlayerRecord;

/// Server-wide time-boxed buff. At most one exists; it stays "active" past
/// `end_time` until the next scheduler tick notices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveEvent {
    pub is_active: bool,
    pub theme: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub xp_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildData {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    /// Sum of all joining fees paid.
    #[serde(default)]
    pub coins: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Next update id to request; everything below it has been handled.
    pub last_offset: i64,
    pub server_start_time: DateTime<Utc>,
    pub total_commands_processed: u64,
}

/// The single source of truth. Persisted as one JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalState {
    #[serde(default)]
    pub players: BTreeMap<String, PlayerRecord>,
    #[serde(default)]
    pub guilds: BTreeMap<String, GuildData>,
    #[serde(default)]
    pub active_event: Option<ActiveEvent>,
    pub metadata: Metadata,
}

impl GlobalState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            players: BTreeMap::new(),
            guilds: BTreeMap::new(),
            active_event: None,
            metadata: Metadata {
                last_offset: 0,
                server_start_time: now,
                total_commands_processed: 0,
            },
        }
    }

    /// The running event, if one is flagged active. Does not look at the clock.
    pub fn current_event(&self) -> Option<&ActiveEvent> {
        self.active_event.as_ref().filter(|e| e.is_active)
    }

    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_snapshot(blob: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(blob)
    }
}
