use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::models::{ActiveEvent, GlobalState};
use crate::runtime::Engine;

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub players: usize,
    pub commands_processed: u64,
    pub last_offset: i64,
    pub server_start_time: DateTime<Utc>,
    pub active_event: Option<ActiveEvent>,
}

impl From<&GlobalState> for StatusBody {
    fn from(state: &GlobalState) -> Self {
        Self {
            players: state.players.len(),
            commands_processed: state.metadata.total_commands_processed,
            last_offset: state.metadata.last_offset,
            server_start_time: state.metadata.server_start_time,
            active_event: state.current_event().cloned(),
        }
    }
}

pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(status))
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn status(State(engine): State<Arc<Engine>>) -> Json<StatusBody> {
    let state = engine.state.lock().await;
    Json(StatusBody::from(&*state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerRecord;

    #[test]
    fn test_status_body_counts() {
        let now = Utc::now();
        let mut state = GlobalState::new(now);
        state.players.insert("1".into(), PlayerRecord::new("1".into(), "A".into(), now));
        state.metadata.total_commands_processed = 9;
        state.metadata.last_offset = 120;

        let body = serde_json::to_value(StatusBody::from(&state)).unwrap();
        assert_eq!(body["players"], 1);
        assert_eq!(body["commands_processed"], 9);
        assert_eq!(body["last_offset"], 120);
        assert!(body["active_event"].is_null());
    }
}
