//! Periodic maintenance: expire timed effects, then advance the global event.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use super::dispatch::deliver;
use super::Engine;
use crate::game::{effects, events};
use crate::outbound::{Keyboard, OutboundMessage};

impl Engine {
    /// One scheduler tick. Pushes state if anything changed and returns the messages sent.
    pub async fn tick(&self) -> usize {
        if self.cancel.is_cancelled() {
            return 0;
        }

        let mut state = self.state.lock().await;
        if self.cancel.is_cancelled() {
            tracing::debug!("Stopped while waiting for state, skipping tick");
            return 0;
        }
        let now = self.clock.now();

        let effects_before: usize = state.players.values().map(|p| p.active_effects.len()).sum();
        let expired = effects::sweep_expired(&mut state, now);
        let effects_after: usize = state.players.values().map(|p| p.active_effects.len()).sum();

        let mut outbound: Vec<OutboundMessage> = Vec::new();
        for notice in &expired {
            match notice.player_id.parse::<i64>() {
                Ok(chat_id) => outbound.push(OutboundMessage::new(
                    chat_id,
                    "⌛ Item Habis",
                    format!("{}\nsudah tidak aktif.", notice.item),
                    Keyboard::None,
                )),
                Err(_) => tracing::warn!("Cannot notify player {}: id is not a chat id", notice.player_id),
            }
        }

        let transition = events::tick(&mut state, now, self.rng.as_ref());
        if let Some(transition) = &transition {
            tracing::info!("Global event transition: {:?}", transition);
            outbound.extend(events::announcement(transition, &self.broadcast_chats));
        }

        let changed = effects_before != effects_after || transition.is_some();
        tracing::debug!("Tick: {} expired, event changed: {}", expired.len(), transition.is_some());
        if !changed {
            return 0;
        }

        let snapshot = self.sync.snapshot(&state);
        drop(state);

        if let Some(snapshot) = snapshot {
            self.sync.store(snapshot).await;
        }
        match self.transport.as_deref() {
            Some(transport) => deliver(transport, outbound).await,
            None => 0,
        }
    }
}

/// Tick on a fixed cadence until cancelled. The first tick fires after one full interval.
pub async fn run(engine: Arc<Engine>, every: Duration) {
    let start = tokio::time::Instant::now() + every;
    let mut ticker = tokio::time::interval_at(start, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!("Scheduler started (every {:?})", every);
    loop {
        tokio::select! {
            _ = engine.cancel.cancelled() => break,
            _ = ticker.tick() => {
                engine.tick().await;
            }
        }
    }
    tracing::info!("Scheduler stopped");
}

#[cfg(test)]
mod tests {
    use crate::clock::ScriptedRandom;
    use crate::models::{ActiveEffect, ActiveEvent, PlayerRecord};
    use crate::runtime::tests::{engine_with, engine_with_rng, now, FakeTransport, CHANNELS};
    use chrono::Duration;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_expired_effect_notifies_owner_once() {
        let transport = FakeTransport::default();
        let (engine, store) = engine_with(transport.clone());
        {
            let mut state = engine.state.lock().await;
            let mut p = PlayerRecord::new("42".into(), "Rin".into(), now());
            p.active_effects.push(ActiveEffect {
                name: "🔥 Phoenix Amulet".into(),
                expires_at: Some(now() - Duration::minutes(1)),
                remaining_uses: None,
            });
            p.active_effects.push(ActiveEffect {
                name: "🧪 Power Elixir".into(),
                expires_at: None,
                remaining_uses: Some(3),
            });
            state.players.insert("42".into(), p);
        }

        assert_eq!(engine.tick().await, 1);
        let sent = transport.sent();
        assert_eq!(sent[0].chat_id, 42);
        assert!(sent[0].body.contains("Phoenix Amulet"));
        assert_eq!(store.write_count(), 1);

        let state = engine.state.lock().await;
        assert_eq!(state.players["42"].active_effects.len(), 1);
        drop(state);

        // Nothing left to expire.
        assert_eq!(engine.tick().await, 0);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_ended_event_closes_with_single_broadcast() {
        let transport = FakeTransport::default();
        let (engine, store) = engine_with(transport.clone());
        {
            let mut state = engine.state.lock().await;
            for id in ["1", "2", "3"] {
                state.players.insert(id.into(), PlayerRecord::new(id.into(), id.into(), now()));
            }
            state.active_event = Some(ActiveEvent {
                is_active: true,
                theme: "🌕 Blood Moon".into(),
                start_time: now() - Duration::hours(2),
                end_time: now() - Duration::hours(1),
                xp_multiplier: 2.0,
            });
        }

        assert_eq!(engine.tick().await, CHANNELS.len());
        assert_eq!(transport.sent().len(), 1);
        assert_eq!(transport.sent()[0].chat_id, CHANNELS[0]);
        assert!(!engine.state.lock().await.active_event.as_ref().unwrap().is_active);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_event_starts_on_lucky_roll() {
        let transport = FakeTransport::default();
        let rng = ScriptedRandom::new().with_percents(&[0.5]).with_indices(&[1]);
        let (engine, _) = engine_with_rng(transport.clone(), rng);

        assert_eq!(engine.tick().await, 1);
        let state = engine.state.lock().await;
        let event = state.current_event().unwrap();
        assert_eq!(event.end_time, now() + Duration::hours(1));
    }

    #[tokio::test]
    async fn test_stop_while_waiting_for_state_leaves_it_alone() {
        let transport = FakeTransport::default();
        let (engine, store) = engine_with(transport.clone());
        let engine = Arc::new(engine);
        engine.state.lock().await.active_event = Some(ActiveEvent {
            is_active: true,
            theme: "🌕 Blood Moon".into(),
            start_time: now() - Duration::hours(2),
            end_time: now() - Duration::hours(1),
            xp_multiplier: 2.0,
        });

        let guard = engine.state.lock().await;
        let tick = tokio::spawn({
            let engine = engine.clone();
            async move { engine.tick().await }
        });
        // Let the tick get past its first stop check and queue on the lock.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        engine.cancel.cancel();
        drop(guard);

        assert_eq!(tick.await.unwrap(), 0);
        assert!(transport.sent().is_empty());
        assert_eq!(store.write_count(), 0);
        assert!(engine.state.lock().await.active_event.as_ref().unwrap().is_active);
    }

    #[tokio::test]
    async fn test_quiet_tick_does_not_push() {
        let transport = FakeTransport::default();
        let (engine, store) = engine_with(transport.clone());

        assert_eq!(engine.tick().await, 0);
        assert_eq!(store.write_count(), 0);
        assert!(transport.sent().is_empty());
    }
}
