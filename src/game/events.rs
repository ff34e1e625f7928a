//! Server-wide XP events. Two states, checked lazily on each scheduler tick.

use chrono::{DateTime, Duration, Utc};

use crate::catalog;
use crate::clock::RandomSource;
use crate::models::{ActiveEvent, GlobalState};
use crate::outbound::OutboundMessage;

/// Chance per tick, in percent, that an idle server starts an event.
pub const EVENT_START_CHANCE: f64 = 2.0;
pub const EVENT_DURATION_HOURS: i64 = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum EventTransition {
    Started(ActiveEvent),
    Ended(ActiveEvent),
}

/// Advance the event state machine by one tick.
///
/// An event past its end time is closed; otherwise an idle server may start one.
/// At most one transition happens per tick.
pub fn tick(state: &mut GlobalState, now: DateTime<Utc>, rng: &dyn RandomSource) -> Option<EventTransition> {
    if let Some(event) = state.active_event.as_mut().filter(|e| e.is_active) {
        if now < event.end_time {
            return None;
        }
        event.is_active = false;
        return Some(EventTransition::Ended(event.clone()));
    }

    if rng.percent() >= EVENT_START_CHANCE {
        return None;
    }

    let theme = &catalog::EVENT_THEMES[rng.index(catalog::EVENT_THEMES.len())];
    let event = ActiveEvent {
        is_active: true,
        theme: theme.theme.to_string(),
        start_time: now,
        end_time: now + Duration::hours(EVENT_DURATION_HOURS),
        xp_multiplier: theme.xp_multiplier,
    };
    state.active_event = Some(event.clone());
    Some(EventTransition::Started(event))
}

/// One announcement per broadcast chat, never one per player.
pub fn announcement(transition: &EventTransition, channels: &[i64]) -> Vec<OutboundMessage> {
    match transition {
        EventTransition::Started(event) => OutboundMessage::broadcast(
            channels,
            "🎊 Event Dimulai",
            &format!(
                "{}\nXP x{}\nSampai {} UTC\n\nAyo berburu!",
                event.theme,
                event.xp_multiplier,
                event.end_time.format("%H:%M")
            ),
            None,
        ),
        EventTransition::Ended(event) => OutboundMessage::broadcast(
            channels,
            "🏁 Event Selesai",
            &format!("{}\ntelah berakhir.\n\nSampai jumpa\ndi event berikutnya!", event.theme),
            None,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ScriptedRandom;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 1, 20, 0, 0).unwrap()
    }

    #[test]
    fn test_idle_server_may_start_event() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new().with_percents(&[1.0]).with_indices(&[2]);
        let transition = tick(&mut state, now(), &rng).unwrap();

        let EventTransition::Started(event) = transition else {
            panic!("expected start");
        };
        assert_eq!(event.theme, "🐉 Dragon Week");
        assert_eq!(event.end_time, now() + Duration::hours(1));
        assert_eq!(state.current_event(), Some(&event));
    }

    #[test]
    fn test_idle_server_usually_stays_idle() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new().with_percents(&[2.0]);
        assert_eq!(tick(&mut state, now(), &rng), None);
        assert!(state.active_event.is_none());
    }

    #[test]
    fn test_running_event_not_replaced() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new().with_percents(&[0.0]);
        tick(&mut state, now(), &rng).unwrap();
        let rng = ScriptedRandom::new().with_percents(&[0.0]);
        assert_eq!(tick(&mut state, now() + Duration::minutes(30), &rng), None);
    }

    #[test]
    fn test_past_end_time_closes_event_once() {
        let mut state = GlobalState::new(now());
        state.active_event = Some(ActiveEvent {
            is_active: true,
            theme: "🌕 Blood Moon".into(),
            start_time: now() - Duration::hours(2),
            end_time: now() - Duration::hours(1),
            xp_multiplier: 2.0,
        });
        // Still flagged active until a tick looks at it.
        assert!(state.current_event().is_some());

        let rng = ScriptedRandom::new().with_percents(&[0.0]);
        let transition = tick(&mut state, now(), &rng).unwrap();
        assert!(matches!(transition, EventTransition::Ended(_)));
        assert!(!state.active_event.as_ref().unwrap().is_active);

        let messages = announcement(&transition, &[-100]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].chat_id, -100);
        assert_eq!(messages[0].title, "🏁 Event Selesai");
    }

    #[test]
    fn test_announcement_goes_to_every_channel() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new().with_percents(&[0.5]);
        let transition = tick(&mut state, now(), &rng).unwrap();
        let messages = announcement(&transition, &[-1, -2]);
        assert_eq!(messages.iter().map(|m| m.chat_id).collect::<Vec<_>>(), vec![-1, -2]);
    }
}
