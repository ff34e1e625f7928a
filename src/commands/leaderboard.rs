use std::cmp::Reverse;

use crate::models::PlayerRecord;
use crate::outbound::Keyboard;

use super::{Reply, Turn};

pub const LEADERBOARD_SIZE: usize = 5;

/// Top players by level. Ties go to the earlier registration, then the lower id,
/// so the order does not depend on map iteration.
pub(super) fn handle_leaderboard(turn: &mut Turn<'_>, player: &mut PlayerRecord) -> Reply {
    let top = top_players(turn.state.players.values().chain(std::iter::once(&*player)), LEADERBOARD_SIZE);

    let list = top
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {} (Lvl {})", i + 1, p.username, p.level))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(vec![turn.reply(
        &format!("🏆 Top {}", LEADERBOARD_SIZE),
        if list.is_empty() { "Kosong".to_string() } else { list },
        Keyboard::Main,
    )])
}

pub(crate) fn top_players<'a>(players: impl Iterator<Item = &'a PlayerRecord>, n: usize) -> Vec<&'a PlayerRecord> {
    let mut all: Vec<&PlayerRecord> = players.collect();
    all.sort_by_key(|p| (Reverse(p.level), p.register_date, p.id.clone()));
    all.truncate(n);
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ScriptedRandom;
    use crate::commands::tests::{now, run, sender};
    use crate::models::GlobalState;

    #[test]
    fn test_top_players_order_and_ties() {
        let mut a = PlayerRecord::new("a".into(), "A".into(), now());
        let mut b = PlayerRecord::new("b".into(), "B".into(), now() - chrono::Duration::days(1));
        let mut c = PlayerRecord::new("c".into(), "C".into(), now());
        a.level = 5;
        b.level = 5;
        c.level = 9;

        let players = [a, b, c];
        let top: Vec<&str> = top_players(players.iter(), 5).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(top, vec!["c", "b", "a"]);
        assert_eq!(top_players(players.iter(), 1).len(), 1);
    }

    #[test]
    fn test_leaderboard_includes_sender() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new();
        run(&mut state, &rng, &sender("1"), "/start");
        state.players.get_mut("1").unwrap().level = 3;

        let out = run(&mut state, &rng, &sender("2"), "🏆 Leaderboard");
        assert_eq!(out[0].title, "🏆 Top 5");
        assert_eq!(out[0].body, "1. Player1 (Lvl 3)\n2. Player2 (Lvl 1)");
    }
}
