use crate::catalog::{self, GACHA_PRICE, VIP_PRICE};
use crate::error::GameError;
use crate::game::progression::roll_gacha;
use crate::models::PlayerRecord;
use crate::outbound::Keyboard;

use super::{Reply, Turn};

pub(super) fn handle_shop(turn: &mut Turn<'_>, player: &mut PlayerRecord) -> Reply {
    Ok(vec![turn.reply(
        "🛒 MiMi Shop",
        format!("Coins: {}\n\nPilih item hebat\nuntuk memperkuat\ndirimu!", player.coins),
        Keyboard::Shop,
    )])
}

/// Buy the catalog item the text refers to. Text that names no item changes
/// nothing and just shows the shop again.
pub(super) fn handle_buy(turn: &mut Turn<'_>, player: &mut PlayerRecord, query: &str) -> Reply {
    let Some(item) = catalog::find_item(query) else {
        tracing::debug!("No catalog item matches '{}'", query);
        return handle_shop(turn, player);
    };

    turn.charge(player, item.price)?;
    player.inventory.push(item.name.to_string());

    Ok(vec![turn.reply(
        "✅ Success",
        format!(
            "Beli {}\n[{}] berhasil!\n\nSisa koin: {}",
            item.name,
            item.category.label(),
            player.coins
        ),
        Keyboard::Shop,
    )])
}

pub(super) fn handle_gacha(turn: &mut Turn<'_>, player: &mut PlayerRecord) -> Reply {
    turn.charge(player, GACHA_PRICE)?;
    let Some(item) = roll_gacha(turn.ctx.rng, None) else {
        return Ok(vec![turn.reply("🎰 Gacha", "Zonk!\nTidak dapat apa-apa.", Keyboard::Shop)]);
    };
    player.inventory.push(item.name.to_string());

    Ok(vec![turn.reply(
        "🎰 Gacha",
        format!("Dapat item:\n{}\n\nRarity: {}", item.name, item.rarity.label()),
        Keyboard::Shop,
    )])
}

pub(super) fn handle_vip(turn: &mut Turn<'_>, player: &mut PlayerRecord) -> Reply {
    if player.vip {
        return Err(GameError::AlreadyVip);
    }
    turn.charge(player, VIP_PRICE)?;
    player.vip = true;

    Ok(vec![turn.reply("🌟 VIP", "BERHASIL!\nBonus XP & Coins\nkini aktif.", Keyboard::Shop)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ScriptedRandom;
    use crate::commands::tests::{now, run, run_with, sender};
    use crate::models::GlobalState;

    #[test]
    fn test_buy_deducts_and_appends() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new();
        let out = run(&mut state, &rng, &sender("1"), "🧪 Power Elixir (2000)");
        assert_eq!(out[0].title, "❌ Gagal");
        assert_eq!(state.players["1"].coins, 1000);

        state.players.get_mut("1").unwrap().coins = 2500;
        let out = run(&mut state, &rng, &sender("1"), "/buy elixir");
        assert_eq!(out[0].title, "✅ Success");
        let p = &state.players["1"];
        assert_eq!(p.coins, 500);
        assert_eq!(p.inventory.last().map(String::as_str), Some("🧪 Power Elixir"));
    }

    #[test]
    fn test_buy_duplicates_allowed() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new();
        run(&mut state, &rng, &sender("1"), "/buy Rusty Dagger");
        let p = &state.players["1"];
        assert_eq!(p.inventory.iter().filter(|i| *i == "🦴 Rusty Dagger").count(), 2);
        assert_eq!(p.coins, 950);
    }

    #[test]
    fn test_unmatched_purchase_is_a_no_op() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new();
        run(&mut state, &rng, &sender("1"), "/start");
        let before = state.players["1"].clone();

        let out = run(&mut state, &rng, &sender("1"), "🗡️ Excalibur (99)");
        assert_eq!(out[0].title, "🛒 MiMi Shop");
        assert_eq!(state.players["1"], before);
    }

    #[test]
    fn test_privileged_buys_for_free() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new();
        let admin = vec!["1".to_string()];
        run_with(&mut state, &rng, &[], &admin, &sender("1"), "/buy Spear of Eternity");
        let p = &state.players["1"];
        assert_eq!(p.coins, 1000);
        assert!(p.inventory.contains(&"🔱 Spear of Eternity".to_string()));
    }

    #[test]
    fn test_gacha_costs_and_rewards() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new().with_percents(&[70.0]).with_indices(&[1]);
        let out = run(&mut state, &rng, &sender("1"), "🎰 Gacha (500)");
        assert!(out[0].body.contains("🧪 Power Elixir"));
        let p = &state.players["1"];
        assert_eq!(p.coins, 500);
        assert_eq!(p.inventory.len(), 3);
    }

    #[test]
    fn test_vip_once() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new();
        run(&mut state, &rng, &sender("1"), "/start");
        state.players.get_mut("1").unwrap().coins = 15_000;

        run(&mut state, &rng, &sender("1"), "🌟 VIP (10000)");
        assert!(state.players["1"].vip);
        assert_eq!(state.players["1"].coins, 5000);

        let out = run(&mut state, &rng, &sender("1"), "/vip");
        assert_eq!(out[0].body, GameError::AlreadyVip.to_string());
        assert_eq!(state.players["1"].coins, 5000);
    }
}
