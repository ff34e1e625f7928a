use crate::catalog::{self, Tier};
use crate::error::GameError;
use crate::game::effects::{consume_charges, derived_stats};
use crate::game::progression::{apply_level_ups, check_random_event};
use crate::models::PlayerRecord;
use crate::outbound::Keyboard;

use super::{Reply, Turn};

/// Health left after losing a fight.
pub const DEFEAT_HP: u64 = 10;

pub(super) fn handle_hunt_menu(turn: &mut Turn<'_>, player: &mut PlayerRecord) -> Reply {
    let mut body = format!("❤️ HP: {}\n\nPilih tingkat:\n", player.hp);
    for tier in catalog::TIERS {
        let lock = if player.level >= tier.min_level || turn.privileged { "" } else { " 🔒" };
        body.push_str(&format!("\n{} (Lv {}+){}", tier.label, tier.min_level, lock));
    }
    Ok(vec![turn.reply("⚔️ Hunt", body, Keyboard::Hunt)])
}

pub(super) fn handle_hunt(turn: &mut Turn<'_>, player: &mut PlayerRecord, tier: Tier) -> Reply {
    let def = catalog::tier(tier);
    if player.level < def.min_level && !turn.privileged {
        return Err(GameError::LevelTooLow { required: def.min_level });
    }

    let rng = turn.ctx.rng;
    let monster = &def.monsters[rng.index(def.monsters.len())];
    let stats = derived_stats(player);
    let critical = rng.percent() < f64::from(stats.crit);

    let mut taken = monster.damage.saturating_sub(stats.defense()).max(1);
    if critical {
        taken = (taken / 2).max(1);
    }

    let mut lines = Vec::new();
    let won = player.hp > taken;

    if !won {
        player.hp = DEFEAT_HP.min(stats.max_hp);
        lines.push(format!("Kalah vs {}\n(Lv {})", monster.name, monster.level));
        lines.push(format!("❤️ HP sisa: {}", player.hp));
        lines.push("Istirahat dulu\natau beli potion!".to_string());
    } else {
        player.hp -= taken;

        let mut xp = (player.xp_threshold() * def.xp_percent / 100).max(1);
        if let Some(event) = turn.state.current_event() {
            xp = (xp as f64 * event.xp_multiplier).floor() as u64;
        }
        let mut coins = def.coin_base + rng.range(0, def.coin_bonus_max);
        if player.vip {
            xp = (xp as f64 * catalog::VIP_XP_BONUS).floor() as u64;
            coins = (coins as f64 * catalog::VIP_COIN_BONUS).floor() as u64;
        }
        player.xp += xp;
        player.coins += coins;

        let mut header = format!("WIN vs {}\n(Lv {}, ❤️ {})", monster.name, monster.level, monster.hp);
        if critical {
            header.push_str("\n💥 CRITICAL!");
        }
        lines.push(header);
        lines.push(format!("💰 +{} Coins\n✨ +{} XP\n❤️ HP: {}", coins, xp, player.hp));
    }

    let charges = consume_charges(player);
    if charges.healed > 0 {
        lines.push(format!("🩹 +{} HP", charges.healed));
    }
    for item in &charges.exhausted {
        lines.push(format!("⌛ {} habis!", item));
    }

    if won {
        let gained = apply_level_ups(player);
        if gained > 0 {
            lines.push(format!("🆙 LEVEL UP! Lv {}\n🛡️ Rank: {}", player.level, player.rank));
        }
        if let Some(event) = check_random_event(player, rng) {
            lines.push(format!("⚠️ EVENT!\n{}", event.message()));
        }
    }

    let title = if won { "⚔️ Battle" } else { "💀 Defeat" };
    Ok(vec![turn.reply(title, lines.join("\n\n"), Keyboard::Hunt)])
}
