use crate::game::effects::derived_stats;
use crate::models::{EquipmentSlot, PlayerRecord};
use crate::outbound::Keyboard;

use super::{Reply, Turn};

pub(super) fn handle_profile(turn: &mut Turn<'_>, player: &mut PlayerRecord) -> Reply {
    let stats = derived_stats(player);
    let guild = if player.in_guild() { player.guild.as_str() } else { "-" };

    let mut content = format!(
        "👤 User : {}\n🎭 Class: {}\n🌟 Lvl  : {}\n✨ XP   : {}/{}\n💰 Coin : {}\n❤️ HP   : {}/{}\n⚔️ Dmg  : {}\n💥 Crit : {}%\n\n🛡️ Rank : {}\n🏰 Guild: {}\n🌟 VIP  : {}",
        player.username,
        player.player_class.label(),
        player.level,
        player.xp,
        player.xp_threshold(),
        player.coins,
        player.hp,
        stats.max_hp,
        stats.damage,
        stats.crit,
        player.rank,
        guild,
        if player.vip { "Active" } else { "No" },
    );

    if let Some(pet) = &player.active_pet {
        content.push_str(&format!("\n🐾 Pet  : {}", pet));
    }
    for slot in EquipmentSlot::all_slots_in_order() {
        if let Some(item) = player.equipped(&slot) {
            content.push_str(&format!("\n{}: {}", slot.display_label(), item));
        }
    }
    if !player.active_effects.is_empty() {
        content.push_str(&format!("\n✨ Aktif: {} item", player.active_effects.len()));
    }

    Ok(vec![turn.reply("📜 Profile", content, Keyboard::Main)])
}

#[cfg(test)]
mod tests {
    use crate::clock::ScriptedRandom;
    use crate::commands::tests::{now, run, sender};
    use crate::models::{GlobalState, PlayerRecord};

    #[test]
    fn test_profile_shows_derived_stats_pet_and_slots() {
        let mut state = GlobalState::new(now());
        let mut p = PlayerRecord::new("7".into(), "Player7".into(), now());
        p.equipped_weapon = Some("🪵 Wood Staff".into());
        p.equipped_armor = Some("❄️ Frost Shield".into());
        state.players.insert("7".into(), p);

        let out = run(&mut state, &ScriptedRandom::new(), &sender("7"), "👤 Profile");

        assert_eq!(out.len(), 1);
        let body = &out[0].body;
        // 100 base + 800 from the shield
        assert!(body.contains("❤️ HP   : 100/900"), "{}", body);
        // 10 base + 30 staff + 5 bunny
        assert!(body.contains("⚔️ Dmg  : 45"), "{}", body);
        assert!(body.contains("🐾 Pet  : 🐰 Forest Bunny"));
        assert!(body.contains("🗡️ Weapon: 🪵 Wood Staff"));
        assert!(body.contains("🛡️ Armor: ❄️ Frost Shield"));
        assert!(!body.contains("💍 Acc"));
    }

    #[test]
    fn test_profile_without_pet_or_gear() {
        let mut state = GlobalState::new(now());
        let mut p = PlayerRecord::new("8".into(), "Player8".into(), now());
        p.active_pet = None;
        state.players.insert("8".into(), p);

        let out = run(&mut state, &ScriptedRandom::new(), &sender("8"), "/profile");

        let body = &out[0].body;
        assert!(body.contains("❤️ HP   : 100/100"));
        assert!(!body.contains("🐾 Pet"));
        assert!(!body.contains("🗡️ Weapon"));
        assert!(body.contains("🏰 Guild: -"));
    }
}
