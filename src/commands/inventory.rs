use chrono::{DateTime, Utc};

use crate::catalog;
use crate::game::effects;
use crate::models::{ActiveEffect, PlayerRecord};
use crate::outbound::Keyboard;

use super::{Reply, Turn};

pub(super) fn handle_inventory(turn: &mut Turn<'_>, player: &mut PlayerRecord) -> Reply {
    let mut body = if player.inventory.is_empty() {
        "Tas kosong...".to_string()
    } else {
        player
            .inventory
            .iter()
            .enumerate()
            .map(|(idx, item)| format!("{}. {}", idx + 1, item))
            .collect::<Vec<_>>()
            .join("\n")
    };

    if !player.active_effects.is_empty() {
        body.push_str("\n\n✨ Aktif:");
        for effect in &player.active_effects {
            body.push_str(&format!("\n{}{}", effect.name, remaining(effect, turn.ctx.now)));
        }
    }

    Ok(vec![turn.reply("🎒 Bag", body, Keyboard::Inventory(usable_items(player)))])
}

/// Activate an owned item. Text that names no catalog item changes nothing
/// and shows the bag again.
pub(super) fn handle_use(turn: &mut Turn<'_>, player: &mut PlayerRecord, query: &str) -> Reply {
    let Some(item) = catalog::find_item(query) else {
        tracing::debug!("No catalog item matches '{}'", query);
        return handle_inventory(turn, player);
    };

    let effect = effects::activate(player, item.name, turn.ctx.now)?;

    Ok(vec![turn.reply(
        "✨ Item Aktif",
        format!("{}\nkini aktif!{}", effect.name, remaining(&effect, turn.ctx.now)),
        Keyboard::Inventory(usable_items(player)),
    )])
}

/// Distinct owned catalog items, in acquisition order.
fn usable_items(player: &PlayerRecord) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for item in &player.inventory {
        if catalog::item(item).is_some() && !names.contains(item) {
            names.push(item.clone());
        }
    }
    names
}

fn remaining(effect: &ActiveEffect, now: DateTime<Utc>) -> String {
    let mut parts = Vec::new();
    if let Some(at) = effect.expires_at {
        let minutes = (at - now).num_minutes().max(0);
        parts.push(format!("⏳ {}m", minutes));
    }
    if let Some(uses) = effect.remaining_uses {
        parts.push(format!("🔁 {}x", uses));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}
