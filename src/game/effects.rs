//! Active effects: derived stats, activation, per-hunt charges and the expiry sweep.

use chrono::{DateTime, Duration, Utc};

use crate::catalog;
use crate::error::GameError;
use crate::models::{ActiveEffect, EquipmentSlot, GlobalState, PlayerRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedStats {
    pub damage: u64,
    pub crit: u32,
    pub max_hp: u64,
    /// Extra max hp granted by gear, on top of the base maximum.
    pub bonus_hp: u64,
}

impl DerivedStats {
    pub fn defense(&self) -> u64 {
        self.bonus_hp / 10
    }
}

/// Base stats plus everything currently in effect. Exhausted effects do not count.
pub fn derived_stats(player: &PlayerRecord) -> DerivedStats {
    let mut damage = player.base_damage;
    let mut crit = player.base_crit;
    let mut bonus_hp = 0;

    for effect in player.active_effects.iter().filter(|e| !e.is_exhausted()) {
        if let Some(item) = catalog::item(&effect.name) {
            damage += item.damage;
            crit += item.crit;
            bonus_hp += item.hp;
        }
    }

    for slot in EquipmentSlot::all_slots_in_order() {
        let Some(item) = player.equipped(&slot).and_then(catalog::item) else {
            continue;
        };
        match slot {
            EquipmentSlot::Weapon => {
                damage += item.damage;
                crit += item.crit;
            }
            EquipmentSlot::Armor => bonus_hp += item.hp,
            EquipmentSlot::Accessory => {
                damage += item.damage;
                bonus_hp += item.hp;
            }
        }
    }

    if let Some(pet) = player.active_pet.as_deref().and_then(catalog::pet) {
        damage += pet.damage;
    }

    DerivedStats {
        damage,
        crit: crit.min(100),
        max_hp: player.max_hp + bonus_hp,
        bonus_hp,
    }
}

pub fn clamp_health(player: &mut PlayerRecord) {
    let max = derived_stats(player).max_hp;
    if player.hp > max {
        player.hp = max;
    }
}

/// Move one owned instance of `name` from the bag into active effects.
///
/// Duration and use count are copied from the catalog entry; both may be set.
pub fn activate(player: &mut PlayerRecord, name: &str, now: DateTime<Utc>) -> Result<ActiveEffect, GameError> {
    let item = catalog::item(name).ok_or_else(|| GameError::ItemNotOwned(name.to_string()))?;
    if !player.take_item(item.name) {
        return Err(GameError::ItemNotOwned(item.name.to_string()));
    }

    let expires_at = (item.duration_hours > 0.0)
        .then(|| now + Duration::seconds((item.duration_hours * 3600.0).round() as i64));
    let remaining_uses = (item.max_uses > 0).then_some(item.max_uses);

    let effect = ActiveEffect {
        name: item.name.to_string(),
        expires_at,
        remaining_uses,
    };
    player.active_effects.push(effect.clone());
    Ok(effect)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChargeOutcome {
    pub healed: u64,
    /// Effects that just ran out of uses, in activation order.
    pub exhausted: Vec<String>,
}

/// Spend one charge of every use-limited effect (one hunt's worth).
///
/// Heal effects restore health as their charge is spent. Exhausted effects are removed.
pub fn consume_charges(player: &mut PlayerRecord) -> ChargeOutcome {
    let mut outcome = ChargeOutcome::default();
    let mut heal = 0;

    for effect in player.active_effects.iter_mut() {
        let Some(uses) = effect.remaining_uses.as_mut() else {
            continue;
        };
        if *uses == 0 {
            continue;
        }
        *uses -= 1;
        if let Some(item) = catalog::item(&effect.name) {
            heal += item.heal;
        }
        if *uses == 0 {
            outcome.exhausted.push(effect.name.clone());
        }
    }

    player.active_effects.retain(|e| !e.is_exhausted());

    let max = derived_stats(player).max_hp;
    let before = player.hp;
    player.hp = (player.hp + heal).min(max);
    outcome.healed = player.hp.saturating_sub(before);
    clamp_health(player);
    outcome
}

/// One expired effect, for the owner's notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expired {
    pub player_id: String,
    pub item: String,
}

/// Drop every effect whose time is up, across all players.
///
/// Effects that are out of uses are also purged here so derived stats never see
/// them, but only timed expiries are reported; use-limited effects announce
/// themselves during the hunt.
pub fn sweep_expired(state: &mut GlobalState, now: DateTime<Utc>) -> Vec<Expired> {
    let mut expired = Vec::new();

    for player in state.players.values_mut() {
        let before = player.active_effects.len();
        let mut gone = Vec::new();
        player.active_effects.retain(|effect| {
            if effect.is_expired(now) {
                gone.push(effect.name.clone());
                false
            } else {
                !effect.is_exhausted()
            }
        });

        if player.active_effects.len() != before {
            clamp_health(player);
        }
        expired.extend(gone.into_iter().map(|item| Expired {
            player_id: player.id.clone(),
            item,
        }));
    }

    expired
}
