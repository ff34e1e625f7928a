//! Levels, ranks, the post-hunt random event roll and gacha.

use crate::catalog::{self, Item, Rarity};
use crate::clock::RandomSource;
use crate::models::PlayerRecord;

use super::effects::derived_stats;

pub const HP_PER_LEVEL: u64 = 20;
pub const DAMAGE_PER_LEVEL: u64 = 5;

/// Convert banked XP into levels. Returns how many levels were gained.
///
/// The threshold is `level * 100` at the moment of each check, so one large reward
/// can cross several levels. Afterwards `xp < level * 100` always holds.
pub fn apply_level_ups(player: &mut PlayerRecord) -> u32 {
    let mut gained = 0;
    while player.xp >= player.xp_threshold() {
        player.xp -= player.xp_threshold();
        player.level += 1;
        player.max_hp += HP_PER_LEVEL;
        player.base_damage += DAMAGE_PER_LEVEL;
        gained += 1;
    }
    if gained > 0 {
        player.hp = derived_stats(player).max_hp;
        player.rank = catalog::rank_for_level(player.level).to_string();
    }
    gained
}

/// Outcome of the post-hunt random event roll.
#[derive(Debug, Clone, PartialEq)]
pub enum RandomEvent {
    BonusLevels { from: u32, to: u32 },
    CoinPenalty { percent: u64, remaining: u64 },
    PetEvolved { from: String, to: String },
    BonusLoot(String),
    SuperGacha(String),
}

impl RandomEvent {
    pub fn message(&self) -> String {
        match self {
            RandomEvent::BonusLevels { from, to } => {
                format!("🎉 Bonus level x{}!\nLV {} → {}", to - from, from, to)
            }
            RandomEvent::CoinPenalty { percent, remaining } => {
                format!("💸 Malang! Koin -{}%\nSisa: {} coins", percent, remaining)
            }
            RandomEvent::PetEvolved { from, to } => format!("🔥 Pet Evolusi!\n{} → {}", from, to),
            RandomEvent::BonusLoot(item) => format!("🎁 Kejutan Loot!\n{}", item),
            RandomEvent::SuperGacha(item) => format!("🌟 Gacha Super!\n{}", item),
        }
    }
}

/// Roll once and fire the first band that matches.
///
/// Bands are cumulative ranges over a single percentage roll, so their order matters:
/// `[0,5)` bonus levels, `[5,12)` coin penalty, `[12,15)` pet evolution,
/// `[15,25)` rare loot, `[25,27)` legendary gacha. A band whose effect cannot apply
/// (a pet with no next form) fires nothing.
pub fn check_random_event(player: &mut PlayerRecord, rng: &dyn RandomSource) -> Option<RandomEvent> {
    let roll = rng.percent();

    if roll < 5.0 {
        let bonus = rng.range(1, 3) as u32;
        let from = player.level;
        player.level += bonus;
        player.max_hp += HP_PER_LEVEL * u64::from(bonus);
        player.base_damage += DAMAGE_PER_LEVEL * u64::from(bonus);
        player.hp = derived_stats(player).max_hp;
        player.rank = catalog::rank_for_level(player.level).to_string();
        Some(RandomEvent::BonusLevels { from, to: player.level })
    } else if roll < 12.0 {
        let percent = rng.range(10, 79);
        let penalty = player.coins * percent / 100;
        player.spend(penalty);
        Some(RandomEvent::CoinPenalty { percent, remaining: player.coins })
    } else if roll < 15.0 {
        let current = player.active_pet.clone()?;
        let next = catalog::pet(&current)?.next_form?;
        for owned in player.pets.iter_mut().filter(|p| **p == current) {
            *owned = next.to_string();
        }
        player.active_pet = Some(next.to_string());
        Some(RandomEvent::PetEvolved { from: current, to: next.to_string() })
    } else if roll < 25.0 {
        let item = roll_gacha(rng, Some(Rarity::Rare))?;
        player.inventory.push(item.name.to_string());
        Some(RandomEvent::BonusLoot(item.name.to_string()))
    } else if roll < 27.0 {
        let item = roll_gacha(rng, Some(Rarity::Legendary))?;
        player.inventory.push(item.name.to_string());
        Some(RandomEvent::SuperGacha(item.name.to_string()))
    } else {
        None
    }
}

/// Pick an item, either of the given rarity or of a rarity drawn from the gacha weights.
pub fn roll_gacha(rng: &dyn RandomSource, rarity: Option<Rarity>) -> Option<&'static Item> {
    let rarity = match rarity {
        Some(r) => r,
        None => {
            let roll = rng.percent();
            let mut cumulative = 0.0;
            catalog::GACHA_RATES
                .iter()
                .find(|(_, weight)| {
                    cumulative += weight;
                    roll < cumulative
                })
                .map(|(r, _)| *r)
                .unwrap_or(Rarity::Common)
        }
    };

    let pool = catalog::items_of_rarity(rarity);
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.index(pool.len())])
}
