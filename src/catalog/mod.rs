//! Static game content: items, monsters, ranks, guilds, gacha weights and event themes.

mod types;

pub use types::{EventTheme, GuildDef, Item, ItemCategory, Monster, Pet, Rank, Rarity, Tier, TierDef};

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub static ITEMS: Lazy<Vec<Item>> = Lazy::new(|| {
    use ItemCategory::*;
    use Rarity::*;
    vec![
        Item::new("🔱 Spear of Eternity", Weapon, 100_000, Mythic).damage(1500).crit(100).hours(5.0),
        Item::new("🐉 Emperor Plate", Armor, 75_000, Legendary).hp(5000).hours(4.0),
        Item::new("⚡ Void Dagger", Weapon, 50_000, Legendary).damage(800).crit(50).hours(3.0),
        Item::new("🔥 Phoenix Amulet", Accessory, 25_000, Epic).hp(1500).hours(2.0),
        Item::new("❄️ Frost Shield", Armor, 10_000, Epic).hp(800).hours(1.0),
        Item::new("🩸 Warrior Band", Accessory, 5000, Rare).damage(100).hours(0.5),
        Item::new("🧪 Power Elixir", Potion, 2000, Rare).damage(50).uses(20),
        Item::new("🪵 Wood Staff", Weapon, 500, Common).damage(30).uses(50),
        Item::new("🩹 Small Bandage", Potion, 200, Common).heal(20).uses(5),
        Item::new("🦴 Rusty Dagger", Weapon, 50, Common).damage(15).crit(5).uses(1),
    ]
});

static ITEM_INDEX: Lazy<HashMap<&'static str, &'static Item>> =
    Lazy::new(|| ITEMS.iter().map(|item| (item.name, item)).collect());

static MONSTERS_LOW: &[Monster] = &[
    Monster { name: "🌑 Shadow Stalker", level: 5, hp: 80, damage: 8 },
    Monster { name: "🦴 Bone Gnawer", level: 10, hp: 150, damage: 15 },
];

static MONSTERS_MID: &[Monster] = &[
    Monster { name: "🔥 Blazing Efreet", level: 30, hp: 1200, damage: 120 },
    Monster { name: "❄️ Frost Gargoyle", level: 45, hp: 3000, damage: 300 },
];

static MONSTERS_HIGH: &[Monster] = &[
    Monster { name: "🌌 Abyss Walker", level: 80, hp: 18_000, damage: 1800 },
    Monster { name: "🐉 Star Dragon", level: 250, hp: 300_000, damage: 25_000 },
];

static MONSTERS_BOSS: &[Monster] = &[
    Monster { name: "👑 MiMi, Chaos Goddess", level: 500, hp: 5_000_000, damage: 150_000 },
];

pub static TIERS: &[TierDef] = &[
    TierDef {
        tier: Tier::Easy,
        label: "🟢 Easy Hunt",
        min_level: 1,
        xp_percent: 10,
        coin_base: 50,
        coin_bonus_max: 50,
        monsters: MONSTERS_LOW,
    },
    TierDef {
        tier: Tier::Normal,
        label: "🟡 Normal Hunt",
        min_level: 10,
        xp_percent: 25,
        coin_base: 200,
        coin_bonus_max: 200,
        monsters: MONSTERS_MID,
    },
    TierDef {
        tier: Tier::Hard,
        label: "🔴 Hard Hunt",
        min_level: 30,
        xp_percent: 50,
        coin_base: 1000,
        coin_bonus_max: 1000,
        monsters: MONSTERS_HIGH,
    },
    TierDef {
        tier: Tier::Boss,
        label: "💀 Boss Hunt",
        min_level: 100,
        xp_percent: 100,
        coin_base: 10_000,
        coin_bonus_max: 10_000,
        monsters: MONSTERS_BOSS,
    },
];

pub static PETS: &[Pet] = &[
    Pet { name: "🐰 Forest Bunny", damage: 5, next_form: Some("🐇 Moon Rabbit") },
    Pet { name: "🐇 Moon Rabbit", damage: 25, next_form: None },
];

/// Ordered by ascending minimum level.
pub static RANKS: &[Rank] = &[
    Rank { name: "Bronze", min_level: 1 },
    Rank { name: "Silver", min_level: 20 },
    Rank { name: "Gold", min_level: 50 },
    Rank { name: "Platinum", min_level: 100 },
    Rank { name: "Diamond", min_level: 250 },
    Rank { name: "Mythic", min_level: 500 },
    Rank { name: "Legend", min_level: 1000 },
    Rank { name: "Immortal", min_level: 5000 },
];

pub static GUILDS: &[GuildDef] = &[
    GuildDef {
        name: "🐉 DragonSlayers",
        price: 7000,
        rewards: &["🩸 Warrior Band", "🧪 Power Elixir"],
        topic_id: Some(2),
    },
    GuildDef {
        name: "🌙 Moon Covenant",
        price: 5000,
        rewards: &["🩹 Small Bandage", "🧪 Power Elixir"],
        topic_id: None,
    },
    GuildDef {
        name: "👑 Royal Order",
        price: 20_000,
        rewards: &["🔥 Phoenix Amulet"],
        topic_id: Some(3),
    },
];

/// Cumulative gacha weights, evaluated in this order. Sums to 100.
pub static GACHA_RATES: &[(Rarity, f64)] = &[
    (Rarity::Common, 60.0),
    (Rarity::Rare, 25.0),
    (Rarity::Epic, 10.0),
    (Rarity::Legendary, 4.0),
    (Rarity::Mythic, 1.0),
];

pub static EVENT_THEMES: &[EventTheme] = &[
    EventTheme { theme: "🌕 Blood Moon", xp_multiplier: 2.0 },
    EventTheme { theme: "🌸 Spring Festival", xp_multiplier: 1.5 },
    EventTheme { theme: "🐉 Dragon Week", xp_multiplier: 3.0 },
];

pub const GACHA_PRICE: u64 = 500;
pub const VIP_PRICE: u64 = 10_000;
pub const VIP_XP_BONUS: f64 = 1.3;
pub const VIP_COIN_BONUS: f64 = 1.5;

pub fn item(name: &str) -> Option<&'static Item> {
    ITEM_INDEX.get(name).copied()
}

pub fn pet(name: &str) -> Option<&'static Pet> {
    PETS.iter().find(|p| p.name == name)
}

pub fn tier(tier: Tier) -> &'static TierDef {
    TIERS
        .iter()
        .find(|t| t.tier == tier)
        .unwrap_or(&TIERS[0])
}

pub fn items_of_rarity(rarity: Rarity) -> Vec<&'static Item> {
    ITEMS.iter().filter(|i| i.rarity == rarity).collect()
}

/// Highest rank whose minimum level has been reached.
pub fn rank_for_level(level: u32) -> &'static str {
    RANKS
        .iter()
        .filter(|r| r.min_level <= level)
        .max_by_key(|r| r.min_level)
        .map(|r| r.name)
        .unwrap_or(RANKS[0].name)
}

/// Free-text lookup against the item catalog.
///
/// Tries an exact name, then a name embedded in the text (button labels carry
/// a price suffix), then a case-insensitive substring of a name. No match is
/// not an error; callers treat it as a no-op.
pub fn find_item(query: &str) -> Option<&'static Item> {
    find_by_name(ITEMS.iter(), query, |i| i.name)
}

/// Same matching rules as [`find_item`], over the guild list.
pub fn find_guild(query: &str) -> Option<&'static GuildDef> {
    find_by_name(GUILDS.iter(), query, |g| g.name)
}

fn find_by_name<T>(
    entries: impl Iterator<Item = &'static T> + Clone,
    query: &str,
    name: impl Fn(&T) -> &'static str,
) -> Option<&'static T> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    if let Some(hit) = entries.clone().find(|e| name(e) == query) {
        return Some(hit);
    }
    if let Some(hit) = entries.clone().find(|e| query.contains(name(e))) {
        return Some(hit);
    }
    let needle = query.to_lowercase();
    entries.into_iter().find(|e| name(e).to_lowercase().contains(&needle))
}
