use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::equipment::EquipmentSlot;

pub const STARTING_COINS: u64 = 1000;
pub const STARTING_HP: u64 = 100;
pub const STARTING_DAMAGE: u64 = 10;
pub const STARTING_CRIT: u32 = 5;
pub const STARTING_INVENTORY: &[&str] = &["🦴 Rusty Dagger", "🩹 Small Bandage"];
pub const STARTING_PET: &str = "🐰 Forest Bunny";

/// Cosmetic class tag shown on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlayerClass {
    #[default]
    Warrior,
    Mage,
    Assassin,
    None,
}

impl PlayerClass {
    pub fn label(&self) -> &'static str {
        match self {
            PlayerClass::Warrior => "Warrior",
            PlayerClass::Mage => "Mage",
            PlayerClass::Assassin => "Assassin",
            PlayerClass::None => "None",
        }
    }
}

/// An item that has been taken out of the bag and is currently in effect.
///
/// `expires_at` and `remaining_uses` may both be set; the effect ends on whichever runs out first.
/// With neither set the effect is permanent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveEffect {
    pub name: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub remaining_uses: Option<u32>,
}

impl ActiveEffect {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_uses == Some(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub player_class: PlayerClass,
    pub level: u32,
    pub xp: u64,
    pub coins: u64,
    pub hp: u64,
    pub max_hp: u64,
    pub base_damage: u64,
    pub base_crit: u32,
    #[serde(default)]
    pub inventory: Vec<String>,
    #[serde(default, rename = "activeItems")]
    pub active_effects: Vec<ActiveEffect>,
    #[serde(default)]
    pub equipped_weapon: Option<String>,
    #[serde(default)]
    pub equipped_armor: Option<String>,
    #[serde(default)]
    pub equipped_accessory: Option<String>,
    #[serde(default)]
    pub pets: Vec<String>,
    #[serde(default)]
    pub active_pet: Option<String>,
    #[serde(default)]
    pub guild: String,
    pub rank: String,
    #[serde(default)]
    pub vip: bool,
    pub register_date: DateTime<Utc>,
}

impl PlayerRecord {
    pub fn new(id: String, username: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            username,
            player_class: PlayerClass::Warrior,
            level: 1,
            xp: 0,
            coins: STARTING_COINS,
            hp: STARTING_HP,
            max_hp: STARTING_HP,
            base_damage: STARTING_DAMAGE,
            base_crit: STARTING_CRIT,
            inventory: STARTING_INVENTORY.iter().map(|s| s.to_string()).collect(),
            active_effects: Vec::new(),
            equipped_weapon: None,
            equipped_armor: None,
            equipped_accessory: None,
            pets: vec![STARTING_PET.to_string()],
            active_pet: Some(STARTING_PET.to_string()),
            guild: String::new(),
            rank: "Bronze".to_string(),
            vip: false,
            register_date: now,
        }
    }

    /// XP needed to leave the current level.
    pub fn xp_threshold(&self) -> u64 {
        u64::from(self.level) * 100
    }

    pub fn in_guild(&self) -> bool {
        !self.guild.is_empty()
    }

    /// Remove one instance of `item` from the bag. Returns false if none is owned.
    pub fn take_item(&mut self, item: &str) -> bool {
        match self.inventory.iter().position(|i| i == item) {
            Some(idx) => {
                self.inventory.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Deduct coins, clamping at zero.
    pub fn spend(&mut self, amount: u64) {
        self.coins = self.coins.saturating_sub(amount);
    }

    pub fn equipped(&self, slot: &EquipmentSlot) -> Option<&str> {
        match slot {
            EquipmentSlot::Weapon => self.equipped_weapon.as_deref(),
            EquipmentSlot::Armor => self.equipped_armor.as_deref(),
            EquipmentSlot::Accessory => self.equipped_accessory.as_deref(),
        }
    }
}
