#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    pub fn label(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCategory {
    Weapon,
    Armor,
    Accessory,
    Potion,
}

impl ItemCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ItemCategory::Weapon => "Weapon",
            ItemCategory::Armor => "Armor",
            ItemCategory::Accessory => "Accessory",
            ItemCategory::Potion => "Potion",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Item {
    pub name: &'static str,
    pub category: ItemCategory,
    pub damage: u64,
    pub crit: u32,
    pub hp: u64,
    /// Restored on every hunt while the item is active.
    pub heal: u64,
    pub price: u64,
    pub rarity: Rarity,
    /// 0.0 = no time limit
    pub duration_hours: f64,
    /// 0 = no use limit
    pub max_uses: u32,
}

impl Item {
    pub fn new(name: &'static str, category: ItemCategory, price: u64, rarity: Rarity) -> Self {
        Self {
            name,
            category,
            damage: 0,
            crit: 0,
            hp: 0,
            heal: 0,
            price,
            rarity,
            duration_hours: 0.0,
            max_uses: 0,
        }
    }

    pub fn damage(mut self, damage: u64) -> Self {
        self.damage = damage;
        self
    }

    pub fn crit(mut self, crit: u32) -> Self {
        self.crit = crit;
        self
    }

    pub fn hp(mut self, hp: u64) -> Self {
        self.hp = hp;
        self
    }

    pub fn heal(mut self, heal: u64) -> Self {
        self.heal = heal;
        self
    }

    pub fn hours(mut self, hours: f64) -> Self {
        self.duration_hours = hours;
        self
    }

    pub fn uses(mut self, uses: u32) -> Self {
        self.max_uses = uses;
        self
    }

    /// Shop button label, e.g. "🧪 Power Elixir (2000)"
    pub fn shop_label(&self) -> String {
        format!("{} ({})", self.name, self.price)
    }
}

#[derive(Debug, Clone)]
pub struct Monster {
    pub name: &'static str,
    pub level: u32,
    pub hp: u64,
    pub damage: u64,
}

#[derive(Debug, Clone)]
pub struct Pet {
    pub name: &'static str,
    pub damage: u64,
    pub next_form: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct Rank {
    pub name: &'static str,
    pub min_level: u32,
}

#[derive(Debug, Clone)]
pub struct GuildDef {
    pub name: &'static str,
    pub price: u64,
    pub rewards: &'static [&'static str],
    /// Forum topic in the broadcast chats that gets its own welcome message.
    pub topic_id: Option<i64>,
}

impl GuildDef {
    pub fn join_label(&self) -> String {
        format!("🛡️ Join {} ({})", self.name, self.price)
    }
}

/// Hunt difficulty, each backed by a monster bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Easy,
    Normal,
    Hard,
    Boss,
}

#[derive(Debug, Clone)]
pub struct TierDef {
    pub tier: Tier,
    pub label: &'static str,
    pub min_level: u32,
    /// Share of the current level-up threshold awarded as XP.
    pub xp_percent: u64,
    pub coin_base: u64,
    pub coin_bonus_max: u64,
    pub monsters: &'static [Monster],
}

#[derive(Debug, Clone)]
pub struct EventTheme {
    pub theme: &'static str,
    pub xp_multiplier: f64,
}
