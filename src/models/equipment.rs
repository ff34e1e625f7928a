/// Legacy equipment slot. Current records express equipment purely through active
/// effects, but older snapshots may still carry slot references and those still count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
}

impl EquipmentSlot {
    /// Label shown on the profile
    pub fn display_label(&self) -> &str {
        match self {
            EquipmentSlot::Weapon => "🗡️ Weapon",
            EquipmentSlot::Armor => "🛡️ Armor",
            EquipmentSlot::Accessory => "💍 Acc",
        }
    }

    pub fn all_slots_in_order() -> [EquipmentSlot; 3] {
        [EquipmentSlot::Weapon, EquipmentSlot::Armor, EquipmentSlot::Accessory]
    }
}
