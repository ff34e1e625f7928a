pub mod player;
pub mod state;
pub mod equipment;

pub use player::{ActiveEffect, PlayerRecord};
pub use state::{ActiveEvent, GlobalState, GuildData};
pub use equipment::EquipmentSlot;
