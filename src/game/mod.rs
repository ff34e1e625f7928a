pub mod effects;
pub mod events;
pub mod progression;
