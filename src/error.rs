use thiserror::Error;

/// Failures talking to the outside world: Telegram, the cloud store, the local disk.
///
/// None of these are fatal to the engine. Callers log them and try again on the next tick.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote answered, but said no (`ok: false` or a non-success status).
    #[error("api error: {0}")]
    Api(String),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A command was understood but the player is not allowed to do it right now.
///
/// The interpreter reports these back to the player and leaves state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Coins kurang!\nButuh: {price}\nPunya: {balance}")]
    InsufficientCoins { price: u64, balance: u64 },

    #[error("Level terlalu rendah!\nMinimal level: {required}")]
    LevelTooLow { required: u32 },

    #[error("Item tidak ada\ndi tas: {0}")]
    ItemNotOwned(String),

    #[error("Kamu sudah di guild\n{0}")]
    AlreadyInGuild(String),

    #[error("Kamu belum\nmasuk guild")]
    NotInGuild,

    #[error("Kamu sudah VIP")]
    AlreadyVip,
}
