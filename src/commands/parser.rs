use crate::catalog::{self, Tier};

/// Everything a player can ask for. Produced by [`parse`], consumed by exhaustive dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Profile,
    HuntMenu,
    Hunt(Tier),
    Inventory,
    Use(String),
    Shop,
    Buy(String),
    Gacha,
    Vip,
    GuildMenu,
    JoinGuild(String),
    LeaveGuild,
    Leaderboard,
    Event,
    Help,
    Unknown(String),
}

pub const LABEL_PROFILE: &str = "👤 Profile";
pub const LABEL_HUNT: &str = "⚔️ Hunt";
pub const LABEL_INVENTORY: &str = "🎒 Inventory";
pub const LABEL_SHOP: &str = "🛒 Shop";
pub const LABEL_GUILD: &str = "🏰 Guild";
pub const LABEL_LEADERBOARD: &str = "🏆 Leaderboard";
pub const LABEL_EVENT: &str = "🎊 Event";
pub const LABEL_HELP: &str = "❓ Help";
pub const LABEL_BACK: &str = "🔙 Back";
pub const LABEL_LEAVE_GUILD: &str = "🚪 Leave Guild";
pub const LABEL_GACHA: &str = "🎰 Gacha";
pub const LABEL_VIP: &str = "🌟 VIP";
pub const PREFIX_USE: &str = "✨ Use ";
pub const PREFIX_JOIN: &str = "🛡️ Join ";

/// Turn raw message text into a [`Command`].
///
/// Keyboard labels are matched exactly (case-sensitive, emoji included). Slash
/// commands are matched case-insensitively and may carry a `@botname` suffix.
/// Free text that looks like a shop button ("name (price)") becomes a purchase
/// attempt; anything else is unknown.
pub fn parse(raw: &str) -> Command {
    let text = raw.trim();

    match text {
        LABEL_PROFILE => return Command::Profile,
        LABEL_HUNT => return Command::HuntMenu,
        LABEL_INVENTORY => return Command::Inventory,
        LABEL_SHOP => return Command::Shop,
        LABEL_GUILD => return Command::GuildMenu,
        LABEL_LEADERBOARD => return Command::Leaderboard,
        LABEL_EVENT => return Command::Event,
        LABEL_HELP => return Command::Help,
        LABEL_BACK => return Command::Start,
        LABEL_LEAVE_GUILD => return Command::LeaveGuild,
        _ => {}
    }

    if let Some(tier) = catalog::TIERS.iter().find(|t| t.label == text) {
        return Command::Hunt(tier.tier);
    }

    if text.starts_with('/') {
        return parse_slash(text);
    }

    if let Some(rest) = text.strip_prefix(PREFIX_USE) {
        return Command::Use(rest.trim().to_string());
    }
    if let Some(rest) = text.strip_prefix(PREFIX_JOIN) {
        return Command::JoinGuild(rest.trim().to_string());
    }
    if text.starts_with(LABEL_GACHA) {
        return Command::Gacha;
    }
    if text.starts_with(LABEL_VIP) {
        return Command::Vip;
    }
    if has_price_suffix(text) {
        return Command::Buy(text.to_string());
    }

    Command::Unknown(text.to_string())
}

/// "name (123)": a shop button label.
fn has_price_suffix(text: &str) -> bool {
    let Some(open) = text.rfind(" (") else {
        return false;
    };
    text[open + 2..]
        .strip_suffix(')')
        .is_some_and(|price| !price.is_empty() && price.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_slash(text: &str) -> Command {
    let (head, args) = match text.find(char::is_whitespace) {
        Some(idx) => (&text[..idx], text[idx..].trim()),
        None => (text, ""),
    };
    let head = head.to_lowercase();
    let name = head.split('@').next().unwrap_or(&head);

    match name {
        "/start" | "/menu" => Command::Start,
        "/profile" | "/me" => Command::Profile,
        "/hunt" => match args.to_lowercase().as_str() {
            "" => Command::HuntMenu,
            "easy" => Command::Hunt(Tier::Easy),
            "normal" => Command::Hunt(Tier::Normal),
            "hard" => Command::Hunt(Tier::Hard),
            "boss" => Command::Hunt(Tier::Boss),
            _ => Command::Unknown(text.to_string()),
        },
        "/inv" | "/inventory" | "/bag" => Command::Inventory,
        "/use" | "/equip" => Command::Use(args.to_string()),
        "/shop" => Command::Shop,
        "/buy" => Command::Buy(args.to_string()),
        "/gacha" | "/buy_gacha" => Command::Gacha,
        "/vip" | "/buy_vip" => Command::Vip,
        "/guild" => Command::GuildMenu,
        "/join" => Command::JoinGuild(args.to_string()),
        "/leave" => Command::LeaveGuild,
        "/leaderboard" | "/top" => Command::Leaderboard,
        "/event" => Command::Event,
        "/help" => Command::Help,
        _ => Command::Unknown(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_labels() {
        assert_eq!(parse("👤 Profile"), Command::Profile);
        assert_eq!(parse("  ⚔️ Hunt "), Command::HuntMenu);
        assert_eq!(parse("🔙 Back"), Command::Start);
        assert_eq!(parse("🔴 Hard Hunt"), Command::Hunt(Tier::Hard));
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert_eq!(parse("👤 profile"), Command::Unknown("👤 profile".into()));
    }

    #[test]
    fn test_slash_commands_ignore_case_and_bot_suffix() {
        assert_eq!(parse("/HUNT boss"), Command::Hunt(Tier::Boss));
        assert_eq!(parse("/hunt@MimiBot"), Command::HuntMenu);
        assert_eq!(parse("/Me"), Command::Profile);
        assert_eq!(parse("/buy Power Elixir"), Command::Buy("Power Elixir".into()));
        assert_eq!(parse("/hunt sideways"), Command::Unknown("/hunt sideways".into()));
        assert_eq!(parse("/dance"), Command::Unknown("/dance".into()));
    }

    #[test]
    fn test_prefixed_buttons() {
        assert_eq!(parse("✨ Use 🧪 Power Elixir"), Command::Use("🧪 Power Elixir".into()));
        assert_eq!(
            parse("🛡️ Join 🐉 DragonSlayers (7000)"),
            Command::JoinGuild("🐉 DragonSlayers (7000)".into())
        );
        assert_eq!(parse("🎰 Gacha (500)"), Command::Gacha);
        assert_eq!(parse("🌟 VIP (10000)"), Command::Vip);
        assert_eq!(parse("🧪 Power Elixir (2000)"), Command::Buy("🧪 Power Elixir (2000)".into()));
    }

    #[test]
    fn test_free_text_is_unknown() {
        assert_eq!(parse("hello there"), Command::Unknown("hello there".into()));
        assert_eq!(parse("hello (there)"), Command::Unknown("hello (there)".into()));
        assert_eq!(parse("sale ()"), Command::Unknown("sale ()".into()));
        assert_eq!(parse(""), Command::Unknown(String::new()));
    }
}
