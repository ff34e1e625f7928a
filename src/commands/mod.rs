//! The command interpreter: one inbound text in, state mutated, replies and broadcasts out.

pub mod parser;
mod profile;
mod hunt;
mod shop;
mod inventory;
mod guild;
mod leaderboard;

pub use parser::{parse, Command};

use chrono::{DateTime, Utc};

use crate::clock::RandomSource;
use crate::error::GameError;
use crate::models::{GlobalState, PlayerRecord};
use crate::outbound::{Keyboard, OutboundMessage};

/// Who sent a message and where to answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Sender {
    pub id: String,
    pub chat_id: i64,
    pub thread_id: Option<i64>,
    pub display_name: String,
    pub handle: Option<String>,
}

/// Everything a command may consult besides the state itself.
pub struct Context<'a> {
    pub now: DateTime<Utc>,
    pub rng: &'a dyn RandomSource,
    pub broadcast_chats: &'a [i64],
    /// Sender ids or `@handles` exempt from prices and level gates.
    pub privileged: &'a [String],
}

impl Context<'_> {
    pub fn is_privileged(&self, sender: &Sender) -> bool {
        self.privileged.iter().any(|p| {
            *p == sender.id
                || sender
                    .handle
                    .as_deref()
                    .is_some_and(|h| p.strip_prefix('@') == Some(h))
        })
    }
}

/// Per-invocation view handed to handlers. The sender's record is held
/// separately, so `state.players` does not contain it while a handler runs.
pub(crate) struct Turn<'a> {
    pub state: &'a mut GlobalState,
    pub ctx: &'a Context<'a>,
    pub sender: &'a Sender,
    pub privileged: bool,
}

impl Turn<'_> {
    pub fn reply(&self, title: &str, body: impl Into<String>, keyboard: Keyboard) -> OutboundMessage {
        OutboundMessage::new(self.sender.chat_id, title, body, keyboard).in_thread(self.sender.thread_id)
    }

    /// Charge `price`, unless the sender is privileged.
    pub fn charge(&self, player: &mut PlayerRecord, price: u64) -> Result<u64, GameError> {
        if self.privileged {
            return Ok(0);
        }
        if player.coins < price {
            return Err(GameError::InsufficientCoins { price, balance: player.coins });
        }
        player.spend(price);
        Ok(price)
    }
}

pub(crate) type Reply = Result<Vec<OutboundMessage>, GameError>;

/// Apply one line of player text to the state.
///
/// Unknown text gets the main menu back. A [`GameError`] rolls the sender's record
/// back to how it was and is reported as a failure message.
pub fn interpret(state: &mut GlobalState, ctx: &Context<'_>, sender: &Sender, text: &str) -> Vec<OutboundMessage> {
    state.metadata.total_commands_processed += 1;

    let (mut player, is_new) = match state.players.remove(&sender.id) {
        Some(player) => (player, false),
        None => {
            tracing::info!("New player {} ({})", sender.display_name, sender.id);
            (PlayerRecord::new(sender.id.clone(), sender.display_name.clone(), ctx.now), true)
        }
    };
    if !sender.display_name.is_empty() {
        player.username = sender.display_name.clone();
    }
    player.active_effects.retain(|e| !e.is_exhausted());

    let original = player.clone();
    let command = parse(text);
    tracing::debug!("{} -> {:?}", sender.id, command);

    let result = {
        let mut turn = Turn {
            state: &mut *state,
            ctx,
            sender,
            privileged: ctx.is_privileged(sender),
        };
        dispatch(&mut turn, &mut player, command, is_new)
    };

    let messages = match result {
        Ok(messages) => messages,
        Err(e) => {
            tracing::debug!("Command from {} rejected: {}", sender.id, e);
            player = original;
            vec![OutboundMessage::new(sender.chat_id, "❌ Gagal", e.to_string(), Keyboard::Main)
                .in_thread(sender.thread_id)]
        }
    };

    state.players.insert(sender.id.clone(), player);
    messages
}

fn dispatch(turn: &mut Turn<'_>, player: &mut PlayerRecord, command: Command, is_new: bool) -> Reply {
    match command {
        Command::Start => Ok(vec![handle_start(turn, player, is_new)]),
        Command::Profile => profile::handle_profile(turn, player),
        Command::HuntMenu => hunt::handle_hunt_menu(turn, player),
        Command::Hunt(tier) => hunt::handle_hunt(turn, player, tier),
        Command::Inventory => inventory::handle_inventory(turn, player),
        Command::Use(query) => inventory::handle_use(turn, player, &query),
        Command::Shop => shop::handle_shop(turn, player),
        Command::Buy(query) => shop::handle_buy(turn, player, &query),
        Command::Gacha => shop::handle_gacha(turn, player),
        Command::Vip => shop::handle_vip(turn, player),
        Command::GuildMenu => guild::handle_guild_menu(turn, player),
        Command::JoinGuild(query) => guild::handle_join(turn, player, &query),
        Command::LeaveGuild => guild::handle_leave(turn, player),
        Command::Leaderboard => leaderboard::handle_leaderboard(turn, player),
        Command::Event => Ok(vec![handle_event(turn)]),
        Command::Help => Ok(vec![handle_help(turn)]),
        Command::Unknown(_) => Ok(vec![turn.reply("❓ Unknown", "Klik menu\ndi bawah ini!", Keyboard::Main)]),
    }
}

fn handle_start(turn: &Turn<'_>, player: &PlayerRecord, is_new: bool) -> OutboundMessage {
    if is_new {
        turn.reply(
            "🎮 Welcome",
            format!(
                "Selamat Datang di\nMiMi Games RPG!\n\nKarakter: {}\n\nKlik menu di bawah\nuntuk memulai!",
                player.player_class.label()
            ),
            Keyboard::Main,
        )
    } else {
        turn.reply(
            "🏠 Main Menu",
            format!(
                "Halo {}!\nLevel: {}\nCoins: {}\n\nSiap berburu hari ini?",
                player.username, player.level, player.coins
            ),
            Keyboard::Main,
        )
    }
}

fn handle_event(turn: &Turn<'_>) -> OutboundMessage {
    let body = match turn.state.current_event() {
        Some(event) => format!(
            "{}\nXP x{}\nBerakhir {} UTC",
            event.theme,
            event.xp_multiplier,
            event.end_time.format("%H:%M")
        ),
        None => "Tidak ada event\nsaat ini.".to_string(),
    };
    turn.reply("🎊 Event", body, Keyboard::Main)
}

fn handle_help(turn: &Turn<'_>) -> OutboundMessage {
    let help = "Bantuan Command:\n\n\
        👤 Profile: Status\n\
        ⚔️ Hunt: Bertarung\n\
        🎒 Bag: Item kamu\n\
        🛒 Shop: Belanja\n\
        🏰 Guild: Gabung guild\n\
        🏆 Top: Peringkat\n\
        🎊 Event: Event server\n\n\
        Mainkan setiap hari!";
    turn.reply("❓ Info", help, Keyboard::Main)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clock::ScriptedRandom;
    use chrono::TimeZone;

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap()
    }

    pub fn sender(id: &str) -> Sender {
        Sender {
            id: id.to_string(),
            chat_id: id.parse().unwrap_or(1),
            thread_id: None,
            display_name: format!("Player{}", id),
            handle: None,
        }
    }

    pub fn run(state: &mut GlobalState, rng: &ScriptedRandom, from: &Sender, text: &str) -> Vec<OutboundMessage> {
        run_with(state, rng, &[], &[], from, text)
    }

    pub fn run_with(
        state: &mut GlobalState,
        rng: &ScriptedRandom,
        channels: &[i64],
        privileged: &[String],
        from: &Sender,
        text: &str,
    ) -> Vec<OutboundMessage> {
        let ctx = Context { now: now(), rng, broadcast_chats: channels, privileged };
        interpret(state, &ctx, from, text)
    }

    #[test]
    fn test_first_contact_creates_record() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new();
        let out = run(&mut state, &rng, &sender("10"), "/start");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "🎮 Welcome");
        assert_eq!(out[0].chat_id, 10);
        assert!(state.players.contains_key("10"));
        assert_eq!(state.metadata.total_commands_processed, 1);
    }

    #[test]
    fn test_first_contact_still_processes_text() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new();
        let out = run(&mut state, &rng, &sender("11"), "👤 Profile");
        assert_eq!(out[0].title, "📜 Profile");
        assert!(state.players.contains_key("11"));
    }

    #[test]
    fn test_unknown_text_returns_main_menu() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new();
        let out = run(&mut state, &rng, &sender("12"), "what is this");
        assert_eq!(out[0].title, "❓ Unknown");
        assert_eq!(out[0].keyboard, Keyboard::Main);
    }

    #[test]
    fn test_every_invocation_counts() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new();
        for text in ["/start", "nonsense", "❓ Help"] {
            run(&mut state, &rng, &sender("13"), text);
        }
        assert_eq!(state.metadata.total_commands_processed, 3);
        assert_eq!(state.players.len(), 1);
    }

    #[test]
    fn test_failure_leaves_record_untouched() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new();
        run(&mut state, &rng, &sender("14"), "/start");
        let before = state.players["14"].clone();

        let out = run(&mut state, &rng, &sender("14"), "/hunt boss");
        assert_eq!(out[0].title, "❌ Gagal");
        assert_eq!(state.players["14"], before);
    }

    #[test]
    fn test_replies_stay_in_thread() {
        let mut state = GlobalState::new(now());
        let rng = ScriptedRandom::new();
        let mut from = sender("15");
        from.chat_id = -500;
        from.thread_id = Some(9);
        let out = run(&mut state, &rng, &from, "❓ Help");
        assert_eq!(out[0].chat_id, -500);
        assert_eq!(out[0].thread_id, Some(9));
    }

    #[test]
    fn test_privileged_by_id_or_handle() {
        let rng = ScriptedRandom::new();
        let privileged = vec!["77".to_string(), "@gm".to_string()];
        let ctx = Context { now: now(), rng: &rng, broadcast_chats: &[], privileged: &privileged };

        assert!(ctx.is_privileged(&sender("77")));
        let mut by_handle = sender("5");
        by_handle.handle = Some("gm".into());
        assert!(ctx.is_privileged(&by_handle));
        assert!(!ctx.is_privileged(&sender("5")));
    }
}
