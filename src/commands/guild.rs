use crate::catalog;
use crate::error::GameError;
use crate::models::{GuildData, PlayerRecord};
use crate::outbound::{Keyboard, OutboundMessage};

use super::{Reply, Turn};

pub(super) fn handle_guild_menu(turn: &mut Turn<'_>, player: &mut PlayerRecord) -> Reply {
    let mut body = if player.in_guild() {
        format!("Guild kamu:\n{}\n", player.guild)
    } else {
        "Kamu belum punya guild.\n".to_string()
    };
    for guild in catalog::GUILDS {
        let members = turn.state.guilds.get(guild.name).map_or(0, |g| g.members.len());
        body.push_str(&format!("\n{}\n💰 {} | 👥 {}", guild.name, guild.price, members));
    }
    Ok(vec![turn.reply("🏰 Guild", body, Keyboard::Guild)])
}

/// Join the guild the text refers to: pay the fee, receive the rewards and get
/// announced in the broadcast chats (plus the guild's own topic, if it has one).
pub(super) fn handle_join(turn: &mut Turn<'_>, player: &mut PlayerRecord, query: &str) -> Reply {
    let Some(guild) = catalog::find_guild(query) else {
        tracing::debug!("No guild matches '{}'", query);
        return handle_guild_menu(turn, player);
    };
    if player.in_guild() {
        return Err(GameError::AlreadyInGuild(player.guild.clone()));
    }

    let paid = turn.charge(player, guild.price)?;
    player.inventory.extend(guild.rewards.iter().map(|r| r.to_string()));
    player.guild = guild.name.to_string();

    let data = turn
        .state
        .guilds
        .entry(guild.name.to_string())
        .or_insert_with(|| GuildData {
            name: guild.name.to_string(),
            members: Vec::new(),
            coins: 0,
        });
    if !data.members.contains(&player.id) {
        data.members.push(player.id.clone());
    }
    data.coins += paid;

    tracing::info!("{} joined guild {}", player.id, guild.name);

    let mut messages = vec![turn.reply(
        "🏰 Guild",
        format!(
            "Selamat bergabung di\n{}!\n\n🎁 Hadiah:\n{}\n\nSisa koin: {}",
            guild.name,
            guild.rewards.join("\n"),
            player.coins
        ),
        Keyboard::Main,
    )];
    messages.extend(OutboundMessage::broadcast(
        turn.ctx.broadcast_chats,
        "📢 Guild Baru",
        &format!("{} bergabung dengan\n{}!", player.username, guild.name),
        None,
    ));
    if let Some(topic) = guild.topic_id {
        messages.extend(OutboundMessage::broadcast(
            turn.ctx.broadcast_chats,
            "👋 Welcome",
            &format!("Selamat datang\n{}\ndi {}!", player.username, guild.name),
            Some(topic),
        ));
    }
    Ok(messages)
}

pub(super) fn handle_leave(turn: &mut Turn<'_>, player: &mut PlayerRecord) -> Reply {
    if !player.in_guild() {
        return Err(GameError::NotInGuild);
    }
    let name = std::mem::take(&mut player.guild);
    if let Some(data) = turn.state.guilds.get_mut(&name) {
        data.members.retain(|id| *id != player.id);
    }

    tracing::info!("{} left guild {}", player.id, name);

    let mut messages = vec![turn.reply("🚪 Guild", format!("Kamu keluar dari\n{}", name), Keyboard::Main)];
    messages.extend(OutboundMessage::broadcast(
        turn.ctx.broadcast_chats,
        "📢 Guild",
        &format!("{} keluar dari\n{}", player.username, name),
        None,
    ));
    Ok(messages)
}
