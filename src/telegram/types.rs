use serde::{Deserialize, Serialize};

use crate::commands::parser as labels;
use crate::catalog;
use crate::outbound::Keyboard;
use crate::transport::{InboundMessage, InboundUpdate};

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub message_thread_id: Option<i64>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

impl From<Update> for InboundUpdate {
    fn from(update: Update) -> Self {
        // Messages from other bots are ignored to avoid reply loops.
        let message = update
            .message
            .filter(|m| !m.from.as_ref().is_some_and(|u| u.is_bot))
            .map(|m| {
                let (sender_id, name, handle) = match m.from {
                    Some(user) => (user.id, user.first_name, user.username),
                    None => (m.chat.id, String::new(), None),
                };
                InboundMessage {
                    sender_id,
                    chat_id: m.chat.id,
                    thread_id: m.message_thread_id,
                    sender_display_name: if name.is_empty() { "Adventurer".to_string() } else { name },
                    sender_handle: handle,
                    text: m.text,
                }
            });
        InboundUpdate {
            update_id: update.update_id,
            message,
        }
    }
}

/// Payload for `sendMessage`
#[derive(Debug, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_thread_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyKeyboardMarkup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub resize_keyboard: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyboardButton {
    pub text: String,
}

impl ReplyKeyboardMarkup {
    fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            keyboard: rows
                .into_iter()
                .map(|row| row.into_iter().map(|text| KeyboardButton { text }).collect())
                .collect(),
            resize_keyboard: true,
        }
    }

    /// Render a reply keyboard. `Keyboard::None` leaves the chat's keyboard alone.
    pub fn for_keyboard(keyboard: &Keyboard) -> Option<Self> {
        let back = || labels::LABEL_BACK.to_string();
        let rows = match keyboard {
            Keyboard::None => return None,
            Keyboard::Main => vec![
                vec![labels::LABEL_PROFILE.to_string(), labels::LABEL_HUNT.to_string()],
                vec![labels::LABEL_INVENTORY.to_string(), labels::LABEL_SHOP.to_string()],
                vec![labels::LABEL_GUILD.to_string(), labels::LABEL_LEADERBOARD.to_string()],
                vec![labels::LABEL_EVENT.to_string(), labels::LABEL_HELP.to_string()],
            ],
            Keyboard::Hunt => {
                let mut rows: Vec<Vec<String>> = catalog::TIERS
                    .chunks(2)
                    .map(|pair| pair.iter().map(|t| t.label.to_string()).collect())
                    .collect();
                rows.push(vec![back()]);
                rows
            }
            Keyboard::Shop => {
                let mut items: Vec<_> = catalog::ITEMS.iter().collect();
                items.sort_by_key(|i| i.price);
                let mut rows: Vec<Vec<String>> = items
                    .chunks(2)
                    .map(|pair| pair.iter().map(|i| i.shop_label()).collect())
                    .collect();
                rows.push(vec![
                    format!("{} ({})", labels::LABEL_GACHA, catalog::GACHA_PRICE),
                    format!("{} ({})", labels::LABEL_VIP, catalog::VIP_PRICE),
                ]);
                rows.push(vec![back()]);
                rows
            }
            Keyboard::Guild => {
                let mut rows: Vec<Vec<String>> = catalog::GUILDS.iter().map(|g| vec![g.join_label()]).collect();
                rows.push(vec![labels::LABEL_LEAVE_GUILD.to_string(), back()]);
                rows
            }
            Keyboard::Inventory(items) => {
                let mut rows: Vec<Vec<String>> = items
                    .chunks(2)
                    .map(|pair| pair.iter().map(|i| format!("{}{}", labels::PREFIX_USE, i)).collect())
                    .collect();
                rows.push(vec![back()]);
                rows
            }
        };
        Some(Self::from_rows(rows))
    }
}

/// Plain-text rendering of a titled message. No parse mode is used, so nothing needs escaping.
pub fn render_text(title: &str, body: &str) -> String {
    let rule = "═".repeat(18);
    format!("{}\n{}\n{}", title.to_uppercase(), rule, body)
}
