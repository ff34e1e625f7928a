use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: Option<String>,
    pub api_base: String,
    pub poll_interval: Duration,
    pub poll_timeout_secs: u64,
    pub tick_interval: Duration,
    pub cloud_url: Option<String>,
    pub cloud_token: Option<String>,
    pub snapshot_path: PathBuf,
    pub broadcast_chats: Vec<i64>,
    pub privileged: Vec<String>,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base: "https://api.telegram.org".to_string(),
            poll_interval: Duration::from_millis(1000),
            poll_timeout_secs: 30,
            tick_interval: Duration::from_secs(60),
            cloud_url: None,
            cloud_token: None,
            snapshot_path: PathBuf::from("data/state.json"),
            broadcast_chats: Vec::new(),
            privileged: Vec::new(),
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let bot_token = non_empty_var("TELEGRAM_BOT_TOKEN");
        if let Some(token) = &bot_token {
            if !token.contains(':') {
                bail!("TELEGRAM_BOT_TOKEN is malformed (expected <id>:<secret>)");
            }
        }

        let poll_interval = match non_empty_var("POLL_INTERVAL_MS") {
            Some(v) => Duration::from_millis(v.parse().context("Invalid POLL_INTERVAL_MS")?),
            None => defaults.poll_interval,
        };
        let poll_timeout_secs = match non_empty_var("POLL_TIMEOUT_SECS") {
            Some(v) => v.parse().context("Invalid POLL_TIMEOUT_SECS")?,
            None => defaults.poll_timeout_secs,
        };
        let tick_interval = match non_empty_var("TICK_INTERVAL_SECS") {
            Some(v) => Duration::from_secs(v.parse().context("Invalid TICK_INTERVAL_SECS")?),
            None => defaults.tick_interval,
        };
        let port = match non_empty_var("PORT") {
            Some(v) => v.parse::<u16>().context("Invalid PORT")?,
            None => defaults.port,
        };

        let broadcast_chats = split_list(&std::env::var("BROADCAST_CHAT_IDS").unwrap_or_default())
            .into_iter()
            .map(|id| id.parse::<i64>().with_context(|| format!("Invalid chat id in BROADCAST_CHAT_IDS: {}", id)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            bot_token,
            api_base: non_empty_var("TELEGRAM_API_BASE").unwrap_or(defaults.api_base),
            poll_interval,
            poll_timeout_secs,
            tick_interval,
            cloud_url: non_empty_var("CLOUD_STORE_URL"),
            cloud_token: non_empty_var("CLOUD_STORE_TOKEN"),
            snapshot_path: non_empty_var("SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),
            broadcast_chats,
            privileged: split_list(&std::env::var("PRIVILEGED_IDS").unwrap_or_default()),
            host: non_empty_var("HOST").unwrap_or(defaults.host),
            port,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Comma-separated list, blanks and `#` comments dropped.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with('#'))
        .map(str::to_string)
        .collect()
}
