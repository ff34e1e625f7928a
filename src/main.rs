mod catalog;
mod clock;
mod commands;
mod config;
mod error;
mod game;
mod models;
mod outbound;
mod runtime;
mod status;
mod sync;
mod telegram;
mod transport;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clock::{Clock, SystemClock, ThreadRandom};
use config::Config;
use models::GlobalState;
use runtime::{Engine, EngineParts};
use sync::{CloudSync, FileStore, HttpStore, RemoteStore};
use transport::ChatTransport;

/// Cancels `cancel` on Ctrl+C or SIGTERM.
fn setup_shutdown_signal(cancel: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!("Failed to listen for SIGTERM: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
            _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
        }

        cancel.cancel();
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mimibot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;

    let remote: Option<Box<dyn RemoteStore>> = config
        .cloud_url
        .clone()
        .map(|url| Box::new(HttpStore::new(url, config.cloud_token.clone())) as Box<dyn RemoteStore>);
    if remote.is_none() {
        tracing::warn!("CLOUD_STORE_URL not set, state is only kept locally");
    }
    let sync = CloudSync::new(remote, Box::new(FileStore::new(config.snapshot_path.clone())));

    let clock = Arc::new(SystemClock);
    let state = match sync.pull().await {
        Some(state) => state,
        None => {
            tracing::info!("Starting with a fresh world");
            GlobalState::new(clock.now())
        }
    };

    let transport: Option<Arc<dyn ChatTransport>> = match &config.bot_token {
        Some(token) => Some(Arc::new(telegram::TelegramClient::new(
            config.api_base.clone(),
            token.clone(),
            config.poll_timeout_secs,
        ))),
        None => {
            tracing::warn!("TELEGRAM_BOT_TOKEN not set, ingestion is idle");
            None
        }
    };

    let cancel = CancellationToken::new();
    setup_shutdown_signal(cancel.clone());

    let engine = Arc::new(Engine::new(
        EngineParts {
            state,
            sync,
            transport,
            clock,
            rng: Arc::new(ThreadRandom),
            broadcast_chats: config.broadcast_chats.clone(),
            privileged: config.privileged.clone(),
        },
        cancel.clone(),
    ));

    let poller = tokio::spawn(runtime::poller::run(engine.clone(), config.poll_interval));
    let scheduler = tokio::spawn(runtime::scheduler::run(engine.clone(), config.tick_interval));

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting status server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let shutdown = cancel.clone();
    axum::serve(listener, status::router(engine.clone()))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("Status server failed")?;

    for (name, task) in [("ingestion", poller), ("scheduler", scheduler)] {
        if let Err(e) = task.await {
            tracing::error!("{} task ended abnormally: {}", name, e);
        }
    }

    engine.flush().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
