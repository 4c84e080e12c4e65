use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use forager::{GameConfig, GameData, GameEvent, GameHandle, GameSession, SystemClock};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("forager=info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("forager.toml"));

    let config = match GameConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let data = match GameData::load(&config) {
        Ok(data) => Arc::new(data),
        Err(e) => {
            error!("Failed to load game data from {:?}: {}", config.data_dir, e);
            std::process::exit(1);
        }
    };

    let session = match GameSession::new(data, &config) {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to start session: {}", e);
            std::process::exit(1);
        }
    };

    let game = GameHandle::new(session, Arc::new(SystemClock));
    let tick_interval = Duration::from_millis(config.tick_interval_ms);

    // Spawn event logger
    let mut events = game.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => log_event(&event),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Event logger fell behind, skipped {} events", skipped);
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Spawn game tick loop
    let ticker = game.spawn_tick_loop(tick_interval);

    info!("Foraging in '{}', press Ctrl+C to stop", config.starting_scene);

    // Idle loop: start a new forage whenever the last one has resolved
    let mut interval = tokio::time::interval(tick_interval);
    let mut idle = false;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if idle || game.read(GameSession::is_foraging).await {
                    continue;
                }
                if let Err(e) = game.act(|session, now| session.begin_forage(now)).await {
                    warn!("Stopped foraging: {}", e);
                    idle = true;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    ticker.abort();

    match serde_json::to_string_pretty(&game.snapshot().await) {
        Ok(snapshot) => info!("Final state:\n{}", snapshot),
        Err(e) => error!("Failed to serialize final state: {}", e),
    }
}

fn log_event(event: &GameEvent) {
    match serde_json::to_string(event) {
        Ok(json) => info!(target: "forager::events", "{}", json),
        Err(e) => warn!("Failed to serialize {} event: {}", event.kind(), e),
    }
}
