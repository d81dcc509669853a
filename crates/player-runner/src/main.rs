//! Underworld Player Runner - composition root binary
//!
//! Reads JSON commands from stdin, one per line, e.g.
//! `{"new_game": {}}` then `{"exit_room": {"exit_id": "E1"}}`.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use underworld_player::{
    ActionService, ClientConfig, ErrorObserver, GameApiPort, GameService, HttpGameApi,
    InMemorySessionStore, NotificationBus, SessionPort, StateObserver,
};
use underworld_player_runner::{ErrorNotice, EventLog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "underworld_player=debug,underworld_player_runner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Underworld Player");

    let config = ClientConfig::from_env().context("Failed to load client configuration")?;
    tracing::info!(api = %config.api_base, "Using game server");

    let session: Arc<dyn SessionPort> = Arc::new(InMemorySessionStore::new(config.session()));
    if let Err(missing) = session.current().require() {
        tracing::warn!(%missing, "Session incomplete; select or generate a game before acting");
    }

    let api: Arc<dyn GameApiPort> = Arc::new(HttpGameApi::from_config(&config));
    let bus = NotificationBus::new();
    let actions = ActionService::new(Arc::clone(&api), Arc::clone(&session), bus.clone());
    let games = GameService::new(api, session, bus);

    let log = EventLog::new();
    actions.subscribe_to_state_deltas(Arc::clone(&log) as Arc<dyn StateObserver>);
    actions.subscribe_to_errors(ErrorNotice::new() as Arc<dyn ErrorObserver>);

    let summary = underworld_player_runner::run(
        &actions,
        &games,
        BufReader::new(tokio::io::stdin()),
    )
    .await?;

    tracing::info!(
        dispatched = summary.dispatched,
        failed = summary.failed,
        skipped = summary.skipped,
        setup = summary.setup,
        events = log.len(),
        "Input closed"
    );
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
    let _ = dotenvy::dotenv();
}
