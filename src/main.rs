use std::sync::Arc;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use blanks::catalog::Catalog;
use blanks::config;
use blanks::conn::ConnectionTable;
use blanks::http::routes::{self, AppState};
use blanks::judge::{AutoJudge, RandomJudge};
use blanks::room::registry::RoomRegistry;
use blanks::store::{JsonFileStore, SnapshotStore};
use blanks::telemetry;
use blanks::ws;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let catalog = Arc::new(Catalog::load(config::cards_path()).context("loading card catalog")?);
    let store: Arc<dyn SnapshotStore> =
        Arc::new(JsonFileStore::new(config::data_dir()).context("opening snapshot store")?);
    let registry = Arc::new(RoomRegistry::new(catalog, store));

    // BLANKS_AUTO_JUDGE=random resolves timed-out rounds instead of
    // skipping them. The real judge integration plugs in here.
    let auto_judge: Option<Arc<dyn AutoJudge>> =
        match std::env::var("BLANKS_AUTO_JUDGE").ok().as_deref() {
            Some("random") => Some(Arc::new(RandomJudge)),
            _ => None,
        };

    let state = AppState {
        registry: registry.clone(),
        bindings: Arc::new(ConnectionTable::new()),
        auto_judge,
    };

    // Scheduled stale-room purge; never runs inline with a player action.
    let retention = config::retention_window();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config::purge_interval());
        loop {
            ticker.tick().await;
            let purged = registry.purge_stale(retention);
            if !purged.is_empty() {
                tracing::info!(count = purged.len(), "purged stale rooms");
            }
        }
    });

    let app = Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/rooms", post(routes::create_room))
        .route("/rooms/:id", get(routes::room_summary))
        .route("/ws", get(ws::connection::ws_handler))
        .layer(CorsLayer::new().allow_methods(Any).allow_headers(Any).allow_origin(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config::server_addr();
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
