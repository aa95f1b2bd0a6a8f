//! Configuration utilities (ports, paths, retention, env vars).

use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Socket address to bind the server to.
///
/// Reads the `PORT` env var or defaults to 8080, binds to 0.0.0.0.
pub fn server_addr() -> SocketAddr {
    let port = env::var("PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(8080);
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
}

/// Path to the card pack file (`BLANKS_CARDS`, default `./cards.json`).
pub fn cards_path() -> PathBuf {
    env::var("BLANKS_CARDS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./cards.json"))
}

/// Directory for persisted room snapshots (`BLANKS_DATA_DIR`,
/// default `./data`).
pub fn data_dir() -> PathBuf {
    env::var("BLANKS_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data"))
}

/// Retention window for idle rooms (`BLANKS_RETENTION_DAYS`, default 7).
pub fn retention_window() -> Duration {
    let days = env::var("BLANKS_RETENTION_DAYS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(7);
    Duration::from_secs(days * 24 * 60 * 60)
}

/// How often the stale-room purge runs.
pub fn purge_interval() -> Duration {
    Duration::from_secs(60 * 60)
}
