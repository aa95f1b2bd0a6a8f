//! `blanks` — a real-time multiplayer party-card-game server.
//!
//! Players join a room, a rotating card czar is chosen each round, players
//! submit response cards against a prompt, the czar picks a winner, and the
//! game ends on a score or round limit. Each room is its own serialization
//! point; see [`room::session`] for the state machine and [`ws::router`]
//! for the event glue around it.

pub mod catalog;
pub mod config;
pub mod conn;
pub mod error;
pub mod events;
pub mod http;
pub mod judge;
pub mod room;
pub mod store;
pub mod telemetry;
pub mod util;
pub mod ws;

pub use catalog::{Card, CardColor, Catalog};
pub use error::GameError;
pub use events::{ClientEvent, ServerEvent};
