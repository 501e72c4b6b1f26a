//! Hare and Hounds game server.
//!
//! Wraps the [`hare_hounds`] engine in a REST API backed by SQLite:
//!
//! - **api**: axum routes and the mapping of failures to HTTP statuses
//! - **service**: the live match registry, id assignment and atomic writes
//! - **store**: the persistence seam, with SQLite and in-memory backends
//! - **db**: diesel models, schema and repository
//! - **config**: layered server settings

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod db;
pub mod service;
pub mod store;

pub use api::{API_BASE, ApiError, app, router};
pub use config::{ConfigError, ServerConfig};
pub use db::{DbError, DbErrorKind, MIGRATIONS, MatchRecord, MatchRepository, NewMatchRecord};
pub use service::{GameInfo, IdGenerator, MatchService, ServiceError};
pub use store::{InMemoryStore, MatchStore, MaxIds};
