//! SQLite persistence for matches.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::{DbError, DbErrorKind};
pub use models::{MatchRecord, NewMatchRecord};
pub use repository::{MIGRATIONS, MatchRepository};
