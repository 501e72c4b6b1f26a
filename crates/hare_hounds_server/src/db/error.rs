//! Match store errors.

use derive_more::{Display, Error};
use tracing::{instrument, warn};

/// Which part of the store failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum DbErrorKind {
    /// The database could not be opened.
    Connection,
    /// Schema migrations did not apply.
    Migration,
    /// A query was refused by the database.
    Query,
    /// A match could not be written as JSON.
    Encoding,
    /// A stored row does not describe a reachable match.
    CorruptRecord,
    /// An id does not fit the column type.
    OutOfRange,
    /// The store refused the write for another reason.
    Unavailable,
}

/// Store failure, tagged with its kind and the location that raised it.
#[derive(Debug, Clone, Display, Error)]
#[display("Match store {} error: {} at {}:{}", kind, message, file, line)]
pub struct DbError {
    /// What failed.
    pub kind: DbErrorKind,
    /// Detail from the failing layer.
    pub message: String,
    /// Line that raised the error.
    pub line: u32,
    /// File that raised the error.
    pub file: &'static str,
}

impl DbError {
    /// Creates an error of `kind` at the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: DbErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// True when the row exists but cannot be turned back into a match.
    pub fn is_corrupt(&self) -> bool {
        self.kind == DbErrorKind::CorruptRecord
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(DbErrorKind::Query, err.to_string())
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(DbErrorKind::Connection, err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(DbErrorKind::Encoding, err.to_string())
    }
}

impl From<hare_hounds::RestoreError> for DbError {
    #[track_caller]
    fn from(err: hare_hounds::RestoreError) -> Self {
        warn!(error = %err, "Stored match rejected");
        Self::new(DbErrorKind::CorruptRecord, err.to_string())
    }
}
