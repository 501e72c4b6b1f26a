//! Database models.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use hare_hounds::Match;
use tracing::{instrument, warn};

use crate::db::{DbError, DbErrorKind, schema};

/// A stored match row.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::matches)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MatchRecord {
    id: i64,
    state: String,
    finished: bool,
    max_player_id: i64,
    match_json: String,
    updated_at: NaiveDateTime,
}

impl MatchRecord {
    /// Rebuilds the match held in this row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the JSON is malformed, describes an unreachable
    /// match, or disagrees with the row's key.
    #[instrument(skip(self), fields(id = self.id))]
    pub fn restore(&self) -> Result<Match, DbError> {
        let game = Match::from_json(&self.match_json)?;
        if i64::try_from(game.id().value()) != Ok(self.id) {
            warn!(stored = %game.id(), "Row key does not match serialized id");
            return Err(DbError::new(
                DbErrorKind::CorruptRecord,
                format!("Row {} holds match {}", self.id, game.id()),
            ));
        }
        Ok(game)
    }
}

/// Insertable form of a match.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::matches)]
pub struct NewMatchRecord {
    id: i64,
    state: String,
    finished: bool,
    max_player_id: i64,
    match_json: String,
    updated_at: NaiveDateTime,
}

impl NewMatchRecord {
    /// Snapshots a match for storage.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if an id does not fit the column type or the
    /// match cannot be serialized.
    #[instrument(skip(game), fields(id = %game.id()))]
    pub fn from_match(game: &Match) -> Result<Self, DbError> {
        let id = i64::try_from(game.id().value())
            .map_err(|_| {
                DbError::new(
                    DbErrorKind::OutOfRange,
                    format!("Match id {} out of range", game.id()),
                )
            })?;
        let max_player_id = game
            .max_player_id()
            .map_or(Ok(0), |p| i64::try_from(p.value()))
            .map_err(|_| DbError::new(DbErrorKind::OutOfRange, "Player id out of range"))?;

        Ok(Self::new(
            id,
            game.state().to_string(),
            game.is_finished(),
            max_player_id,
            game.to_json()?,
            chrono::Utc::now().naive_utc(),
        ))
    }
}
