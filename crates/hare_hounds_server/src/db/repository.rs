//! Database repository for matches.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use hare_hounds::{Match, MatchId, PlayerId};
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, DbErrorKind, MatchRecord, NewMatchRecord, schema};
use crate::store::{MatchStore, MaxIds};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// SQLite-backed match repository.
///
/// Opens a fresh connection per call, so it is cheap to share and safe to
/// use from any thread.
#[derive(Debug, Clone)]
pub struct MatchRepository {
    db_path: String,
}

impl MatchRepository {
    /// Creates a repository for the database file at `db_path`.
    ///
    /// The file is created on first connection if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.is_empty() {
            return Err(DbError::new(
                DbErrorKind::Connection,
                "Database path is empty",
            ));
        }
        info!(path = %db_path, "Creating MatchRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })
    }

    /// Applies any migrations the database has not seen yet.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| {
                DbError::new(DbErrorKind::Migration, format!("Migration failed: {}", e))
            })?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Inserts a match or replaces the stored row with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the match cannot be encoded or written.
    #[instrument(skip(self, game), fields(id = %game.id(), state = %game.state()))]
    pub fn save(&self, game: &Match) -> Result<(), DbError> {
        let record = NewMatchRecord::from_match(game)?;
        let mut conn = self.connection()?;

        diesel::replace_into(schema::matches::table)
            .values(&record)
            .execute(&mut conn)?;

        debug!("Match saved");
        Ok(())
    }

    /// Loads one match by id. Returns `None` if no row exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] on query failure or if the stored row is corrupt.
    #[instrument(skip(self))]
    pub fn find(&self, id: MatchId) -> Result<Option<Match>, DbError> {
        let key = i64::try_from(id.value()).map_err(|_| {
            DbError::new(
                DbErrorKind::OutOfRange,
                format!("Match id {} out of range", id),
            )
        })?;
        let mut conn = self.connection()?;

        let record = schema::matches::table
            .find(key)
            .select(MatchRecord::as_select())
            .first(&mut conn)
            .optional()?;

        match record {
            Some(record) => {
                debug!("Match found");
                record.restore().map(Some)
            }
            None => {
                debug!("Match not found");
                Ok(None)
            }
        }
    }

    /// Loads every match that has not reached a win state, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] on query failure or if any row is corrupt.
    #[instrument(skip(self))]
    pub fn load_unfinished(&self) -> Result<Vec<Match>, DbError> {
        let mut conn = self.connection()?;

        let records = schema::matches::table
            .filter(schema::matches::finished.eq(false))
            .order(schema::matches::id.asc())
            .select(MatchRecord::as_select())
            .load(&mut conn)?;

        let matches = records
            .iter()
            .map(MatchRecord::restore)
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| warn!(error = %e, "Stored match failed validation"))?;

        info!(count = matches.len(), "Unfinished matches loaded");
        Ok(matches)
    }

    /// Highest match id and player id in use.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] on query failure.
    #[instrument(skip(self))]
    pub fn max_ids(&self) -> Result<MaxIds, DbError> {
        use diesel::dsl::max;

        let mut conn = self.connection()?;

        let match_id = schema::matches::table
            .select(max(schema::matches::id))
            .first::<Option<i64>>(&mut conn)?;
        let player_id = schema::matches::table
            .select(max(schema::matches::max_player_id))
            .first::<Option<i64>>(&mut conn)?;

        let maxima = MaxIds {
            match_id: match_id.and_then(|v| u64::try_from(v).ok()).map(MatchId::new),
            player_id: player_id.and_then(|v| u64::try_from(v).ok()).map(PlayerId::new),
        };
        debug!(?maxima, "Id maxima loaded");
        Ok(maxima)
    }
}

impl MatchStore for MatchRepository {
    fn save(&self, game: &Match) -> Result<(), DbError> {
        MatchRepository::save(self, game)
    }

    fn find(&self, id: MatchId) -> Result<Option<Match>, DbError> {
        MatchRepository::find(self, id)
    }

    fn load_unfinished(&self) -> Result<Vec<Match>, DbError> {
        MatchRepository::load_unfinished(self)
    }

    fn max_ids(&self) -> Result<MaxIds, DbError> {
        MatchRepository::max_ids(self)
    }
}
