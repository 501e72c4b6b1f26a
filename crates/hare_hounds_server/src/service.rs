//! Match registry and the operations the API exposes.
//!
//! Every match sits behind its own lock, so moves in different matches never
//! wait on each other. A write is computed on a copy of the match, the copy
//! is persisted, and only then does it replace the live match; a failed
//! store write leaves the match exactly as it was.

use crate::db::DbError;
use crate::store::{MatchStore, MaxIds};
use derive_getters::Getters;
use derive_new::new;
use hare_hounds::{
    JoinError, Match, MatchId, MatchState, Move, MoveError, Piece, PieceKind, PlayerId,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, info, instrument, warn};

/// Hands out match and player ids.
///
/// Both counters are process-wide and only move forward. Player ids are
/// unique across all matches.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next_match: AtomicU64,
    next_player: AtomicU64,
}

impl IdGenerator {
    /// Starts both counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts each counter one past the highest stored id.
    pub fn seeded(maxima: MaxIds) -> Self {
        Self {
            next_match: AtomicU64::new(maxima.match_id.map_or(0, |id| id.value() + 1)),
            next_player: AtomicU64::new(maxima.player_id.map_or(0, |id| id.value() + 1)),
        }
    }

    /// Takes the next match id.
    pub fn next_match_id(&self) -> MatchId {
        MatchId::new(self.next_match.fetch_add(1, Ordering::SeqCst))
    }

    /// Takes the next player id.
    pub fn next_player_id(&self) -> PlayerId {
        PlayerId::new(self.next_player.fetch_add(1, Ordering::SeqCst))
    }
}

/// What a player learns on creating or joining a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    game_id: MatchId,
    player_id: PlayerId,
    piece_type: PieceKind,
    state: MatchState,
}

/// Why a service operation failed.
#[derive(Debug, Clone, derive_more::Display, derive_more::From)]
pub enum ServiceError {
    /// No match has this id.
    #[display("Match {} not found", _0)]
    #[from(ignore)]
    NotFound(MatchId),

    /// Both seats of the match are taken.
    #[display("Match {} already has two players", _0)]
    #[from(ignore)]
    AlreadyJoined(MatchId),

    /// The engine refused the move.
    #[display("{}", _0)]
    Move(MoveError),

    /// The store failed; the match was not changed.
    #[display("{}", _0)]
    Storage(DbError),
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Move(e) => Some(e),
            ServiceError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

type SharedMatch = Arc<RwLock<Match>>;

/// Owns every live match and the store behind them.
#[derive(Debug)]
pub struct MatchService {
    store: Arc<dyn MatchStore>,
    ids: IdGenerator,
    matches: RwLock<HashMap<MatchId, SharedMatch>>,
}

impl MatchService {
    /// Builds a service over `store`, restoring its unfinished matches and
    /// seeding id assignment from the highest ids it holds.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store cannot be read or holds a corrupt match.
    #[instrument(skip(store))]
    pub fn new(store: Arc<dyn MatchStore>) -> Result<Self, DbError> {
        let maxima = store.max_ids()?;
        let restored = store.load_unfinished()?;

        info!(
            restored = restored.len(),
            ?maxima,
            "Restoring matches from store"
        );

        let matches = restored
            .into_iter()
            .map(|game| (game.id(), Arc::new(RwLock::new(game))))
            .collect();

        Ok(Self {
            store,
            ids: IdGenerator::seeded(maxima),
            matches: RwLock::new(matches),
        })
    }

    /// Number of unfinished matches held in memory.
    pub fn live_count(&self) -> usize {
        self.matches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Finds a live match, falling back to the store for finished ones.
    ///
    /// A finished match read from the store is not cached: it can no longer
    /// change, and only unfinished matches are kept in memory.
    #[instrument(skip(self))]
    fn lookup(&self, id: MatchId) -> Result<SharedMatch, ServiceError> {
        if let Some(game) = self
            .matches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return Ok(Arc::clone(game));
        }

        let stored = self.store.find(id)?.ok_or_else(|| {
            debug!("Match not found");
            ServiceError::NotFound(id)
        })?;

        if stored.is_finished() {
            debug!("Finished match read from store");
            return Ok(Arc::new(RwLock::new(stored)));
        }

        debug!("Unfinished match loaded from store");
        let mut matches = self.matches.write().unwrap_or_else(PoisonError::into_inner);
        let entry = matches
            .entry(id)
            .or_insert_with(|| Arc::new(RwLock::new(stored)));
        Ok(Arc::clone(entry))
    }

    /// Drops a decided match from memory. It stays readable through the store.
    fn retire(&self, id: MatchId) {
        self.matches
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        debug!(%id, "Finished match evicted");
    }

    /// Opens a new match with the caller seated as `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] if the match cannot be persisted.
    #[instrument(skip(self))]
    pub fn create(&self, kind: PieceKind) -> Result<GameInfo, ServiceError> {
        let id = self.ids.next_match_id();
        let player = self.ids.next_player_id();
        let game = Match::create(id, kind, player);

        self.store.save(&game).inspect_err(|e| {
            error!(error = %e, %id, "Failed to persist new match");
        })?;

        let info = GameInfo::new(id, player, kind, game.state());
        self.matches
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(RwLock::new(game)));

        info!(%id, %player, %kind, "Match opened");
        Ok(info)
    }

    /// Seats a new player on the open side of match `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::AlreadyJoined`] or
    /// [`ServiceError::Storage`].
    #[instrument(skip(self))]
    pub fn join(&self, id: MatchId) -> Result<GameInfo, ServiceError> {
        let shared = self.lookup(id)?;
        let mut live = shared.write().unwrap_or_else(PoisonError::into_inner);

        if live.open_seat().is_none() {
            warn!(%id, "Join refused, match is full");
            return Err(ServiceError::AlreadyJoined(id));
        }

        let player = self.ids.next_player_id();
        let mut next = live.clone();
        let kind = next.join(player).map_err(|e| match e {
            JoinError::AlreadyJoined => ServiceError::AlreadyJoined(id),
        })?;

        self.store.save(&next).inspect_err(|e| {
            error!(error = %e, %id, "Failed to persist join");
        })?;
        *live = next;

        info!(%id, %player, %kind, "Player joined");
        Ok(GameInfo::new(id, player, kind, live.state()))
    }

    /// Current state of match `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub fn state(&self, id: MatchId) -> Result<MatchState, ServiceError> {
        let shared = self.lookup(id)?;
        let state = shared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .state();
        Ok(state)
    }

    /// The four pieces of match `id`, hare first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub fn board(&self, id: MatchId) -> Result<Vec<Piece>, ServiceError> {
        let shared = self.lookup(id)?;
        let pieces = shared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .board()
            .pieces()
            .to_vec();
        Ok(pieces)
    }

    /// A copy of match `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown id.
    pub fn snapshot(&self, id: MatchId) -> Result<Match, ServiceError> {
        let shared = self.lookup(id)?;
        let game = shared.read().unwrap_or_else(PoisonError::into_inner).clone();
        Ok(game)
    }

    /// Applies a move to match `id` and returns the resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`], [`ServiceError::Move`] for a
    /// refused move, or [`ServiceError::Storage`].
    #[instrument(skip(self, mv), fields(mv = %mv))]
    pub fn play(&self, id: MatchId, mv: Move) -> Result<MatchState, ServiceError> {
        let shared = self.lookup(id)?;
        let mut live = shared.write().unwrap_or_else(PoisonError::into_inner);

        let mut next = live.clone();
        let state = next.apply_move(&mv).inspect_err(|e| {
            warn!(%id, error = %e, "Move refused");
        })?;

        self.store.save(&next).inspect_err(|e| {
            error!(error = %e, %id, "Failed to persist move");
        })?;
        *live = next;
        drop(live);

        info!(%id, %state, "Move accepted");
        if state.is_terminal() {
            self.retire(id);
        }
        Ok(state)
    }
}
