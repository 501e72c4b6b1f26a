//! Storage seam between the match service and persistence.

use crate::db::DbError;
use hare_hounds::{Match, MatchId, PlayerId};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, instrument};

/// Highest ids a store has seen, used to seed id assignment after a restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxIds {
    /// Largest stored match id.
    pub match_id: Option<MatchId>,
    /// Largest seated player id across all stored matches.
    pub player_id: Option<PlayerId>,
}

/// Persistence for matches.
///
/// `save` is an upsert keyed by match id. Implementations must be callable
/// from any thread.
pub trait MatchStore: Send + Sync + std::fmt::Debug {
    /// Inserts or replaces a match.
    fn save(&self, game: &Match) -> Result<(), DbError>;

    /// Loads one match.
    fn find(&self, id: MatchId) -> Result<Option<Match>, DbError>;

    /// Loads every match not yet in a win state.
    fn load_unfinished(&self) -> Result<Vec<Match>, DbError>;

    /// Highest ids in use.
    fn max_ids(&self) -> Result<MaxIds, DbError>;
}

/// Process-local store for ephemeral servers and tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    matches: RwLock<HashMap<MatchId, Match>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored matches.
    pub fn len(&self) -> usize {
        self.matches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been saved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MatchStore for InMemoryStore {
    #[instrument(skip(self, game), fields(id = %game.id()))]
    fn save(&self, game: &Match) -> Result<(), DbError> {
        self.matches
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(game.id(), game.clone());
        debug!("Match saved in memory");
        Ok(())
    }

    fn find(&self, id: MatchId) -> Result<Option<Match>, DbError> {
        Ok(self
            .matches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned())
    }

    fn load_unfinished(&self) -> Result<Vec<Match>, DbError> {
        let mut unfinished: Vec<_> = self
            .matches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|m| !m.is_finished())
            .cloned()
            .collect();
        unfinished.sort_by_key(Match::id);
        Ok(unfinished)
    }

    fn max_ids(&self) -> Result<MaxIds, DbError> {
        let matches = self.matches.read().unwrap_or_else(PoisonError::into_inner);
        Ok(MaxIds {
            match_id: matches.keys().copied().max(),
            player_id: matches.values().filter_map(Match::max_player_id).max(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hare_hounds::PieceKind;

    #[test]
    fn test_empty_store_has_no_maxima() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.max_ids().expect("max_ids"), MaxIds::default());
    }

    #[test]
    fn test_save_replaces_by_id() {
        let store = InMemoryStore::new();
        let mut game = Match::create(MatchId::new(3), PieceKind::Hound, PlayerId::new(4));
        store.save(&game).expect("save");
        game.join(PlayerId::new(9)).expect("join");
        store.save(&game).expect("save");

        assert_eq!(store.len(), 1);
        assert_eq!(store.find(MatchId::new(3)).expect("find"), Some(game));
        assert_eq!(
            store.max_ids().expect("max_ids"),
            MaxIds {
                match_id: Some(MatchId::new(3)),
                player_id: Some(PlayerId::new(9)),
            }
        );
    }
}
