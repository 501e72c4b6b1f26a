//! The match aggregate.

use crate::contracts::{Contract, MoveContract, Step};
use crate::invariants::{BoardInvariants, InvariantSet};
use crate::rules::{self, STALLING_REPETITIONS};
use crate::{
    Board, IllegalMove, JoinError, MatchId, MatchState, Move, MoveError, PieceKind, PlayerId,
    RepetitionLedger,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// One game of Hare and Hounds.
///
/// A match is created by the first player with a chosen kind, waits for a
/// second player who takes the other kind, then alternates turns (hounds
/// first) until one of the three win states. It is only mutated through
/// [`Match::join`] and [`Match::apply_move`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    id: MatchId,
    state: MatchState,
    hound_player: Option<PlayerId>,
    hare_player: Option<PlayerId>,
    board: Board,
    ledger: RepetitionLedger,
}

impl Match {
    /// Opens a match with `player` seated as `kind`.
    ///
    /// The starting placement is recorded in the ledger as its first
    /// occurrence.
    #[instrument]
    pub fn create(id: MatchId, kind: PieceKind, player: PlayerId) -> Self {
        let board = Board::new();
        let mut ledger = RepetitionLedger::new();
        ledger.record(board.fingerprint());

        let (hound_player, hare_player) = match kind {
            PieceKind::Hound => (Some(player), None),
            PieceKind::Hare => (None, Some(player)),
        };

        info!(%id, %kind, %player, "Match created");
        Self {
            id,
            state: MatchState::WaitingForSecondPlayer,
            hound_player,
            hare_player,
            board,
            ledger,
        }
    }

    /// The kind still waiting for a player, if any.
    pub fn open_seat(&self) -> Option<PieceKind> {
        if self.hound_player.is_none() {
            Some(PieceKind::Hound)
        } else if self.hare_player.is_none() {
            Some(PieceKind::Hare)
        } else {
            None
        }
    }

    /// Seats `player` on the open side and starts the match.
    ///
    /// Returns the kind the player was given. Fails without touching the
    /// match if both seats are taken.
    #[instrument(skip(self), fields(id = %self.id))]
    pub fn join(&mut self, player: PlayerId) -> Result<PieceKind, JoinError> {
        let kind = self.open_seat().ok_or_else(|| {
            warn!("Join refused, match is full");
            JoinError::AlreadyJoined
        })?;

        match kind {
            PieceKind::Hound => self.hound_player = Some(player),
            PieceKind::Hare => self.hare_player = Some(player),
        }
        self.state = MatchState::TurnHound;

        info!(%kind, "Second player joined");
        Ok(kind)
    }

    /// The kind `player` is seated as, if seated here.
    pub fn kind_of(&self, player: PlayerId) -> Option<PieceKind> {
        if self.hound_player == Some(player) {
            Some(PieceKind::Hound)
        } else if self.hare_player == Some(player) {
            Some(PieceKind::Hare)
        } else {
            None
        }
    }

    /// The player seated as `kind`.
    pub fn player_for(&self, kind: PieceKind) -> Option<PlayerId> {
        match kind {
            PieceKind::Hound => self.hound_player,
            PieceKind::Hare => self.hare_player,
        }
    }

    /// Resolves `player` to the kind it may move right now.
    ///
    /// Checks run in this order: no active turn while waiting, player not
    /// seated, match already decided, and finally the opponent's turn.
    pub fn check_turn(&self, player: PlayerId) -> Result<PieceKind, MoveError> {
        if self.state == MatchState::WaitingForSecondPlayer {
            return Err(MoveError::InvalidPlayer(player));
        }
        let kind = self
            .kind_of(player)
            .ok_or(MoveError::InvalidPlayer(player))?;

        match self.state.turn() {
            None => Err(IllegalMove::GameOver(self.state).into()),
            Some(expected) if expected != kind => Err(MoveError::IncorrectTurn { expected }),
            Some(_) => Ok(kind),
        }
    }

    /// Validates and applies a move, returning the resulting state.
    ///
    /// A rejected move leaves the match untouched. An accepted move relocates
    /// one piece, hands the turn to the other side, records the new placement
    /// and then lets the win conditions override the state.
    #[instrument(skip(self), fields(id = %self.id, state = %self.state))]
    pub fn apply_move(&mut self, mv: &Move) -> Result<MatchState, MoveError> {
        let mover = self.check_turn(mv.player).inspect_err(|e| {
            debug!(error = %e, "Move refused");
        })?;

        let step = Step::new(mover, mv.from, mv.to);
        MoveContract::pre(&self.board, &step).inspect_err(|e| {
            debug!(reason = e.code(), "Illegal move");
        })?;

        #[cfg(debug_assertions)]
        let before = self.board.clone();

        self.board.relocate(mv.from, mv.to);

        #[cfg(debug_assertions)]
        if let Err(violation) = MoveContract::post(&before, &self.board) {
            panic!("{}", violation.description);
        }

        let provisional = MatchState::turn_of(mover.complement());
        self.ledger.record(self.board.fingerprint());
        self.state = rules::evaluate(&self.board, &self.ledger, mover, provisional);

        debug!(new_state = %self.state, "Move applied");
        Ok(self.state)
    }

    /// Returns true once a win state has been reached.
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// The larger of the two seated player ids.
    pub fn max_player_id(&self) -> Option<PlayerId> {
        self.hound_player.max(self.hare_player)
    }

    /// The match id.
    pub fn id(&self) -> MatchId {
        self.id
    }

    /// The current state.
    pub fn state(&self) -> MatchState {
        self.state
    }

    /// The player seated as the hounds.
    pub fn hound_player(&self) -> Option<PlayerId> {
        self.hound_player
    }

    /// The player seated as the hare.
    pub fn hare_player(&self) -> Option<PlayerId> {
        self.hare_player
    }

    /// The current placement.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Every placement seen so far.
    pub fn ledger(&self) -> &RepetitionLedger {
        &self.ledger
    }

    /// Serializes the full match, ledger included.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Rebuilds a match from [`Match::to_json`] output and validates it.
    pub fn from_json(json: &str) -> Result<Self, RestoreError> {
        let restored: Self =
            serde_json::from_str(json).map_err(|e| RestoreError::Malformed(e.to_string()))?;
        restored.validate()?;
        Ok(restored)
    }

    /// Checks that a match could have been reached through play.
    pub fn validate(&self) -> Result<(), RestoreError> {
        BoardInvariants::check_all(&self.board).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            RestoreError::Corrupt(descriptions)
        })?;

        let seated = [self.hound_player, self.hare_player]
            .iter()
            .filter(|p| p.is_some())
            .count();
        match (self.state, seated) {
            (MatchState::WaitingForSecondPlayer, 1) => {}
            (MatchState::WaitingForSecondPlayer, n) => {
                return Err(RestoreError::Corrupt(format!(
                    "waiting match has {n} seated players"
                )));
            }
            (_, 2) => {}
            (state, n) => {
                return Err(RestoreError::Corrupt(format!(
                    "{state} match has {n} seated players"
                )));
            }
        }
        if seated == 2 && self.hound_player == self.hare_player {
            return Err(RestoreError::Corrupt(
                "one player holds both seats".to_string(),
            ));
        }

        if self.ledger.count(&self.board.fingerprint()) == 0 {
            return Err(RestoreError::Corrupt(
                "current placement missing from ledger".to_string(),
            ));
        }
        if let Some((fingerprint, count)) =
            self.ledger.iter().find(|(_, c)| *c > STALLING_REPETITIONS)
        {
            return Err(RestoreError::Corrupt(format!(
                "placement {fingerprint} seen {count} times"
            )));
        }

        self.validate_verdict()
    }

    /// Checks that the stored state is the one the win rules give for this
    /// board and ledger.
    fn validate_verdict(&self) -> Result<(), RestoreError> {
        let stalled = rules::is_stalled(&self.ledger);
        let escaped = rules::has_hare_escaped(&self.board);
        let consistent = match self.state {
            MatchState::WaitingForSecondPlayer => {
                self.board == Board::new() && self.ledger.len() == 1
            }
            // The side to move is the complement of the last mover.
            MatchState::TurnHound => {
                rules::evaluate(&self.board, &self.ledger, PieceKind::Hare, self.state)
                    == self.state
            }
            MatchState::TurnHare => {
                rules::evaluate(&self.board, &self.ledger, PieceKind::Hound, self.state)
                    == self.state
            }
            MatchState::WinHound => {
                rules::is_hare_trapped(&self.board) && !escaped && !stalled
            }
            MatchState::WinHareByEscape => escaped && !stalled,
            MatchState::WinHareByStalling => stalled,
        };

        if consistent {
            Ok(())
        } else {
            warn!(id = %self.id, state = %self.state, "Stored state disagrees with board");
            Err(RestoreError::Corrupt(format!(
                "{} does not follow from the board and ledger",
                self.state
            )))
        }
    }
}

/// Error returned when a stored match cannot be restored.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RestoreError {
    /// The record is not a serialized match.
    #[display("Malformed match record: {}", _0)]
    Malformed(String),

    /// The record parses but describes an unreachable match.
    #[display("Corrupt match record: {}", _0)]
    Corrupt(String),
}

impl std::error::Error for RestoreError {}
