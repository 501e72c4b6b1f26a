//! Moves and the ways they can be rejected.
//!
//! A move is a request, not a side effect: it names who is acting and which
//! square to move from and to. [`crate::Match::apply_move`] decides whether
//! it happens.

use crate::{MatchState, PieceKind, PlayerId, Position};
use serde::{Deserialize, Serialize};

/// A request to move one piece one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The acting player.
    pub player: PlayerId,
    /// Square the piece stands on.
    pub from: Position,
    /// Square the piece should end on.
    pub to: Position,
}

impl Move {
    /// Creates a move.
    pub fn new(player: PlayerId, from: Position, to: Position) -> Self {
        Self { player, from, to }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}: {} -> {}", self.player, self.from, self.to)
    }
}

/// Why a move broke the rules of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum IllegalMove {
    /// A coordinate is not one of the 11 board nodes.
    #[display("{} is not a board node", _0)]
    OffBoard(Position),

    /// A hound tried to move toward rank 0.
    #[display("Hounds cannot move backwards")]
    HoundRetreat,

    /// The destination already holds a piece.
    #[display("Square {} is already occupied", _0)]
    Occupied(Position),

    /// The destination is not one step away along a board line.
    #[display("Move is not a single step along a board line")]
    NotASingleStep,

    /// Nothing stands on the origin square.
    #[display("No piece stands on {}", _0)]
    NoPiece(Position),

    /// The piece on the origin square belongs to the opponent.
    #[display("The piece on {} belongs to the opponent", _0)]
    NotYourPiece(Position),

    /// The match has already been decided.
    #[display("Game is already over ({})", _0)]
    GameOver(MatchState),
}

impl IllegalMove {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            IllegalMove::OffBoard(_) => "OFF_BOARD",
            IllegalMove::HoundRetreat => "HOUND_RETREAT",
            IllegalMove::Occupied(_) => "OCCUPIED",
            IllegalMove::NotASingleStep => "NOT_A_SINGLE_STEP",
            IllegalMove::NoPiece(_) => "NO_PIECE",
            IllegalMove::NotYourPiece(_) => "NOT_YOUR_PIECE",
            IllegalMove::GameOver(_) => "GAME_OVER",
        }
    }
}

impl std::error::Error for IllegalMove {}

/// Error returned when a move is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The player is not seated in this match, or no turn is active yet.
    #[display("Player {} cannot move in this match", _0)]
    InvalidPlayer(PlayerId),

    /// The player is seated but it is the opponent's turn.
    #[display("It is the {}'s turn", expected)]
    IncorrectTurn {
        /// The kind whose turn it actually is.
        expected: PieceKind,
    },

    /// The move breaks a board rule.
    #[display("Illegal move: {}", _0)]
    IllegalMove(IllegalMove),
}

impl From<IllegalMove> for MoveError {
    fn from(reason: IllegalMove) -> Self {
        MoveError::IllegalMove(reason)
    }
}

impl std::error::Error for MoveError {}

/// Error returned when a player cannot join a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum JoinError {
    /// Both seats are already filled.
    #[display("Both seats are already taken")]
    AlreadyJoined,
}

impl std::error::Error for JoinError {}
