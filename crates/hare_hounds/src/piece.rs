//! Piece kinds and pieces.

use crate::Position;
use serde::{Deserialize, Serialize};

/// The two roles in the game. Each player controls every piece of one kind.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PieceKind {
    /// The single hare, trying to slip past the hounds.
    Hare,
    /// One of the three hounds, trying to corner the hare.
    Hound,
}

impl PieceKind {
    /// Returns the other kind.
    pub fn complement(self) -> Self {
        match self {
            PieceKind::Hare => PieceKind::Hound,
            PieceKind::Hound => PieceKind::Hare,
        }
    }

    /// Single-character symbol used when drawing the board.
    pub fn symbol(self) -> char {
        match self {
            PieceKind::Hare => 'H',
            PieceKind::Hound => 'D',
        }
    }
}

/// A piece standing on the board.
///
/// Serialized as `{"pieceType": "HOUND", "x": 1, "y": 0}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    #[serde(rename = "pieceType")]
    kind: PieceKind,
    #[serde(flatten)]
    position: Position,
}

impl Piece {
    /// Creates a piece of the given kind at a position.
    pub const fn new(kind: PieceKind, position: Position) -> Self {
        Self { kind, position }
    }

    /// Returns the piece kind.
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns where the piece stands.
    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn move_to(&mut self, to: Position) {
        self.position = to;
    }
}
