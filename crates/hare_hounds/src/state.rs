//! Match states.

use crate::PieceKind;
use serde::{Deserialize, Serialize};

/// Where a match is in its lifecycle.
///
/// A match starts in [`MatchState::WaitingForSecondPlayer`], alternates
/// between the two turn states once both seats are filled, and ends in one
/// of the three win states.
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
pub enum MatchState {
    /// One seat is still empty.
    WaitingForSecondPlayer,
    /// The hounds move next.
    TurnHound,
    /// The hare moves next.
    TurnHare,
    /// No hound is left between the hare and rank 0.
    WinHareByEscape,
    /// A placement occurred for the third time.
    WinHareByStalling,
    /// The hare has no empty neighbour.
    WinHound,
}

impl MatchState {
    /// The turn state for the given mover.
    pub fn turn_of(kind: PieceKind) -> Self {
        match kind {
            PieceKind::Hound => MatchState::TurnHound,
            PieceKind::Hare => MatchState::TurnHare,
        }
    }

    /// Whose turn it is, if a turn is active.
    pub fn turn(self) -> Option<PieceKind> {
        match self {
            MatchState::TurnHound => Some(PieceKind::Hound),
            MatchState::TurnHare => Some(PieceKind::Hare),
            _ => None,
        }
    }

    /// Returns true for the three win states.
    pub fn is_terminal(self) -> bool {
        self.winner().is_some()
    }

    /// The winning side, for win states.
    pub fn winner(self) -> Option<PieceKind> {
        match self {
            MatchState::WinHareByEscape | MatchState::WinHareByStalling => Some(PieceKind::Hare),
            MatchState::WinHound => Some(PieceKind::Hound),
            _ => None,
        }
    }
}
