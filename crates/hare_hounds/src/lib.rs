//! Hare and Hounds rules engine.
//!
//! Pure game logic with no I/O: the 11-node board, move validation,
//! the match state machine and the three win conditions.
//!
//! # Architecture
//!
//! - **Topology**: which grid cells are nodes and which pairs are one step apart
//! - **Board**: the hare and three hounds, with occupancy derived from them
//! - **Contracts**: the ordered legality checks for a proposed move
//! - **Rules**: trap, escape and stalling detection
//! - **Match**: seats, turn alternation and terminal states
//!
//! # Example
//!
//! ```
//! use hare_hounds::{Match, MatchId, MatchState, Move, PieceKind, PlayerId, Position};
//!
//! let mut game = Match::create(MatchId::new(0), PieceKind::Hound, PlayerId::new(0));
//! assert_eq!(game.join(PlayerId::new(1)), Ok(PieceKind::Hare));
//!
//! let opening = Move::new(PlayerId::new(0), Position::new(0, 1), Position::new(1, 1));
//! assert_eq!(game.apply_move(&opening), Ok(MatchState::TurnHare));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
pub mod contracts;
mod game;
mod ids;
pub mod invariants;
mod ledger;
mod piece;
mod position;
pub mod rules;
mod state;
pub mod topology;

pub use action::{IllegalMove, JoinError, Move, MoveError};
pub use board::{Board, HARE_START, HOUND_STARTS, Occupancy};
pub use game::{Match, RestoreError};
pub use ids::{MatchId, PlayerId};
pub use ledger::{Fingerprint, RepetitionLedger};
pub use piece::{Piece, PieceKind};
pub use position::Position;
pub use state::MatchState;
