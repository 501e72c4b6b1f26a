//! Win conditions.
//!
//! Each rule is a pure function over the board or the repetition ledger.
//! [`evaluate`] runs them after every completed move in a fixed order, with
//! a later verdict overwriting an earlier one:
//!
//! 1. trap (only after a hound move) gives [`MatchState::WinHound`]
//! 2. escape gives [`MatchState::WinHareByEscape`]
//! 3. stalling gives [`MatchState::WinHareByStalling`]

pub mod escape;
pub mod stalling;
pub mod trap;

pub use escape::has_hare_escaped;
pub use stalling::{STALLING_REPETITIONS, is_stalled};
pub use trap::{TRAPS, is_hare_trapped};

use crate::{Board, MatchState, PieceKind, RepetitionLedger};
use tracing::{info, instrument};

/// Decides the state after a move.
///
/// `provisional` is the state the turn toggle produced; it is returned
/// unchanged when no win condition holds.
#[instrument(skip(board, ledger))]
pub fn evaluate(
    board: &Board,
    ledger: &RepetitionLedger,
    mover: PieceKind,
    provisional: MatchState,
) -> MatchState {
    let mut state = provisional;

    if mover == PieceKind::Hound && is_hare_trapped(board) {
        state = MatchState::WinHound;
    }
    if has_hare_escaped(board) {
        state = MatchState::WinHareByEscape;
    }
    if is_stalled(ledger) {
        state = MatchState::WinHareByStalling;
    }

    if state.is_terminal() {
        info!(%state, "Match decided");
    }
    state
}
