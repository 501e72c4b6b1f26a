//! First-class board invariants.
//!
//! Invariants are properties every reachable board satisfies. They are
//! checked after each move in debug builds and against every match restored
//! from storage, where a violation means the record is corrupt.

use crate::{Board, PieceKind, topology};
use std::collections::HashSet;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: slot 0 holds the hare and slots 1-3 hold hounds.
pub struct PieceRosterInvariant;

impl Invariant<Board> for PieceRosterInvariant {
    fn holds(board: &Board) -> bool {
        board.hare().kind() == PieceKind::Hare
            && board.hounds().len() == 3
            && board.hounds().iter().all(|p| p.kind() == PieceKind::Hound)
    }

    fn description() -> &'static str {
        "Exactly one hare followed by three hounds"
    }
}

/// Invariant: every piece stands on one of the 11 nodes.
pub struct OnBoardInvariant;

impl Invariant<Board> for OnBoardInvariant {
    fn holds(board: &Board) -> bool {
        board.pieces().iter().all(|p| topology::is_node(p.position()))
    }

    fn description() -> &'static str {
        "Every piece stands on a board node"
    }
}

/// Invariant: no two pieces share a square.
pub struct DistinctSquaresInvariant;

impl Invariant<Board> for DistinctSquaresInvariant {
    fn holds(board: &Board) -> bool {
        let squares: HashSet<_> = board.pieces().iter().map(|p| p.position()).collect();
        squares.len() == board.pieces().len()
    }

    fn description() -> &'static str {
        "No two pieces share a square"
    }
}

/// All board invariants as a composable set.
pub type BoardInvariants = (
    PieceRosterInvariant,
    OnBoardInvariant,
    DistinctSquaresInvariant,
);
