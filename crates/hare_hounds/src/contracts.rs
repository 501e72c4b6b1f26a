//! Contract-based move validation.
//!
//! Each board rule is a small struct with a `check` function. [`LegalMove`]
//! composes them in a fixed order, and [`MoveContract`] pairs that
//! precondition with a postcondition over the resulting board:
//! `{LegalMove} relocate {BoardInvariants ∧ one piece moved}`.

use crate::invariants::{BoardInvariants, InvariantSet, InvariantViolation};
use crate::{Board, IllegalMove, PieceKind, Position, topology};
use tracing::{instrument, warn};

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), IllegalMove>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), InvariantViolation>;
}

/// One piece of the given kind stepping from one square to another.
///
/// This is what the board rules see once turn ownership is settled; the
/// player id has already been resolved to a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Kind of the moving side.
    pub mover: PieceKind,
    /// Origin square.
    pub from: Position,
    /// Destination square.
    pub to: Position,
}

impl Step {
    /// Creates a step.
    pub fn new(mover: PieceKind, from: Position, to: Position) -> Self {
        Self { mover, from, to }
    }
}

/// Precondition: both squares are board nodes.
pub struct NodesOnBoard;

impl NodesOnBoard {
    /// Rejects the first coordinate that is not one of the 11 nodes.
    #[instrument(level = "trace")]
    pub fn check(step: &Step) -> Result<(), IllegalMove> {
        [step.from, step.to]
            .into_iter()
            .find(|&p| !topology::is_node(p))
            .map_or(Ok(()), |p| Err(IllegalMove::OffBoard(p)))
    }
}

/// Precondition: hounds never move toward rank 0.
pub struct HoundNeverRetreats;

impl HoundNeverRetreats {
    /// Rejects a hound step that lowers its rank.
    #[instrument(level = "trace")]
    pub fn check(step: &Step) -> Result<(), IllegalMove> {
        if step.mover == PieceKind::Hound && step.to.rank < step.from.rank {
            Err(IllegalMove::HoundRetreat)
        } else {
            Ok(())
        }
    }
}

/// Precondition: nothing stands on the destination.
pub struct DestinationEmpty;

impl DestinationEmpty {
    /// Rejects a step onto an occupied square.
    #[instrument(level = "trace", skip(board))]
    pub fn check(step: &Step, board: &Board) -> Result<(), IllegalMove> {
        if board.occupancy().is_occupied(step.to) {
            Err(IllegalMove::Occupied(step.to))
        } else {
            Ok(())
        }
    }
}

/// Precondition: the destination is one step along a board line.
pub struct SingleStep;

impl SingleStep {
    /// Rejects jumps and diagonals from even-parity cells.
    #[instrument(level = "trace")]
    pub fn check(step: &Step) -> Result<(), IllegalMove> {
        if topology::is_single_step(step.from, step.to) {
            Ok(())
        } else {
            Err(IllegalMove::NotASingleStep)
        }
    }
}

/// Precondition: a piece of the mover's own kind stands on the origin.
pub struct OwnPieceAtOrigin;

impl OwnPieceAtOrigin {
    /// Rejects an empty origin or one holding the opponent's piece.
    #[instrument(level = "trace", skip(board))]
    pub fn check(step: &Step, board: &Board) -> Result<(), IllegalMove> {
        match board.piece_at(step.from) {
            None => Err(IllegalMove::NoPiece(step.from)),
            Some(piece) if piece.kind() != step.mover => Err(IllegalMove::NotYourPiece(step.from)),
            Some(_) => Ok(()),
        }
    }
}

/// Composite precondition: every board rule, in order.
pub struct LegalMove;

impl LegalMove {
    /// Validates a step, reporting the first rule it breaks.
    #[instrument(skip(board))]
    pub fn check(step: &Step, board: &Board) -> Result<(), IllegalMove> {
        NodesOnBoard::check(step)?;
        HoundNeverRetreats::check(step)?;
        DestinationEmpty::check(step, board)?;
        SingleStep::check(step)?;
        OwnPieceAtOrigin::check(step, board)?;
        Ok(())
    }
}

/// Contract for relocating a piece.
///
/// Preconditions: [`LegalMove`].
///
/// Postconditions:
/// - [`BoardInvariants`] hold on the new board
/// - exactly one piece changed square
pub struct MoveContract;

impl Contract<Board, Step> for MoveContract {
    fn pre(board: &Board, step: &Step) -> Result<(), IllegalMove> {
        LegalMove::check(step, board)
    }

    fn post(before: &Board, after: &Board) -> Result<(), InvariantViolation> {
        BoardInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            InvariantViolation::new(format!("Postcondition failed: {descriptions}"))
        })?;

        let moved = before
            .pieces()
            .iter()
            .zip(after.pieces())
            .filter(|(b, a)| b.position() != a.position())
            .count();
        if moved != 1 {
            warn!(moved, "Move changed an unexpected number of pieces");
            return Err(InvariantViolation::new(format!(
                "Postcondition failed: {moved} pieces moved, expected 1"
            )));
        }
        Ok(())
    }
}
