//! Board topology.
//!
//! The board is a 5x3 grid with the four corners cut away, leaving 11 nodes:
//!
//! ```text
//!     0   1   2
//! 0       o
//!       / | \
//! 1   o - o - o
//!     | \ | / |
//! 2   o - o - o
//!     | / | \ |
//! 3   o - o - o
//!       \ | /
//! 4       o
//! ```
//!
//! Every line on the drawing is a single step. Orthogonal lines connect all
//! neighbouring nodes; diagonal lines only pass through nodes whose
//! coordinate sum is odd. That parity rule is the whole adjacency definition,
//! so no edge table is stored.

use crate::Position;
use tracing::instrument;

/// Number of ranks on the grid.
pub const RANKS: i32 = 5;

/// Number of files on the grid.
pub const FILES: i32 = 3;

/// The 11 board nodes in rank-major order.
pub const NODES: [Position; 11] = [
    Position::new(0, 1),
    Position::new(1, 0),
    Position::new(1, 1),
    Position::new(1, 2),
    Position::new(2, 0),
    Position::new(2, 1),
    Position::new(2, 2),
    Position::new(3, 0),
    Position::new(3, 1),
    Position::new(3, 2),
    Position::new(4, 1),
];

/// Returns true if the position is one of the 11 board nodes.
pub fn is_node(pos: Position) -> bool {
    let on_grid = (0..RANKS).contains(&pos.rank) && (0..FILES).contains(&pos.file);
    let end_rank = pos.rank == 0 || pos.rank == RANKS - 1;
    on_grid && !(end_rank && pos.file != 1)
}

/// Returns true if diagonal lines pass through this cell.
pub fn permits_diagonal(pos: Position) -> bool {
    pos.parity_sum().rem_euclid(2) == 1
}

/// Decides whether `to` is at most one step away from `from`.
///
/// Jumps of more than one cell on either axis are rejected. From an
/// even-parity cell only orthogonal steps are allowed; from an odd-parity cell
/// diagonal steps are allowed as well. A zero-length step passes; the
/// occupancy check is what rejects a piece "moving" onto its own square.
///
/// The verdict is the same for `(to, from)`: a diagonal step links two cells
/// of equal parity, so both ends agree on whether diagonals are allowed.
#[instrument(level = "trace")]
pub fn is_single_step(from: Position, to: Position) -> bool {
    let rank_delta = from.rank.abs_diff(to.rank);
    let file_delta = from.file.abs_diff(to.file);

    if rank_delta > 1 || file_delta > 1 {
        return false;
    }

    let step_cost = rank_delta + file_delta;
    if permits_diagonal(from) {
        step_cost <= 2
    } else {
        step_cost <= 1
    }
}

/// All board nodes one step away from `pos`.
pub fn neighbors(pos: Position) -> Vec<Position> {
    NODES
        .iter()
        .copied()
        .filter(|&node| node != pos && is_single_step(pos, node))
        .collect()
}
