//! Hound win detection.

use crate::{Board, Position};
use tracing::instrument;

/// The only squares where the hare can be cornered, each paired with the
/// three neighbours that must all be occupied to trap it there.
pub const TRAPS: [(Position, [Position; 3]); 3] = [
    (
        Position::new(4, 1),
        [Position::new(3, 0), Position::new(3, 1), Position::new(3, 2)],
    ),
    (
        Position::new(2, 0),
        [Position::new(1, 0), Position::new(2, 1), Position::new(3, 0)],
    ),
    (
        Position::new(2, 2),
        [Position::new(1, 2), Position::new(2, 1), Position::new(3, 2)],
    ),
];

/// Returns true if the hare stands on a trap square with every exit blocked.
#[instrument(skip(board), fields(hare = %board.hare().position()))]
pub fn is_hare_trapped(board: &Board) -> bool {
    let hare = board.hare().position();
    let occupancy = board.occupancy();
    TRAPS
        .iter()
        .find(|(square, _)| *square == hare)
        .is_some_and(|(_, exits)| occupancy.all_occupied(exits))
}
