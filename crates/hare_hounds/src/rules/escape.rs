//! Hare escape detection.

use crate::Board;
use tracing::instrument;

/// Returns true if no hound stands on a lower rank than the hare.
///
/// Hounds cannot retreat, so once the hare has every hound level with or
/// behind it nothing can get between it and rank 0 again.
#[instrument(skip(board), fields(hare = %board.hare().position()))]
pub fn has_hare_escaped(board: &Board) -> bool {
    let hare_rank = board.hare().position().rank;
    board
        .hounds()
        .iter()
        .all(|hound| hound.position().rank >= hare_rank)
}
