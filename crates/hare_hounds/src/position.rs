//! Grid coordinates.

use serde::{Deserialize, Serialize};

/// A cell on the 5x3 grid the board is drawn on.
///
/// `rank` runs 0-4 from the hounds' home end to the hare's, `file` runs 0-2.
/// A position is just a coordinate pair: it may name a cell that is not a
/// board node (see [`crate::topology::is_node`]), which is how off-board
/// requests are represented before validation rejects them.
///
/// On the wire rank is `x` and file is `y`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    /// Row, 0 (hound end) to 4 (hare end).
    #[serde(rename = "x")]
    pub rank: i32,
    /// Column, 0 to 2.
    #[serde(rename = "y")]
    pub file: i32,
}

impl Position {
    /// Creates a position from a rank and file.
    pub const fn new(rank: i32, file: i32) -> Self {
        Self { rank, file }
    }

    /// Sum of the coordinates. Its parity decides whether diagonals leave this cell.
    ///
    /// Wraps on overflow, which keeps the parity intact.
    pub const fn parity_sum(self) -> i32 {
        self.rank.wrapping_add(self.file)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.rank, self.file)
    }
}

impl From<(i32, i32)> for Position {
    fn from((rank, file): (i32, i32)) -> Self {
        Self::new(rank, file)
    }
}
