//! Piece placement and derived occupancy.

use crate::topology::{self, FILES, RANKS};
use crate::{Fingerprint, Piece, PieceKind, Position};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Where the hare starts.
pub const HARE_START: Position = Position::new(4, 1);

/// Where the three hounds start, in piece-list order.
pub const HOUND_STARTS: [Position; 3] = [
    Position::new(0, 1),
    Position::new(1, 0),
    Position::new(1, 2),
];

/// The four pieces of a match.
///
/// The piece list is the single source of truth for what stands where:
/// index 0 is the hare, indices 1-3 are the hounds in creation order.
/// Occupancy is always derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    pieces: [Piece; 4],
}

impl Board {
    /// Creates the starting layout.
    pub fn new() -> Self {
        Self {
            pieces: [
                Piece::new(PieceKind::Hare, HARE_START),
                Piece::new(PieceKind::Hound, HOUND_STARTS[0]),
                Piece::new(PieceKind::Hound, HOUND_STARTS[1]),
                Piece::new(PieceKind::Hound, HOUND_STARTS[2]),
            ],
        }
    }

    /// Places a hare and three hounds directly.
    ///
    /// No legality is checked; use [`crate::invariants::BoardInvariants`] to
    /// validate a board built this way.
    pub fn with_positions(hare: Position, hounds: [Position; 3]) -> Self {
        Self {
            pieces: [
                Piece::new(PieceKind::Hare, hare),
                Piece::new(PieceKind::Hound, hounds[0]),
                Piece::new(PieceKind::Hound, hounds[1]),
                Piece::new(PieceKind::Hound, hounds[2]),
            ],
        }
    }

    /// All four pieces, hare first.
    pub fn pieces(&self) -> &[Piece; 4] {
        &self.pieces
    }

    /// The hare.
    pub fn hare(&self) -> Piece {
        self.pieces[0]
    }

    /// The three hounds.
    pub fn hounds(&self) -> &[Piece] {
        &self.pieces[1..]
    }

    /// Returns the piece standing on `pos`, if any.
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.pieces.iter().copied().find(|p| p.position() == pos)
    }

    /// Returns true if any piece stands on `pos`.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.piece_at(pos).is_some()
    }

    /// Projects the piece list onto the grid.
    pub fn occupancy(&self) -> Occupancy {
        let mut cells = [[false; FILES as usize]; RANKS as usize];
        for piece in &self.pieces {
            if let Some(cell) = Occupancy::cell(piece.position()) {
                cells[cell.0][cell.1] = true;
            }
        }
        Occupancy { cells }
    }

    /// Canonical key for the current placement.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(self)
    }

    /// Moves whatever stands on `from` to `to`.
    ///
    /// Returns false and leaves the board unchanged if `from` is empty.
    #[instrument(level = "debug", skip(self))]
    pub(crate) fn relocate(&mut self, from: Position, to: Position) -> bool {
        match self.pieces.iter_mut().find(|p| p.position() == from) {
            Some(piece) => {
                piece.move_to(to);
                true
            }
            None => false,
        }
    }

    /// Draws the board with `H` for the hare, `D` for hounds and `.` for empty nodes.
    pub fn display(&self) -> String {
        const LINKS: [&str; 4] = [
            "      / | \\",
            "    | \\ | / |",
            "    | / | \\ |",
            "      \\ | /",
        ];

        let mut out = String::from("    0   1   2\n");
        for rank in 0..RANKS {
            out.push_str(&format!("{rank}   "));
            for file in 0..FILES {
                let pos = Position::new(rank, file);
                let symbol = if !topology::is_node(pos) {
                    ' '
                } else {
                    self.piece_at(pos).map_or('.', |p| p.kind().symbol())
                };
                out.push(symbol);
                if file < FILES - 1 {
                    let next = Position::new(rank, file + 1);
                    if topology::is_node(pos) && topology::is_node(next) {
                        out.push_str(" - ");
                    } else {
                        out.push_str("   ");
                    }
                }
            }
            let trimmed = out.trim_end().len();
            out.truncate(trimmed);
            out.push('\n');
            if let Some(links) = LINKS.get(rank as usize) {
                out.push_str(links);
                out.push('\n');
            }
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Boolean projection of the pieces onto the 5x3 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupancy {
    cells: [[bool; FILES as usize]; RANKS as usize],
}

impl Occupancy {
    fn cell(pos: Position) -> Option<(usize, usize)> {
        let rank = usize::try_from(pos.rank).ok()?;
        let file = usize::try_from(pos.file).ok()?;
        (rank < RANKS as usize && file < FILES as usize).then_some((rank, file))
    }

    /// Returns true if a piece stands on `pos`. Cells off the grid are empty.
    pub fn is_occupied(&self, pos: Position) -> bool {
        Self::cell(pos).is_some_and(|(rank, file)| self.cells[rank][file])
    }

    /// Returns true if every listed position is occupied.
    pub fn all_occupied(&self, positions: &[Position]) -> bool {
        positions.iter().all(|&p| self.is_occupied(p))
    }

    /// Number of occupied cells.
    pub fn count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&c| c).count()
    }
}
