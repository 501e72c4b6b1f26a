//! Repetition tracking.

use crate::Board;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Canonical key for a placement of the four pieces.
///
/// The hounds are interchangeable, so their squares are sorted before
/// encoding; the hare's square follows a `|`. Each square is written as its
/// rank digit then its file digit, e.g. `01,10,12|41` for the starting layout.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Computes the fingerprint of a board.
    pub fn of(board: &Board) -> Self {
        let mut hounds: Vec<_> = board.hounds().iter().map(|p| p.position()).collect();
        hounds.sort();

        let hounds = hounds
            .iter()
            .map(|p| format!("{}{}", p.rank, p.file))
            .collect::<Vec<_>>()
            .join(",");
        let hare = board.hare().position();

        Self(format!("{hounds}|{}{}", hare.rank, hare.file))
    }

    /// The encoded key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Occurrence counts of every placement seen in a match.
///
/// Entries are only ever added or incremented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepetitionLedger {
    counts: BTreeMap<Fingerprint, u32>,
}

impl RepetitionLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more occurrence of `fingerprint` and returns the new total.
    #[instrument(level = "debug", skip(self), fields(fingerprint = %fingerprint))]
    pub fn record(&mut self, fingerprint: Fingerprint) -> u32 {
        let count = self.counts.entry(fingerprint).or_insert(0);
        *count += 1;
        debug!(count = *count, "Position recorded");
        *count
    }

    /// How often `fingerprint` has occurred.
    pub fn count(&self, fingerprint: &Fingerprint) -> u32 {
        self.counts.get(fingerprint).copied().unwrap_or(0)
    }

    /// Returns true if some placement has occurred exactly `times` times.
    pub fn any_count_equals(&self, times: u32) -> bool {
        self.counts.values().any(|&c| c == times)
    }

    /// Number of distinct placements seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over placements and their counts in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, u32)> {
        self.counts.iter().map(|(k, &v)| (k, v))
    }
}
