//! Repetition detection.

use crate::RepetitionLedger;

/// Occurrences of one placement that end the match in the hare's favour.
pub const STALLING_REPETITIONS: u32 = 3;

/// Returns true if some placement has been seen exactly
/// [`STALLING_REPETITIONS`] times.
///
/// The check is exact rather than "at least": the match ends the moment a
/// count reaches the limit, so no count can pass it in live play.
pub fn is_stalled(ledger: &RepetitionLedger) -> bool {
    ledger.any_count_equals(STALLING_REPETITIONS)
}
