// 🚩 Exception Classifier - materiality threshold resolution and flagging
//
// The threshold is a caller-supplied fraction of the reference (ABOR) book
// value. Book value is summed over the raw parsed records, duplicates
// included, using each record's own price even when zero. The fallback
// substitution in the difference calculator never feeds back into it.

use crate::diff::ReconciliationRow;
use crate::parser::PositionRecord;

/// Total reference book value: Σ qty × price over the raw ABOR records.
pub fn total_book_value(records: &[PositionRecord]) -> f64 {
    records.iter().map(|r| r.raw_notional()).sum()
}

/// Resolve the absolute materiality threshold from a fraction of book value.
///
/// A zero book value (all reference prices zero) yields a zero threshold,
/// making every nonzero break an exception. That degenerate case is accepted
/// behavior, not guarded against.
pub fn resolve_threshold(total_book_value: f64, threshold_fraction: f64) -> f64 {
    total_book_value * threshold_fraction
}

/// Flag the rows whose absolute notional break meets or exceeds the
/// resolved threshold. Returns clones so exceptions can be reported
/// independently of the full row set.
pub fn classify(rows: &[ReconciliationRow], threshold: f64) -> Vec<ReconciliationRow> {
    rows.iter()
        .filter(|row| row.diff_notional.abs() >= threshold)
        .cloned()
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
