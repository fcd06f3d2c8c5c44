// 📊 Aggregator - summary totals for a reconciliation run

use crate::diff::{round2, ReconciliationRow};
use serde::{Deserialize, Serialize};

/// Summary block attached to every reconciliation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Approximate AUM: the raw reference book value, display-rounded.
    pub aum_approx: f64,
    /// Sum of the already-rounded row-level diffs, rounded again.
    pub total_diff_notional: f64,
    pub exceptions_count: usize,
    /// The resolved absolute threshold value.
    pub threshold: f64,
}

/// Produce the totals block. `total_book_value` and `threshold` arrive
/// unrounded; rounding here is display-grade only.
pub fn aggregate(
    rows: &[ReconciliationRow],
    exceptions: &[ReconciliationRow],
    total_book_value: f64,
    threshold: f64,
) -> Totals {
    let total_diff_notional: f64 = rows.iter().map(|r| r.diff_notional).sum();

    Totals {
        aum_approx: round2(total_book_value),
        total_diff_notional: round2(total_diff_notional),
        exceptions_count: exceptions.len(),
        threshold: round2(threshold),
    }
}

// ============================================================================
// TESTS
// ============================================================================
