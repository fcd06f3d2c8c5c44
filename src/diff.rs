// ⚖️ Difference Calculator - per-instrument quantity and notional breaks
//
// Pricing fallback rule: if a side's record is missing or carries a zero
// price, the other side's price is used for that side's notional. This
// avoids phantom full-notional breaks purely because one side omitted a
// price field (common for derivatives quoted at zero).

use crate::matcher::PositionBook;
use serde::{Deserialize, Serialize};

// ============================================================================
// RECONCILIATION ROW
// ============================================================================

/// One instrument's reconciliation line across both books.
///
/// Serialized in camelCase to match the wire format consumed downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationRow {
    pub instrument: String,
    pub abor_qty: f64,
    pub ibor_qty: f64,
    pub diff_qty: f64,
    pub abor_notional: f64,
    pub ibor_notional: f64,
    pub diff_notional: f64,
}

impl ReconciliationRow {
    /// True when quantity and notional both agree across the books.
    pub fn is_clean(&self) -> bool {
        self.diff_qty == 0.0 && self.diff_notional == 0.0
    }
}

// ============================================================================
// COMPUTATION
// ============================================================================

/// Round to 2 decimal places for display-grade precision. Aggregation sums
/// the already-rounded row-level diffs rather than re-deriving from raw
/// floats, matching the source system's totals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Nonzero-or-fallback price selection: own price if set, otherwise the
/// opposite side's, otherwise zero.
fn effective_price(own: f64, other: f64) -> f64 {
    if own != 0.0 {
        own
    } else if other != 0.0 {
        other
    } else {
        0.0
    }
}

/// Compute one reconciliation row. A side with no record for the instrument
/// is treated as a zero-quantity, zero-price record.
pub fn compute_row(
    instrument: &str,
    abor: &PositionBook,
    ibor: &PositionBook,
) -> ReconciliationRow {
    let (abor_qty, abor_price) = abor
        .get(instrument)
        .map(|r| (r.qty, r.price))
        .unwrap_or((0.0, 0.0));
    let (ibor_qty, ibor_price) = ibor
        .get(instrument)
        .map(|r| (r.qty, r.price))
        .unwrap_or((0.0, 0.0));

    let abor_notional = abor_qty * effective_price(abor_price, ibor_price);
    let ibor_notional = ibor_qty * effective_price(ibor_price, abor_price);

    ReconciliationRow {
        instrument: instrument.to_string(),
        abor_qty,
        ibor_qty,
        diff_qty: abor_qty - ibor_qty,
        abor_notional: round2(abor_notional),
        ibor_notional: round2(ibor_notional),
        // Rounded from the raw subtraction, not from the rounded notionals
        diff_notional: round2(abor_notional - ibor_notional),
    }
}

/// Compute the full row set for a unified instrument universe. Row order
/// follows the universe order (ascending by instrument).
pub fn compute_rows(
    instruments: &[String],
    abor: &PositionBook,
    ibor: &PositionBook,
) -> Vec<ReconciliationRow> {
    instruments
        .iter()
        .map(|instrument| compute_row(instrument, abor, ibor))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
