// ⚖️ Reconciliation Engine - ABOR vs IBOR position comparison
//
// Pipeline (strictly forward, no feedback):
//   raw text → records → matched universe → per-instrument diffs
//            → exceptions + totals
//
// The pipeline is a pure function of its two input texts and a threshold
// fraction: no I/O, no shared state, safe to invoke concurrently with
// different inputs.

use crate::aggregate::{aggregate, Totals};
use crate::classifier::{classify, resolve_threshold, total_book_value};
use crate::diff::{compute_rows, ReconciliationRow};
use crate::matcher::{unify, PositionBook};
use crate::parser::parse_positions;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// RECONCILIATION RESULT
// ============================================================================

/// Aggregate output of one reconciliation run. Nothing here is mutated
/// after creation and nothing persists beyond the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// One row per instrument in the union of both books, ascending.
    pub rows: Vec<ReconciliationRow>,
    /// Rows whose |diffNotional| meets or exceeds the resolved threshold.
    pub exceptions: Vec<ReconciliationRow>,
    pub totals: Totals,
    /// Data-quality notes (duplicate source rows and the like).
    pub notes: Vec<String>,
}

impl ReconciliationResult {
    pub fn has_exceptions(&self) -> bool {
        !self.exceptions.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} instruments, {} exceptions, net diff {:.2} against threshold {:.2}",
            self.rows.len(),
            self.totals.exceptions_count,
            self.totals.total_diff_notional,
            self.totals.threshold
        )
    }
}

// ============================================================================
// RECONCILIATION ENGINE
// ============================================================================

pub struct ReconciliationEngine {
    /// Materiality threshold as a fraction of reference book value
    /// (default: 0.01 = 1%).
    pub threshold_fraction: f64,
}

impl ReconciliationEngine {
    pub fn new() -> Self {
        ReconciliationEngine {
            threshold_fraction: 0.01,
        }
    }

    pub fn with_threshold_fraction(threshold_fraction: f64) -> Self {
        ReconciliationEngine { threshold_fraction }
    }

    /// Reconcile two position CSVs.
    ///
    /// Never fails for any input shape: malformed rows are dropped, bad
    /// numerics zero-filled, and empty text simply yields an empty result.
    /// Callers wanting boundary validation use [`reconcile_checked`].
    ///
    /// [`reconcile_checked`]: ReconciliationEngine::reconcile_checked
    ///
    /// # Example
    /// ```
    /// use position_recon::ReconciliationEngine;
    ///
    /// let engine = ReconciliationEngine::new();
    /// let result = engine.reconcile(
    ///     "instrument,qty,price\nTSLA,50,250.10\n",
    ///     "instrument,qty,price\nTSLA,40,260.00\n",
    /// );
    /// assert_eq!(result.rows.len(), 1);
    /// assert_eq!(result.rows[0].diff_notional, 2105.00);
    /// assert!(result.has_exceptions());
    /// ```
    pub fn reconcile(&self, abor_text: &str, ibor_text: &str) -> ReconciliationResult {
        let abor_records = parse_positions(abor_text);
        let ibor_records = parse_positions(ibor_text);

        // Reference book value comes from the raw ABOR records, before the
        // last-row-wins collapse and before any price fallback
        let book_value = total_book_value(&abor_records);

        let abor = PositionBook::from_records(abor_records);
        let ibor = PositionBook::from_records(ibor_records);

        let universe = unify(&abor, &ibor);
        let rows = compute_rows(&universe, &abor, &ibor);

        let threshold = resolve_threshold(book_value, self.threshold_fraction);
        let exceptions = classify(&rows, threshold);
        let totals = aggregate(&rows, &exceptions, book_value, threshold);

        let mut notes = Vec::new();
        push_duplicate_note(&mut notes, "ABOR", &abor);
        push_duplicate_note(&mut notes, "IBOR", &ibor);

        ReconciliationResult {
            rows,
            exceptions,
            totals,
            notes,
        }
    }

    /// Boundary wrapper: rejects empty ABOR or IBOR text before the core
    /// runs. The computation itself is unchanged.
    pub fn reconcile_checked(
        &self,
        abor_text: &str,
        ibor_text: &str,
    ) -> Result<ReconciliationResult> {
        if abor_text.trim().is_empty() {
            bail!("ABOR input is empty: paste or load the accounting book CSV");
        }
        if ibor_text.trim().is_empty() {
            bail!("IBOR input is empty: paste or load the investment book CSV");
        }
        Ok(self.reconcile(abor_text, ibor_text))
    }
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Surface duplicate source rows as a data-quality note. The last-row-wins
/// overwrite itself is preserved unchanged.
fn push_duplicate_note(notes: &mut Vec<String>, side: &str, book: &PositionBook) {
    if book.has_duplicates() {
        let instruments: Vec<&str> = book.duplicates().collect();
        notes.push(format!(
            "{} contains duplicate rows for {} (last row kept)",
            side,
            instruments.join(", ")
        ));
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ABOR: &str = "instrument,qty,price\nAAPL,100,195.3\nTSLA,50,250.1\nMSFT,75,410.2\n";
    const IBOR: &str = "instrument,qty,price\nAAPL,100,195.3\nTSLA,40,260.0\nMSFT,80,409.7\n";

    #[test]
    fn test_reconcile_example_books() {
        let engine = ReconciliationEngine::new();
        let result = engine.reconcile(ABOR, IBOR);

        assert_eq!(result.rows.len(), 3);
        // AUM = 19530 + 12505 + 30765 = 62800
        assert_eq!(result.totals.aum_approx, 62800.00);
        assert_eq!(result.totals.threshold, 628.00);

        let tsla = &result.rows[2];
        assert_eq!(tsla.instrument, "TSLA");
        assert_eq!(tsla.diff_qty, 10.0);
        assert_eq!(tsla.diff_notional, 2105.00);

        let msft = &result.rows[1];
        assert_eq!(msft.diff_notional, -2011.00);

        // Both the MSFT and TSLA breaks clear the 1% threshold
        assert_eq!(result.exceptions.len(), 2);
        assert_eq!(result.exceptions[0].instrument, "MSFT");
        assert_eq!(result.exceptions[1].instrument, "TSLA");
        assert_eq!(result.totals.exceptions_count, 2);
        assert_eq!(result.totals.total_diff_notional, 94.00);
        assert!(result.notes.is_empty());
    }

    #[test]
    fn test_identical_books_reconcile_clean() {
        let engine = ReconciliationEngine::new();
        let result = engine.reconcile(
            "instrument,qty,price\nAAPL,100,195.30\n",
            "instrument,qty,price\nAAPL,100,195.30\n",
        );

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].diff_notional, 0.0);
        assert!(!result.has_exceptions());
        assert_eq!(result.totals.total_diff_notional, 0.0);
    }

    #[test]
    fn test_idempotence() {
        let engine = ReconciliationEngine::new();

        let first = engine.reconcile(ABOR, IBOR);
        let second = engine.reconcile(ABOR, IBOR);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_universe_symmetry_and_ordering() {
        let engine = ReconciliationEngine::new();
        let result = engine.reconcile(
            "instrument,qty,price\nTSLA,50,250.10\nAAPL,100,195.30\n",
            "instrument,qty,price\nMSFT,75,410.20\nTSLA,40,260.00\n",
        );

        // Every instrument from either side appears exactly once
        assert_eq!(result.rows.len(), 3);
        let names: Vec<&str> = result.rows.iter().map(|r| r.instrument.as_str()).collect();
        assert_eq!(names, vec!["AAPL", "MSFT", "TSLA"]);
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_one_sided_instrument_included() {
        let engine = ReconciliationEngine::new();
        let result = engine.reconcile(
            "instrument,qty,price\nSPX_Option_Call_4500,10,12.50\n",
            "instrument,qty,price\nAAPL,100,195.30\n",
        );

        assert_eq!(result.rows.len(), 2);
        let spx = &result.rows[1];
        assert_eq!(spx.instrument, "SPX_Option_Call_4500");
        assert_eq!(spx.ibor_qty, 0.0);
        assert_eq!(spx.ibor_notional, 0.0);
    }

    #[test]
    fn test_zero_threshold_fraction_flags_nonzero_diffs() {
        let engine = ReconciliationEngine::with_threshold_fraction(0.0);
        let result = engine.reconcile(ABOR, IBOR);

        assert_eq!(result.totals.threshold, 0.00);
        // |0| >= 0 too: every row is an exception at a zero threshold
        assert_eq!(result.exceptions.len(), result.rows.len());
    }

    #[test]
    fn test_zero_book_value_degenerate_threshold() {
        let engine = ReconciliationEngine::new();
        let result = engine.reconcile(
            "instrument,qty,price\nCDS_IBM_5Y,5,0\n",
            "instrument,qty,price\nCDS_IBM_5Y,3,101.25\n",
        );

        assert_eq!(result.totals.aum_approx, 0.0);
        assert_eq!(result.totals.threshold, 0.0);
        // ABOR priced off IBOR's quote: 5*101.25 - 3*101.25 = 202.50
        assert_eq!(result.rows[0].diff_notional, 202.50);
        assert_eq!(result.exceptions.len(), 1);
    }

    #[test]
    fn test_totals_consistency() {
        let engine = ReconciliationEngine::new();
        let result = engine.reconcile(ABOR, IBOR);

        let summed: f64 = result.rows.iter().map(|r| r.diff_notional).sum();
        assert!((result.totals.total_diff_notional - summed).abs() < 0.005);
    }

    #[test]
    fn test_threshold_monotonicity_over_fractions() {
        let mut previous = usize::MAX;
        for fraction in [0.0, 0.001, 0.01, 0.1, 1.0] {
            let engine = ReconciliationEngine::with_threshold_fraction(fraction);
            let count = engine.reconcile(ABOR, IBOR).exceptions.len();
            assert!(count <= previous);
            previous = count;
        }
    }

    #[test]
    fn test_duplicate_rows_surface_note() {
        let engine = ReconciliationEngine::new();
        let result = engine.reconcile(
            "instrument,qty,price\nAAPL,100,195.30\nAAPL,90,196.00\n",
            IBOR,
        );

        assert_eq!(result.notes.len(), 1);
        assert!(result.notes[0].contains("ABOR"));
        assert!(result.notes[0].contains("AAPL"));

        // Overwrite semantics unchanged: last AAPL row wins
        let aapl = result.rows.iter().find(|r| r.instrument == "AAPL").unwrap();
        assert_eq!(aapl.abor_qty, 90.0);
    }

    #[test]
    fn test_reconcile_checked_rejects_empty_input() {
        let engine = ReconciliationEngine::new();

        assert!(engine.reconcile_checked("", IBOR).is_err());
        assert!(engine.reconcile_checked(ABOR, "  \n ").is_err());
        assert!(engine.reconcile_checked(ABOR, IBOR).is_ok());
    }

    #[test]
    fn test_summary() {
        let engine = ReconciliationEngine::new();
        let result = engine.reconcile(ABOR, IBOR);

        let summary = result.summary();
        assert!(summary.contains("3 instruments"));
        assert!(summary.contains("2 exceptions"));
    }
}
