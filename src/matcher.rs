// 🔗 Instrument Matcher - unified instrument universe across both books
//
// A record set collapses to a mapping from instrument to the LAST record
// seen for that instrument. Duplicate rows overwrite earlier ones silently
// (a source quirk kept for compatibility); duplicates are tracked so the
// boundary can surface a data-quality note without changing the semantics.

use crate::parser::PositionRecord;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

// ============================================================================
// POSITION BOOK
// ============================================================================

/// One side of the reconciliation (ABOR or IBOR) keyed by instrument.
#[derive(Debug, Clone, Default)]
pub struct PositionBook {
    positions: BTreeMap<String, PositionRecord>,
    duplicates: BTreeSet<String>,
}

impl PositionBook {
    /// Collapse parsed records into a per-instrument book. Last row wins.
    pub fn from_records(records: Vec<PositionRecord>) -> Self {
        let mut book = PositionBook::default();

        for record in records {
            if book
                .positions
                .insert(record.instrument.clone(), record.clone())
                .is_some()
            {
                book.duplicates.insert(record.instrument);
            }
        }

        book
    }

    pub fn get(&self, instrument: &str) -> Option<&PositionRecord> {
        self.positions.get(instrument)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Instruments that appeared more than once in the source rows,
    /// ascending. The kept record is always the last one seen.
    pub fn duplicates(&self) -> impl Iterator<Item = &str> {
        self.duplicates.iter().map(|s| s.as_str())
    }

    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }

    fn instruments(&self) -> impl Iterator<Item = &str> {
        self.positions.keys().map(|s| s.as_str())
    }
}

// ============================================================================
// UNIFICATION
// ============================================================================

/// Build the set union of instrument identifiers from both books, in
/// ascending code-point order. The rest of the pipeline depends on this
/// ordering for deterministic, reviewable output. An instrument present on
/// only one side is still included; the missing side is treated downstream
/// as a zero-quantity record.
pub fn unify(abor: &PositionBook, ibor: &PositionBook) -> Vec<String> {
    let universe: BTreeSet<&str> = abor.instruments().chain(ibor.instruments()).collect();
    universe.into_iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn book(rows: &[(&str, f64, f64)]) -> PositionBook {
        PositionBook::from_records(
            rows.iter()
                .map(|(i, q, p)| PositionRecord::new(i, *q, *p))
                .collect(),
        )
    }

    #[test]
    fn test_last_record_wins() {
        let book = book(&[("AAPL", 100.0, 195.30), ("AAPL", 90.0, 196.00)]);

        assert_eq!(book.len(), 1);
        let kept = book.get("AAPL").unwrap();
        assert_eq!(kept.qty, 90.0);
        assert_eq!(kept.price, 196.00);
    }

    #[test]
    fn test_duplicates_tracked() {
        let book = book(&[
            ("AAPL", 100.0, 195.30),
            ("TSLA", 50.0, 250.10),
            ("AAPL", 90.0, 196.00),
        ]);

        assert!(book.has_duplicates());
        let dups: Vec<&str> = book.duplicates().collect();
        assert_eq!(dups, vec!["AAPL"]);
    }

    #[test]
    fn test_no_duplicates_for_distinct_instruments() {
        let book = book(&[("AAPL", 100.0, 195.30), ("TSLA", 50.0, 250.10)]);

        assert!(!book.has_duplicates());
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_unify_sorted_union() {
        let abor = book(&[("TSLA", 50.0, 250.10), ("AAPL", 100.0, 195.30)]);
        let ibor = book(&[("MSFT", 75.0, 410.20), ("TSLA", 40.0, 260.00)]);

        let universe = unify(&abor, &ibor);
        assert_eq!(universe, vec!["AAPL", "MSFT", "TSLA"]);
    }

    #[test]
    fn test_unify_includes_one_sided_instruments() {
        let abor = book(&[("SPX_Option_Call_4500", 10.0, 12.50)]);
        let ibor = book(&[]);

        let universe = unify(&abor, &ibor);
        assert_eq!(universe, vec!["SPX_Option_Call_4500"]);
    }

    #[test]
    fn test_unify_case_sensitive_keys() {
        let abor = book(&[("aapl", 1.0, 1.0)]);
        let ibor = book(&[("AAPL", 1.0, 1.0)]);

        // Join key is case-sensitive: these are different instruments,
        // uppercase sorts first by code point
        let universe = unify(&abor, &ibor);
        assert_eq!(universe, vec!["AAPL", "aapl"]);
    }

    #[test]
    fn test_unify_both_empty() {
        assert!(unify(&book(&[]), &book(&[])).is_empty());
    }
}
