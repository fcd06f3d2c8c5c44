// 📄 Tabular Record Parser - position CSV ingestion
// Tolerant by design: reconciliation inputs are often hand-exported and
// imperfect, so malformed rows are dropped and bad numerics zero-filled
// instead of failing the whole run.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};

// ============================================================================
// POSITION RECORD
// ============================================================================

/// PositionRecord - one row from one source set (ABOR or IBOR)
///
/// The instrument identifier is the join key: case-sensitive, trimmed of
/// surrounding whitespace only. Quantity and price default to 0 when a value
/// is absent or unparseable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub instrument: String,
    pub qty: f64,
    pub price: f64,
}

impl PositionRecord {
    pub fn new(instrument: &str, qty: f64, price: f64) -> Self {
        PositionRecord {
            instrument: instrument.to_string(),
            qty,
            price,
        }
    }

    /// Raw notional of this record, using its own price even if zero.
    /// Reference book value is summed from this, never from the
    /// fallback-adjusted notionals.
    pub fn raw_notional(&self) -> f64 {
        self.qty * self.price
    }
}

// ============================================================================
// HEADER INDEX
// ============================================================================

/// Column positions resolved from the header row, looked up once and reused
/// for every data row. Columns may appear in any order; unrecognized extra
/// columns are ignored.
#[derive(Debug, Clone, Copy)]
struct HeaderIndex {
    instrument: Option<usize>,
    qty: Option<usize>,
    price: Option<usize>,
}

impl HeaderIndex {
    /// Match header fields case-insensitively against the recognized
    /// column names `instrument`, `qty`, `price`.
    fn from_header(header: &StringRecord) -> Self {
        let position_of = |name: &str| {
            header
                .iter()
                .position(|field| field.eq_ignore_ascii_case(name))
        };

        HeaderIndex {
            instrument: position_of("instrument"),
            qty: position_of("qty"),
            price: position_of("price"),
        }
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse raw delimited text into position records.
///
/// - The first non-empty line is the header and is consumed, not emitted.
/// - LF and CRLF line endings are both supported; fields are whitespace-trimmed.
/// - Data lines with fewer than 2 columns are dropped as malformed.
/// - `instrument` falls back to the first column when the header has no
///   `instrument` column (or the mapped cell is empty).
/// - Non-numeric or missing `qty`/`price` values yield 0, never an error.
///
/// This function never fails: any input shape degrades to zero-filled or
/// dropped rows.
///
/// # Example
/// ```
/// use position_recon::parse_positions;
///
/// let records = parse_positions("instrument,qty,price\nAAPL,100,195.30\n");
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].instrument, "AAPL");
/// assert_eq!(records[0].qty, 100.0);
/// ```
pub fn parse_positions(raw_text: &str) -> Vec<PositionRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false) // header mapped by position below
        .flexible(true)
        .trim(Trim::All)
        .from_reader(raw_text.as_bytes());

    let mut records = Vec::new();
    let mut index: Option<HeaderIndex> = None;

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            // Tolerance policy: a line the reader cannot decode is treated
            // like any other malformed row and skipped.
            Err(_) => continue,
        };

        let idx = match index {
            Some(idx) => idx,
            None => {
                index = Some(HeaderIndex::from_header(&record));
                continue;
            }
        };

        if record.len() < 2 {
            continue;
        }

        let instrument = idx
            .instrument
            .and_then(|i| record.get(i))
            .filter(|s| !s.is_empty())
            .or_else(|| record.get(0))
            .unwrap_or("");

        if instrument.is_empty() {
            continue;
        }

        records.push(PositionRecord {
            instrument: instrument.to_string(),
            qty: numeric_field(&record, idx.qty),
            price: numeric_field(&record, idx.price),
        });
    }

    records
}

/// Zero-fill rule for numeric cells: missing column, missing cell, or a
/// value that does not parse as a float all become 0.
fn numeric_field(record: &StringRecord, idx: Option<usize>) -> f64 {
    idx.and_then(|i| record.get(i))
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0)
}

// ============================================================================
// TESTS
// ============================================================================
