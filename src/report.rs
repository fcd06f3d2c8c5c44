// 📝 Report Rendering - boundary presentation of a reconciliation result
//
// Two modes: a narrative Markdown table of all rows followed by the
// structured JSON block, or the structured block alone. Rendering is
// presentation only; it never feeds back into the computation.

use crate::diff::ReconciliationRow;
use crate::reconciliation::ReconciliationResult;
use anyhow::Result;
use serde::Serialize;

// ============================================================================
// OUTPUT MODE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Markdown table of all rows plus the structured block.
    Narrative,
    /// The structured block alone, as plain JSON.
    Structured,
}

impl OutputMode {
    /// `"json"` selects structured-only output; anything else is narrative.
    pub fn from_flag(flag: &str) -> Self {
        if flag.eq_ignore_ascii_case("json") {
            OutputMode::Structured
        } else {
            OutputMode::Narrative
        }
    }
}

/// The `{exceptions, totals, notes}` block consumers parse out of the
/// report. Rows are referenced, not copied.
#[derive(Serialize)]
struct StructuredBlock<'a> {
    exceptions: &'a [ReconciliationRow],
    totals: &'a crate::aggregate::Totals,
    notes: &'a [String],
}

// ============================================================================
// RENDERING
// ============================================================================

/// Render a result for the requested output mode.
pub fn render(result: &ReconciliationResult, mode: OutputMode) -> Result<String> {
    match mode {
        OutputMode::Narrative => render_markdown(result),
        OutputMode::Structured => structured_json(result),
    }
}

/// Markdown report: heading, table of every row (ascending by instrument),
/// then the structured block in a fenced ```json code block.
pub fn render_markdown(result: &ReconciliationResult) -> Result<String> {
    let mut out = String::new();

    out.push_str("# ABOR <-> IBOR Reconciliation\n\n");
    out.push_str(
        "| Instrument | ABOR Qty | IBOR Qty | Diff Qty | ABOR Notional | IBOR Notional | Diff Notional |\n",
    );
    out.push_str("|---|---:|---:|---:|---:|---:|---:|\n");

    for row in &result.rows {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            row.instrument,
            row.abor_qty,
            row.ibor_qty,
            row.diff_qty,
            row.abor_notional,
            row.ibor_notional,
            row.diff_notional
        ));
    }

    out.push_str("\n```json\n");
    out.push_str(&structured_json(result)?);
    out.push_str("\n```\n");

    Ok(out)
}

/// The structured block serialized as pretty JSON.
pub fn structured_json(result: &ReconciliationResult) -> Result<String> {
    let block = StructuredBlock {
        exceptions: &result.exceptions,
        totals: &result.totals,
        notes: &result.notes,
    };
    Ok(serde_json::to_string_pretty(&block)?)
}

// ============================================================================
// TESTS
// ============================================================================
