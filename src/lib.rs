// Position Reconciliation System - Core Library
// Exposes all modules for use in the CLI and embedding hosts

pub mod parser;
pub mod matcher;
pub mod diff;
pub mod classifier;
pub mod aggregate;
pub mod reconciliation;
pub mod report;
pub mod provider;

// Re-export commonly used types
pub use parser::{parse_positions, PositionRecord};
pub use matcher::{unify, PositionBook};
pub use diff::{compute_row, compute_rows, round2, ReconciliationRow};
pub use classifier::{classify, resolve_threshold, total_book_value};
pub use aggregate::{aggregate, Totals};
pub use reconciliation::{ReconciliationEngine, ReconciliationResult};
pub use report::{render, render_markdown, structured_json, OutputMode};
pub use provider::{LocalSummarizer, ProviderConfig, Summarizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
