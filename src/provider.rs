// 🔌 Provider Seam - external text-generation collaborator
//
// The narrative/summarization step is an external collaborator consumed as
// a black box; the core never depends on its output for correctness. Its
// configuration is an injected object, never an implicit global. This crate
// ships no network client: a remote summarizer implements the trait in the
// host application, while `LocalSummarizer` renders the deterministic
// Markdown report so the engine is usable standalone.

use crate::report::render_markdown;
use crate::reconciliation::ReconciliationResult;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// PROVIDER CONFIG
// ============================================================================

/// Connection settings for a text-generation provider, reusable across
/// workflows. Loaded from JSON and passed explicitly to whichever
/// collaborator needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub models: Vec<String>,
}

impl ProviderConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse provider config JSON")
    }

    /// Preferred model: the first configured one, if any.
    pub fn model(&self) -> Option<&str> {
        self.models.first().map(|m| m.as_str())
    }
}

// ============================================================================
// SUMMARIZER
// ============================================================================

/// Turns a reconciliation result into narrative prose. Failures here are
/// reported to the caller as-is, without retry; they never affect the
/// computed result.
pub trait Summarizer {
    fn summarize(&self, result: &ReconciliationResult) -> Result<String>;
}

/// Offline summarizer: the deterministic Markdown report, no provider call.
pub struct LocalSummarizer;

impl Summarizer for LocalSummarizer {
    fn summarize(&self, result: &ReconciliationResult) -> Result<String> {
        render_markdown(result)
    }
}

// ============================================================================
// TESTS
// ============================================================================
