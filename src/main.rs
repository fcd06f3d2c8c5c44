// CLI entry point: reconcile two position CSV files and print the report.
//
// Usage: position-recon <abor.csv> <ibor.csv> [threshold_fraction] [--json]

use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::env;
use std::fs;
use std::path::Path;

use position_recon::{render, OutputMode, ReconciliationEngine};

const DEFAULT_THRESHOLD_FRACTION: f64 = 0.01;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: position-recon <abor.csv> <ibor.csv> [threshold_fraction] [--json]");
        eprintln!("  threshold_fraction  materiality as a fraction of ABOR book value (default 0.01)");
        eprintln!("  --json              emit the structured block only");
        bail!("Expected ABOR and IBOR file paths");
    }

    let mut mode = OutputMode::Narrative;
    let mut threshold_fraction = DEFAULT_THRESHOLD_FRACTION;

    for arg in &args[3..] {
        if arg == "--json" {
            mode = OutputMode::Structured;
        } else {
            // Unparseable fractions fall back to the default
            threshold_fraction = arg.parse().unwrap_or(DEFAULT_THRESHOLD_FRACTION);
        }
    }

    let abor_text = read_input(&args[1])?;
    let ibor_text = read_input(&args[2])?;

    eprintln!(
        "Reconciling {} vs {} at {} (threshold fraction {})",
        args[1],
        args[2],
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        threshold_fraction
    );

    let engine = ReconciliationEngine::with_threshold_fraction(threshold_fraction);
    let result = engine.reconcile_checked(&abor_text, &ibor_text)?;

    println!("{}", render(&result, mode)?);
    eprintln!("{}", result.summary());

    Ok(())
}

fn read_input(path: &str) -> Result<String> {
    fs::read_to_string(Path::new(path)).with_context(|| format!("Failed to read {}", path))
}
