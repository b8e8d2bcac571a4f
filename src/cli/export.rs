//! Export command implementation

use std::path::Path;

use anyhow::{Context, Result};

use questline::ledger::LedgerManager;

/// Export the player level report to a CSV file
pub fn export_command(ledger: &LedgerManager, out: &Path) -> Result<()> {
    let rows = ledger
        .exporter()
        .export_csv_file(out)
        .with_context(|| format!("Failed to export to {}", out.display()))?;
    println!("Exported {} rows to {}", rows, out.display());
    Ok(())
}
