//! CSV export of scraped records
//!
//! Every cell, header included, is wrapped in double quotes with inner quotes
//! doubled. Rows are joined with `\n`; the document is built in memory and
//! written with a single call.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::models::ProductRecord;

/// What `export_to_csv` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// No records, nothing written
    Skipped,
    Written { path: PathBuf, rows: usize },
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

fn join_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    cells.map(quote).collect::<Vec<_>>().join(",")
}

/// Render records as CSV text, or `None` when there is nothing to render.
///
/// The header comes from the first record's keys. Records missing one of
/// those keys get an empty cell.
pub fn to_csv(records: &[ProductRecord]) -> Option<String> {
    let first = records.first()?;
    let headers: Vec<&str> = first.keys().collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(join_row(headers.iter().copied()));

    for record in records {
        let cells: Vec<String> = headers
            .iter()
            .map(|header| record.get(header).map(ToString::to_string).unwrap_or_default())
            .collect();
        lines.push(join_row(cells.iter().map(String::as_str)));
    }

    Some(lines.join("\n"))
}

/// Write records to `destination` as UTF-8 CSV, replacing any existing file.
///
/// Missing parent directories are created. An empty record list is a no-op.
pub async fn export_to_csv(records: Vec<ProductRecord>, destination: &Path) -> Result<ExportOutcome> {
    let Some(csv) = to_csv(&records) else {
        info!("No products to export");
        return Ok(ExportOutcome::Skipped);
    };

    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    tokio::fs::write(destination, csv)
        .await
        .with_context(|| format!("Failed to write {}", destination.display()))?;

    info!("CSV saved as {}", destination.display());
    Ok(ExportOutcome::Written {
        path: destination.to_path_buf(),
        rows: records.len(),
    })
}
