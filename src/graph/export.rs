use super::table::GraphTable;
use crate::constants::PART_FILE;
use crate::error::{CatalogError, Result};
use csv::{QuoteStyle, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Directory a table is written to: `<root>/<nodes|edges>/<name>`
pub fn table_dir(root: &Path, table: &GraphTable) -> PathBuf {
    root.join(table.kind.directory()).join(table.name)
}

/// Write one table as a single CSV file, replacing whatever the directory held.
///
/// The header row carries the decorated column names the bulk loader reads.
#[instrument(skip_all, fields(table = table.name, rows = table.len()))]
pub fn write_table(root: &Path, table: &GraphTable) -> Result<PathBuf> {
    let dir = table_dir(root, table);
    if dir.exists() {
        fs::remove_dir_all(&dir)
            .map_err(|e| CatalogError::io(e, format!("Failed to clear {}", dir.display())))?;
    }
    fs::create_dir_all(&dir)
        .map_err(|e| CatalogError::io(e, format!("Failed to create {}", dir.display())))?;

    let path = dir.join(PART_FILE);
    let quote_style = if table.quote_all {
        QuoteStyle::Always
    } else {
        QuoteStyle::Necessary
    };
    let mut writer = WriterBuilder::new()
        .quote_style(quote_style)
        .from_path(&path)?;

    writer.write_record(table.headers())?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| CatalogError::io(e, format!("Failed to flush {}", path.display())))?;

    debug!("Wrote {}", path.display());
    Ok(path)
}

/// Write every table under `root`, one directory each
pub fn write_tables(root: &Path, tables: &[GraphTable]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(tables.len());
    for table in tables {
        written.push(write_table(root, table)?);
    }
    info!("Exported {} tables to {}", written.len(), root.display());
    Ok(written)
}
