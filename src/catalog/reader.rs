use crate::error::{CatalogError, Result};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, instrument};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

fn open_lines(path: &Path) -> Result<Box<dyn BufRead>> {
    let mut file = File::open(path)
        .map_err(|e| CatalogError::io(e, format!("Failed to open input file {}", path.display())))?;

    let mut magic = [0u8; 2];
    let read = file
        .read(&mut magic)
        .map_err(|e| CatalogError::io(e, format!("Failed to read {}", path.display())))?;
    let file = File::open(path)
        .map_err(|e| CatalogError::io(e, format!("Failed to reopen {}", path.display())))?;

    if read == 2 && magic == GZIP_MAGIC {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read every record of a line-delimited JSON file, gzip or plain.
///
/// Blank lines are skipped. The first line that fails to parse aborts the
/// read with its 1-based line number.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let reader = open_lines(path)?;
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            CatalogError::io(e, format!("Failed to read line {} of {}", idx + 1, path.display()))
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| CatalogError::MalformedRecord {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }

    debug!("Read {} records", records.len());
    Ok(records)
}

/// Write records as gzip line-delimited JSON, replacing any existing file
pub fn write_jsonl_gz<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CatalogError::io(e, format!("Failed to create {}", parent.display())))?;
    }
    let file = File::create(path)
        .map_err(|e| CatalogError::io(e, format!("Failed to create {}", path.display())))?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    for record in records {
        serde_json::to_writer(&mut encoder, record)?;
        encoder
            .write_all(b"\n")
            .map_err(|e| CatalogError::io(e, format!("Failed to write {}", path.display())))?;
    }
    encoder
        .finish()
        .and_then(|mut w| w.flush())
        .map_err(|e| CatalogError::io(e, format!("Failed to finish {}", path.display())))?;
    Ok(())
}
