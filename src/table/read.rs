use anyhow::{anyhow, Context, Result};
use std::path::Path;

/// Header row plus every data row of a delimited file, as raw strings.
#[derive(Debug, Clone)]
pub(super) struct RawTable {
    pub(super) headers: Vec<String>,
    pub(super) rows: Vec<Vec<String>>,
}

impl RawTable {
    pub(super) fn column(&self, idx: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| row[idx].as_str())
    }
}

/// Comma for `.csv`, tab for `.tsv`; anything else is read as comma-separated.
pub(super) fn delimiter_for(path: &Path) -> u8 {
    let is_tsv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));
    if is_tsv {
        b'\t'
    } else {
        b','
    }
}

/// Read the whole file with strict record lengths.
///
/// Every row is parsed even when only a prefix will be rendered, so a
/// malformed row anywhere in the file fails the read.
pub(super) fn read_table(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_for(path))
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("read header of {}", path.display()))?
        .iter()
        .map(|field| field.trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(anyhow!("no columns to parse from file"));
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("parse data row {}", idx + 1))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable { headers, rows })
}
