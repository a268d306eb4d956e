use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::{anyhow, Context, Result};
use brotli::Decompressor;
use tracing::{debug, info, warn};

use crate::dataset::{DataRecord, Dataset, DatasetFooter, DatasetHeader, DatasetMetadata};
use crate::path_key::PathKey;
use crate::string_intern::PathInterner;
use crate::traits::DatasetReader;

/// Reader for JSON Lines datasets (`.jsonl`, `.jsonl.br`).
#[derive(Debug, Default)]
pub struct JsonlDatasetReader;

impl JsonlDatasetReader {
    pub fn new() -> Self {
        JsonlDatasetReader
    }
}

impl DatasetReader for JsonlDatasetReader {
    fn read(&self, file_path: &str) -> Result<Dataset> {
        parse_dataset(file_path)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum DatasetLine {
    #[serde(rename = "header")]
    Header {
        version: String,
        #[serde(default)]
        metadata: serde_json::Value,
    },
    #[serde(rename = "record")]
    Record {
        key: Vec<String>,
        #[serde(default)]
        value: Option<f64>,
        #[serde(default)]
        data: Option<serde_json::Value>,
    },
    #[serde(rename = "footer")]
    Footer {
        #[serde(default)]
        total_records: Option<usize>,
    },
}

/// Parses a dataset file from disk.
///
/// Files ending in `.br` are brotli-decompressed on the fly.
///
/// # Format
///
/// One JSON object per line: a `header` first, then any number of
/// `record` lines, optionally a `footer`. Blank lines are skipped.
///
/// ```text
/// {"type":"header","version":"1.0","metadata":{}}
/// {"type":"record","key":["US","East","Ontario"],"value":12}
/// {"type":"footer","total_records":1}
/// ```
///
/// # Errors
///
/// Fails on unreadable files, malformed JSON, a header that is not the
/// first line, a missing header, or two records with the same key.
pub fn parse_dataset(file_path: &str) -> Result<Dataset> {
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open file: {}", file_path))?;

    let reader: Box<dyn BufRead> = if file_path.ends_with(".br") {
        Box::new(BufReader::new(Decompressor::new(file, 4096)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut interner = PathInterner::with_capacity(4096);
    let mut header: Option<DatasetHeader> = None;
    let mut footer: Option<DatasetFooter> = None;
    let mut records: Vec<DataRecord> = Vec::new();
    let mut seen: HashMap<PathKey, usize> = HashMap::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result
            .with_context(|| format!("Failed to read line {}", line_num + 1))?;

        if line.trim().is_empty() {
            continue;
        }

        let parsed: DatasetLine = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse JSON at line {}", line_num + 1))?;

        match parsed {
            DatasetLine::Header { version, metadata } => {
                if line_num != 0 {
                    return Err(anyhow!("Header must be first line (found at line {})", line_num + 1));
                }
                header = Some(DatasetHeader { version, metadata });
            }

            DatasetLine::Record { key, value, data } => {
                if header.is_none() {
                    return Err(anyhow!("Record before header at line {}", line_num + 1));
                }
                let key = interner.intern_key(&key);
                if let Some(first) = seen.get(&key) {
                    return Err(anyhow!(
                        "Duplicate record key '{}' at line {} (first seen at line {})",
                        key,
                        line_num + 1,
                        first
                    ));
                }
                seen.insert(key.clone(), line_num + 1);
                records.push(DataRecord { key, value, data });
            }

            DatasetLine::Footer { total_records } => {
                footer = Some(DatasetFooter { total_records });
            }
        }
    }

    let header = header.ok_or_else(|| anyhow!("Missing header line"))?;

    if let Some(expected) = footer.as_ref().and_then(|f| f.total_records) {
        if expected != records.len() {
            warn!(expected, actual = records.len(), "footer record count does not match");
        }
    }

    debug!(segments = interner.len(), "interned path segments");
    info!(path = file_path, records = records.len(), "loaded dataset");

    Ok(Dataset {
        metadata: DatasetMetadata {
            header,
            footer,
            source: file_path.to_string(),
        },
        records,
    })
}
