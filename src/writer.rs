use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use brotli::enc::BrotliEncoderParams;
use brotli::CompressorWriter;

use crate::dataset::DataRecord;
use crate::path_key::PathKey;

/// Writes datasets in the JSON Lines format read by `parse_dataset`.
pub struct DatasetWriter {
    writer: Box<dyn Write>,
    record_count: usize,
}

impl DatasetWriter {
    /// Creates the file at `file_path`, brotli-compressed when the path
    /// ends with `.br`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use rhier::{DatasetWriter, PathKey};
    /// # fn main() -> anyhow::Result<()> {
    /// let mut writer = DatasetWriter::new("sales.jsonl.br")?;
    /// writer.write_header("1.0", serde_json::json!({"title": "sales"}))?;
    /// writer.write_record(&PathKey::from(["US", "East"]), Some(12.0), None)?;
    /// writer.write_footer()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(file_path: &str) -> Result<Self> {
        let file = File::create(file_path)
            .with_context(|| format!("Failed to create file: {}", file_path))?;

        let writer: Box<dyn Write> = if file_path.ends_with(".br") {
            let params = BrotliEncoderParams {
                quality: 6,
                lgwin: 22,
                ..Default::default()
            };
            Box::new(CompressorWriter::with_params(BufWriter::new(file), 4096, &params))
        } else {
            Box::new(BufWriter::new(file))
        };

        Ok(DatasetWriter {
            writer,
            record_count: 0,
        })
    }

    pub fn write_header(&mut self, version: &str, metadata: serde_json::Value) -> Result<()> {
        let header = serde_json::json!({
            "type": "header",
            "version": version,
            "metadata": metadata
        });
        self.write_line(&header)
    }

    pub fn write_record(
        &mut self,
        key: &PathKey,
        value: Option<f64>,
        data: Option<serde_json::Value>,
    ) -> Result<()> {
        let mut map = serde_json::Map::new();
        map.insert("type".to_string(), serde_json::Value::String("record".to_string()));
        map.insert("key".to_string(), serde_json::to_value(key).context("Failed to serialize key")?);
        if let Some(v) = value {
            map.insert("value".to_string(), serde_json::json!(v));
        }
        if let Some(d) = data {
            map.insert("data".to_string(), d);
        }

        self.write_line(&serde_json::Value::Object(map))?;
        self.record_count += 1;
        Ok(())
    }

    pub fn write_data_record(&mut self, record: &DataRecord) -> Result<()> {
        self.write_record(&record.key, record.value, record.data.clone())
    }

    pub fn write_footer(&mut self) -> Result<()> {
        let footer = serde_json::json!({
            "type": "footer",
            "total_records": self.record_count
        });
        self.write_line(&footer)
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .context("Failed to serialize to JSON")?;

        writeln!(self.writer, "{}", json)
            .context("Failed to write line")?;

        Ok(())
    }

    /// Flushes buffered output.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }
}

impl Drop for DatasetWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
