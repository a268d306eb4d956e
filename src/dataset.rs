use serde::{Deserialize, Serialize};

use crate::error::AccessorError;
use crate::path_key::PathKey;
use crate::traits::Accessors;

/// One path-keyed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    pub key: PathKey,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl DataRecord {
    pub fn new(key: impl Into<PathKey>, value: f64) -> Self {
        DataRecord {
            key: key.into(),
            value: Some(value),
            data: None,
        }
    }

    /// Accessors reading `key` and `value`; a record without a value, or
    /// with a non-finite one, fails the value accessor.
    pub fn accessors() -> Accessors<DataRecord> {
        Accessors::new(
            |record: &DataRecord| Ok(record.key.clone()),
            |record: &DataRecord| match record.value {
                Some(v) if v.is_finite() => Ok(v),
                Some(v) => Err(AccessorError::Invalid {
                    field: "value",
                    reason: format!("{} is not finite", v),
                }),
                None => Err(AccessorError::Missing { field: "value" }),
            },
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetHeader {
    pub version: String,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFooter {
    pub total_records: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct DatasetMetadata {
    pub header: DatasetHeader,
    pub footer: Option<DatasetFooter>,
    /// Where the dataset came from: a file path or a generator description.
    pub source: String,
}

/// Records loaded from one source.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub metadata: DatasetMetadata,
    pub records: Vec<DataRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of all record values, missing values counting as zero.
    pub fn total_value(&self) -> f64 {
        self.records.iter().filter_map(|r| r.value).filter(|v| v.is_finite()).sum()
    }
}
