use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::{DataRecord, Dataset, DatasetFooter, DatasetHeader, DatasetMetadata};
use crate::path_key::PathKey;
use crate::string_intern::PathInterner;
use crate::traits::DatasetReader;

const DEFAULT_DEPTH: usize = 3;
const DEFAULT_MAX_FANOUT: usize = 5;
const DEFAULT_SEED: u64 = 42;

/// Chance that an inner node also carries its own record.
const INNER_RECORD_PROBABILITY: f64 = 0.1;

static LEVEL_NAMES: Lazy<Vec<Vec<&'static str>>> = Lazy::new(|| {
    vec![
        vec!["US", "CA", "MX", "BR", "DE", "FR", "JP", "IN"],
        vec!["North", "South", "East", "West", "Central"],
        vec!["Ontario", "Quebec", "Colorado", "Texas", "Bavaria", "Kyoto", "Goa", "Bahia", "Yukon"],
    ]
});

/// Generates a reproducible synthetic dataset instead of reading a file.
///
/// Records sit on the leaves (plus a few inner nodes), so the missing
/// levels are filled in by ancestor synthesis when the tree is built.
pub struct VirtualDatasetReader {
    depth: usize,
    max_fanout: usize,
    seed: u64,
}

impl VirtualDatasetReader {
    pub fn new() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            max_fanout: DEFAULT_MAX_FANOUT,
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_config(depth: usize, max_fanout: usize, seed: u64) -> Self {
        Self {
            depth: depth.max(1),
            max_fanout: max_fanout.max(1),
            seed,
        }
    }

    /// Records only, without dataset metadata.
    pub fn generate(&self) -> Vec<DataRecord> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut interner = PathInterner::new();
        let mut records = Vec::new();
        self.generate_level(&mut rng, &mut interner, &PathKey::root(), &mut records);
        records
    }

    fn generate_level(
        &self,
        rng: &mut StdRng,
        interner: &mut PathInterner,
        parent: &PathKey,
        out: &mut Vec<DataRecord>,
    ) {
        let level = parent.len();
        let fanout = rng.gen_range(1..=self.max_fanout);
        let names = segment_names(level, fanout);

        for name in names {
            let key = interner.intern_key(parent.iter().chain(std::iter::once(name.as_str())));
            if level + 1 >= self.depth {
                let value = rng.gen_range(1..=100) as f64;
                out.push(DataRecord::new(key, value));
            } else {
                if rng.gen_bool(INNER_RECORD_PROBABILITY) {
                    let value = rng.gen_range(1..=20) as f64;
                    out.push(DataRecord::new(key.clone(), value));
                }
                self.generate_level(rng, interner, &key, out);
            }
        }
    }
}

impl Default for VirtualDatasetReader {
    fn default() -> Self {
        Self::new()
    }
}

/// `count` distinct names for children at `level`.
fn segment_names(level: usize, count: usize) -> Vec<String> {
    match LEVEL_NAMES.get(level) {
        Some(pool) => (0..count)
            .map(|i| {
                let base = pool[i % pool.len()];
                if i < pool.len() {
                    base.to_string()
                } else {
                    format!("{}-{}", base, i / pool.len() + 1)
                }
            })
            .collect(),
        None => (0..count).map(|i| format!("L{}-{}", level, i + 1)).collect(),
    }
}

impl DatasetReader for VirtualDatasetReader {
    fn read(&self, _file_path: &str) -> anyhow::Result<Dataset> {
        let records = self.generate();
        let metadata = serde_json::json!({
            "generator": "virtual",
            "depth": self.depth,
            "max_fanout": self.max_fanout,
            "seed": self.seed,
        });

        Ok(Dataset {
            metadata: DatasetMetadata {
                header: DatasetHeader {
                    version: "1.0".to_string(),
                    metadata,
                },
                footer: Some(DatasetFooter {
                    total_records: Some(records.len()),
                }),
                source: format!("virtual (seed {})", self.seed),
            },
            records,
        })
    }
}
