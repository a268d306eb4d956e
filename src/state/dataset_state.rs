//! Dataset and file state management.

use rhier::{DataRecord, Dataset};
use std::path::PathBuf;

/// State related to the loaded dataset.
///
/// Responsibilities:
/// - Managing dataset lifetime
/// - Tracking the source file path
/// - Handing out a generation number that changes with every load
#[derive(Debug, Default)]
pub struct DatasetState {
    /// The currently loaded dataset (if any)
    dataset: Option<Dataset>,
    /// Path of the loaded file (None for virtual datasets)
    file_path: Option<PathBuf>,
    /// Bumped on every load or clear
    generation: u64,
}

impl DatasetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_dataset(&mut self, data: Dataset, path: Option<PathBuf>) {
        self.dataset = Some(data);
        self.file_path = path;
        self.generation += 1;
    }

    pub fn clear(&mut self) {
        self.dataset = None;
        self.file_path = None;
        self.generation += 1;
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Loaded records; empty when nothing is loaded.
    pub fn records(&self) -> &[DataRecord] {
        self.dataset.as_ref().map_or(&[], |d| d.records.as_slice())
    }

    pub fn file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
