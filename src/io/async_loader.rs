//! Asynchronous dataset loading.
//!
//! Dataset files are parsed on a background thread so the GUI keeps
//! drawing while large (or brotli-compressed) files load.

use eframe::egui;
use rhier::{Dataset, DatasetReader, JsonlDatasetReader, VirtualDatasetReader};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::{info, warn};

use crate::io::LoadingState;

/// Result of a completed loading operation.
pub enum LoadResult {
    Success {
        data: Dataset,
        /// None for virtual datasets
        path: Option<PathBuf>,
    },
    Error(String),
    /// Still loading, or nothing was started
    None,
}

/// Coordinates background loads with the GUI thread.
pub struct AsyncLoader {
    loading_state: Arc<Mutex<LoadingState>>,
    loading_receiver: Option<Receiver<Result<Dataset, String>>>,
    pending_load_path: Option<PathBuf>,
}

impl AsyncLoader {
    pub fn new() -> Self {
        Self {
            loading_state: Arc::new(Mutex::new(LoadingState::new())),
            loading_receiver: None,
            pending_load_path: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading_state
            .lock()
            .map(|state| state.in_progress)
            .unwrap_or(false)
    }

    fn set_in_progress(state: &Mutex<LoadingState>, in_progress: bool) {
        match state.lock() {
            Ok(mut state) => state.in_progress = in_progress,
            Err(poisoned) => poisoned.into_inner().in_progress = in_progress,
        }
    }

    /// Starts parsing `path` on a background thread.
    ///
    /// Call `check_completion()` once per frame to pick up the result;
    /// `ctx` is asked to repaint when the thread finishes.
    pub fn start_file_load(&mut self, path: PathBuf, ctx: &egui::Context) {
        let (sender, receiver) = channel();
        self.loading_receiver = Some(receiver);
        Self::set_in_progress(&self.loading_state, true);
        self.pending_load_path = Some(path.clone());

        let loading_state = Arc::clone(&self.loading_state);
        let ctx_handle = ctx.clone();
        let path_string = path.to_string_lossy().into_owned();

        thread::spawn(move || {
            info!(path = %path_string, "loading dataset");
            let reader: Box<dyn DatasetReader> = Box::new(JsonlDatasetReader::new());
            let result = reader.read(&path_string).map_err(|e| format!("{:#}", e));
            if let Err(msg) = &result {
                warn!(path = %path_string, error = %msg, "dataset load failed");
            }

            let _ = sender.send(result);
            Self::set_in_progress(&loading_state, false);
            ctx_handle.request_repaint();
        });
    }

    /// Generates the virtual dataset synchronously.
    pub fn load_virtual_dataset(&mut self) -> Result<Dataset, String> {
        VirtualDatasetReader::new().read("").map_err(|e| e.to_string())
    }

    /// Returns the finished load, if any.
    pub fn check_completion(&mut self) -> LoadResult {
        let Some(receiver) = &self.loading_receiver else {
            return LoadResult::None;
        };
        let Ok(result) = receiver.try_recv() else {
            return LoadResult::None;
        };

        self.loading_receiver = None;
        match result {
            Ok(data) => LoadResult::Success {
                data,
                path: self.pending_load_path.take(),
            },
            Err(error_msg) => {
                self.pending_load_path = None;
                LoadResult::Error(error_msg)
            }
        }
    }
}

impl Default for AsyncLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for_result(loader: &mut AsyncLoader) -> LoadResult {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            match loader.check_completion() {
                LoadResult::None if Instant::now() < deadline => thread::sleep(Duration::from_millis(10)),
                other => return other,
            }
        }
    }

    #[test]
    fn test_async_loader_creation() {
        let loader = AsyncLoader::new();
        assert!(!loader.is_loading());
    }

    #[test]
    fn test_virtual_dataset_loading() {
        let mut loader = AsyncLoader::new();
        let data = loader.load_virtual_dataset().unwrap();
        assert!(!data.is_empty());
    }

    #[test]
    fn test_check_completion_when_idle() {
        let mut loader = AsyncLoader::new();
        assert!(matches!(loader.check_completion(), LoadResult::None));
    }

    #[test]
    fn test_background_file_load() {
        let path = std::env::temp_dir().join("hier_gui_async_load.jsonl");
        std::fs::write(
            &path,
            "{\"type\":\"header\",\"version\":\"1.0\"}\n{\"type\":\"record\",\"key\":[\"a\"],\"value\":1}\n",
        )
        .unwrap();

        let mut loader = AsyncLoader::new();
        loader.start_file_load(path.clone(), &egui::Context::default());
        let result = wait_for_result(&mut loader);
        let _ = std::fs::remove_file(&path);

        match result {
            LoadResult::Success { data, path: loaded } => {
                assert_eq!(data.len(), 1);
                assert_eq!(loaded, Some(path));
            }
            _ => panic!("expected a successful load"),
        }
    }

    #[test]
    fn test_background_load_error() {
        let mut loader = AsyncLoader::new();
        loader.start_file_load(PathBuf::from("/nonexistent/hier.jsonl"), &egui::Context::default());
        match wait_for_result(&mut loader) {
            LoadResult::Error(msg) => assert!(msg.contains("Failed to open file")),
            _ => panic!("expected an error"),
        }
    }
}
