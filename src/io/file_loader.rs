//! Shared state of a background load.

/// In-progress flag shared with the loading thread through
/// `Arc<Mutex<LoadingState>>`. Results travel over a channel.
#[derive(Debug, Default)]
pub struct LoadingState {
    pub in_progress: bool,
}

impl LoadingState {
    pub fn new() -> Self {
        Self::default()
    }
}
