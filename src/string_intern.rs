use std::collections::HashMap;
use std::sync::Arc;

use crate::path_key::PathKey;

/// Segment interning pool used while loading datasets.
///
/// Hierarchical keys repeat their upper levels on every record
/// (`["US","East","Ontario"]`, `["US","East","Quebec"]`, ...). Interning
/// each segment once lets all keys that pass through the same ancestor
/// share the segment storage.
///
/// # Examples
///
/// ```
/// use rhier::PathInterner;
/// use std::sync::Arc;
///
/// let mut interner = PathInterner::new();
/// let a = interner.intern_key(["US", "East"]);
/// let b = interner.intern_key(["US", "West"]);
/// assert!(Arc::ptr_eq(&a.segments()[0], &b.segments()[0]));
/// ```
pub struct PathInterner {
    segments: HashMap<String, Arc<str>>,
}

impl PathInterner {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        PathInterner {
            segments: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the shared copy of `segment`, storing it on first use.
    pub fn intern_segment(&mut self, segment: &str) -> Arc<str> {
        if let Some(shared) = self.segments.get(segment) {
            return Arc::clone(shared);
        }
        let shared: Arc<str> = Arc::from(segment);
        self.segments.insert(segment.to_string(), Arc::clone(&shared));
        shared
    }

    /// Builds a key whose segments come from the pool.
    pub fn intern_key<I, S>(&mut self, segments: I) -> PathKey
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let shared = segments
            .into_iter()
            .map(|s| self.intern_segment(s.as_ref()))
            .collect();
        PathKey::from_segments(shared)
    }

    /// Number of distinct segments seen so far.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }
}

impl Default for PathInterner {
    fn default() -> Self {
        Self::new()
    }
}
