use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Position of a node in a hierarchy, expressed as the chain of segment
/// names from the root down to the node.
///
/// The empty key is the root. Keys are immutable and cheap to clone; the
/// segment storage is shared behind an `Arc`.
///
/// Ordering is lexicographic over segments, so a key always sorts before any
/// of its extensions (`["A"] < ["A", "B"] < ["B"]`).
///
/// # Examples
///
/// ```
/// use rhier::PathKey;
///
/// let key = PathKey::from(["US", "East", "Ontario"]);
/// assert_eq!(key.len(), 3);
/// assert_eq!(key.parent(), Some(PathKey::from(["US", "East"])));
/// assert!(PathKey::from(["US"]).is_prefix_of(&key));
/// assert_eq!(key.to_string(), "US/East/Ontario");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey(Arc<[Arc<str>]>);

impl PathKey {
    /// The empty key.
    pub fn root() -> Self {
        PathKey(Arc::from(Vec::<Arc<str>>::new()))
    }

    /// Builds a key from already shared segments (see `PathInterner`).
    pub fn from_segments(segments: Vec<Arc<str>>) -> Self {
        PathKey(Arc::from(segments))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    pub fn segments(&self) -> &[Arc<str>] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_ref())
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|s| s.as_ref())
    }

    /// Last segment, `None` for the root.
    pub fn leaf(&self) -> Option<&str> {
        self.0.last().map(|s| s.as_ref())
    }

    /// The key with its last segment removed, `None` for the root.
    pub fn parent(&self) -> Option<PathKey> {
        if self.is_root() {
            None
        } else {
            Some(self.prefix(self.len() - 1))
        }
    }

    /// First `len` segments of this key (clamped to the key length).
    pub fn prefix(&self, len: usize) -> PathKey {
        let len = len.min(self.len());
        if len == self.len() {
            return self.clone();
        }
        PathKey(Arc::from(&self.0[..len]))
    }

    /// A new key one level deeper.
    pub fn child(&self, segment: impl Into<Arc<str>>) -> PathKey {
        let mut segments = self.0.to_vec();
        segments.push(segment.into());
        PathKey::from_segments(segments)
    }

    /// True when `self` is equal to, or an ancestor of, `other`.
    pub fn is_prefix_of(&self, other: &PathKey) -> bool {
        self.len() <= other.len() && self.0.iter().zip(other.0.iter()).all(|(a, b)| a == b)
    }

    /// True when `self` is an ancestor of `other` and not equal to it.
    pub fn is_strict_prefix_of(&self, other: &PathKey) -> bool {
        self.len() < other.len() && self.is_prefix_of(other)
    }

    /// True when one key is a prefix of the other.
    pub fn is_related(&self, other: &PathKey) -> bool {
        self.is_prefix_of(other) || other.is_prefix_of(self)
    }

    /// Number of leading segments shared with `other`.
    pub fn common_prefix_len(&self, other: &PathKey) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Proper ancestors from the root down to the parent.
    pub fn ancestors(&self) -> impl Iterator<Item = PathKey> + '_ {
        (0..self.len()).map(move |len| self.prefix(len))
    }

    /// Display label: the last segment, or `root_name` for the root.
    pub fn label<'a>(&'a self, root_name: &'a str) -> &'a str {
        self.leaf().unwrap_or(root_name)
    }
}

impl Default for PathKey {
    fn default() -> Self {
        PathKey::root()
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<S: AsRef<str>> FromIterator<S> for PathKey {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        PathKey::from_segments(iter.into_iter().map(|s| Arc::from(s.as_ref())).collect())
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for PathKey {
    fn from(segments: [S; N]) -> Self {
        segments.iter().collect()
    }
}

impl<S: AsRef<str>> From<&[S]> for PathKey {
    fn from(segments: &[S]) -> Self {
        segments.iter().collect()
    }
}

impl From<Vec<String>> for PathKey {
    fn from(segments: Vec<String>) -> Self {
        segments.iter().collect()
    }
}

// Serialized as a plain array of strings.
impl Serialize for PathKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for PathKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let segments = Vec::<String>::deserialize(deserializer)?;
        Ok(PathKey::from(segments))
    }
}
