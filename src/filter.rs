use serde::{Deserialize, Serialize};
use std::fmt;

use crate::path_key::PathKey;

/// Selection of one node, matching the node itself, its ancestors and its
/// descendants.
///
/// Matching descendants is what narrows the data to the selected subtree;
/// matching ancestors is what keeps the path down to the selection
/// highlighted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HierarchyFilter {
    target: PathKey,
}

impl HierarchyFilter {
    pub fn new(target: PathKey) -> Self {
        HierarchyFilter { target }
    }

    pub fn target(&self) -> &PathKey {
        &self.target
    }

    /// True when `candidate` is a prefix of the target or the target is a
    /// prefix of `candidate`.
    pub fn is_filtered(&self, candidate: &PathKey) -> bool {
        self.target.is_related(candidate)
    }
}

impl From<PathKey> for HierarchyFilter {
    fn from(target: PathKey) -> Self {
        HierarchyFilter::new(target)
    }
}

impl fmt::Display for HierarchyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.target.is_root() {
            f.write_str("(all)")
        } else {
            write!(f, "{}", self.target)
        }
    }
}
