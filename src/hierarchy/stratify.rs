use std::collections::HashMap;

use tracing::{debug, warn};

use super::synthesize::synthesize_ancestors;
use super::{Hierarchy, NodeId, NodeOrigin, TreeNode};
use crate::error::{HierarchyError, Result};
use crate::path_key::PathKey;
use crate::traits::Accessors;

/// Turns flat path-keyed records into a rooted `Hierarchy`.
///
/// The records are joined with the synthesized ancestors and the root, then
/// linked by the rule "parent key = key minus its last segment". Values are
/// summed bottom-up: each node carries its own record value plus the totals
/// of its children.
pub struct TreeBuilder<'a, T> {
    accessors: &'a Accessors<T>,
}

impl<'a, T> TreeBuilder<'a, T> {
    pub fn new(accessors: &'a Accessors<T>) -> Self {
        TreeBuilder { accessors }
    }

    /// Builds the tree for `records`.
    ///
    /// Records whose key accessor fails are left out. A failing or
    /// non-finite value contributes zero to the sums.
    ///
    /// # Errors
    ///
    /// `HierarchyError::DuplicateKey` when two records share a key.
    /// `HierarchyError::Stratify` if a parent cannot be found, which would
    /// mean ancestor synthesis is broken.
    pub fn build(&self, records: &[T]) -> Result<Hierarchy> {
        let mut entries: Vec<(PathKey, NodeOrigin)> = Vec::with_capacity(records.len() + 1);
        for (index, record) in records.iter().enumerate() {
            match self.accessors.key(record) {
                Ok(key) => entries.push((key, NodeOrigin::Record(index))),
                Err(err) => warn!(record = index, %err, "skipping record with unreadable key"),
            }
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));
        if let Some(pair) = entries.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(HierarchyError::DuplicateKey { key: pair[0].0.clone() });
        }

        let ancestors = synthesize_ancestors(entries.iter().map(|(key, _)| key));
        let synthesized = ancestors.len();
        entries.extend(ancestors.into_iter().map(|key| (key, NodeOrigin::Synthesized)));

        let has_root_record = entries.first().map_or(false, |(key, _)| key.is_root());
        if !has_root_record {
            entries.push((PathKey::root(), NodeOrigin::ImplicitRoot));
        }

        // Parents sort before their descendants.
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut nodes: Vec<TreeNode> = Vec::with_capacity(entries.len());
        let mut index: HashMap<PathKey, NodeId> = HashMap::with_capacity(entries.len());

        for (key, origin) in entries {
            let id = NodeId(nodes.len());
            let parent = match key.parent() {
                None => None,
                Some(parent_key) => match index.get(&parent_key) {
                    Some(&parent) => Some(parent),
                    None => {
                        debug_assert!(false, "missing parent {} for {}", parent_key, key);
                        return Err(HierarchyError::Stratify { key, parent: parent_key });
                    }
                },
            };

            let value = match origin {
                NodeOrigin::Record(i) => self.own_value(&records[i], i),
                _ => 0.0,
            };

            if let Some(parent) = parent {
                nodes[parent.0].children.push(id);
            }
            nodes.push(TreeNode {
                depth: key.len(),
                key: key.clone(),
                parent,
                children: Vec::new(),
                height: 0,
                value,
                origin,
            });
            index.insert(key, id);
        }

        // Children always follow their parent, so a reverse sweep sees
        // every subtree complete before its root.
        for i in (1..nodes.len()).rev() {
            if let Some(parent) = nodes[i].parent {
                let (value, height) = (nodes[i].value, nodes[i].height);
                let parent_node = &mut nodes[parent.0];
                parent_node.value += value;
                parent_node.height = parent_node.height.max(height + 1);
            }
        }

        debug!(
            records = records.len(),
            synthesized,
            nodes = nodes.len(),
            "built hierarchy"
        );

        Ok(Hierarchy::from_parts(nodes, index))
    }

    fn own_value(&self, record: &T, index: usize) -> f64 {
        match self.accessors.value(record) {
            Ok(v) if v.is_finite() => v,
            Ok(v) => {
                debug!(record = index, value = v, "ignoring non-finite value");
                0.0
            }
            Err(err) => {
                debug!(record = index, %err, "value accessor failed, using 0");
                0.0
            }
        }
    }
}
