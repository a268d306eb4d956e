//! Arena tree built from path-keyed records.

mod stratify;
mod synthesize;

pub use stratify::TreeBuilder;
pub use synthesize::synthesize_ancestors;

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::path_key::PathKey;

/// Index of a node inside its `Hierarchy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// What a node was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOrigin {
    /// Input record at this index.
    Record(usize),
    /// Placeholder for a missing intermediate level.
    Synthesized,
    /// The implicit root added when no record has the empty key.
    ImplicitRoot,
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub key: PathKey,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Equal to `key.len()`.
    pub depth: usize,
    /// Longest distance to a descendant leaf.
    pub height: usize,
    /// Own value plus the values of all descendants.
    pub value: f64,
    pub origin: NodeOrigin,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn record_index(&self) -> Option<usize> {
        match self.origin {
            NodeOrigin::Record(index) => Some(index),
            _ => None,
        }
    }
}

/// Rooted tree stored as a flat arena.
///
/// Node 0 is always the root. Nodes are stored in key order, so a parent
/// always has a lower index than its children.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    nodes: Vec<TreeNode>,
    index: HashMap<PathKey, NodeId>,
}

impl Hierarchy {
    pub(crate) fn from_parts(nodes: Vec<TreeNode>, index: HashMap<PathKey, NodeId>) -> Self {
        Hierarchy { nodes, index }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn find(&self, key: &PathKey) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn record_index(&self, id: NodeId) -> Option<usize> {
        self.nodes[id.0].record_index()
    }

    /// Root height, i.e. the depth of the deepest node.
    pub fn max_depth(&self) -> usize {
        self.nodes[0].height
    }

    /// `id` and all of its descendants in pre-order, honoring child order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
        out
    }

    /// `id` and all of its descendants, children before parents.
    pub fn post_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(id, false)];
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                out.push(current);
                continue;
            }
            stack.push((current, true));
            for &child in self.nodes[current.0].children.iter().rev() {
                stack.push((child, false));
            }
        }
        out
    }

    /// Leaves under the root, left to right.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|id| self.nodes[id.0].is_leaf())
            .collect()
    }

    /// Ancestors of `id` starting with its parent and ending with the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            out.push(parent);
            current = self.nodes[parent.0].parent;
        }
        out
    }

    /// Copy without the descendants of every node `is_collapsed` accepts.
    ///
    /// Collapsed nodes keep their aggregate value and become leaves; heights
    /// are recomputed. Child order is preserved.
    pub fn without_descendants<F>(&self, mut is_collapsed: F) -> Hierarchy
    where
        F: FnMut(&TreeNode) -> bool,
    {
        let n = self.nodes.len();
        let mut remap: Vec<Option<NodeId>> = vec![None; n];
        let mut open = vec![false; n];
        let mut nodes: Vec<TreeNode> = Vec::with_capacity(n);
        let mut index = HashMap::with_capacity(n);

        // Parents precede children, so one forward pass decides visibility.
        for (i, node) in self.nodes.iter().enumerate() {
            let parent = match node.parent {
                Some(p) if !open[p.0] => continue,
                Some(p) => remap[p.0],
                None => None,
            };
            open[i] = !is_collapsed(node);
            let id = NodeId(nodes.len());
            remap[i] = Some(id);
            index.insert(node.key.clone(), id);
            nodes.push(TreeNode {
                parent,
                children: Vec::new(),
                height: 0,
                ..node.clone()
            });
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if let (Some(id), true) = (remap[i], open[i]) {
                nodes[id.0].children = node.children.iter().filter_map(|c| remap[c.0]).collect();
            }
        }
        for i in (1..nodes.len()).rev() {
            if let Some(parent) = nodes[i].parent {
                let height = nodes[i].height;
                let parent_node = &mut nodes[parent.0];
                parent_node.height = parent_node.height.max(height + 1);
            }
        }

        Hierarchy::from_parts(nodes, index)
    }

    /// Reorders every child list with `compare`.
    pub fn sort_children_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&TreeNode, &TreeNode) -> Ordering,
    {
        for i in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[i].children);
            children.sort_by(|a, b| compare(&self.nodes[a.0], &self.nodes[b.0]));
            self.nodes[i].children = children;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DataRecord;

    fn sample() -> Hierarchy {
        let records = vec![
            DataRecord::new(["US", "East", "Ontario"], 1.0),
            DataRecord::new(["US", "West", "Colorado"], 2.0),
            DataRecord::new(["CA", "East", "Ontario"], 4.0),
        ];
        TreeBuilder::new(&DataRecord::accessors()).build(&records).unwrap()
    }

    #[test]
    fn test_traversals() {
        let h = sample();
        let order: Vec<String> = h
            .descendants(h.root())
            .into_iter()
            .map(|id| h.node(id).key.to_string())
            .collect();
        assert_eq!(
            order,
            vec!["", "CA", "CA/East", "CA/East/Ontario", "US", "US/East", "US/East/Ontario", "US/West", "US/West/Colorado"]
        );

        let post: Vec<String> = h
            .post_order(h.root())
            .into_iter()
            .map(|id| h.node(id).key.to_string())
            .collect();
        assert_eq!(post.first().map(String::as_str), Some("CA/East/Ontario"));
        assert_eq!(post.last().map(String::as_str), Some(""));

        assert_eq!(h.leaves().len(), 3);
        assert_eq!(h.max_depth(), 3);
    }

    #[test]
    fn test_ancestors_and_find() {
        let h = sample();
        let id = h.find(&PathKey::from(["US", "West", "Colorado"])).unwrap();
        let chain: Vec<String> = h
            .ancestors(id)
            .into_iter()
            .map(|a| h.node(a).key.to_string())
            .collect();
        assert_eq!(chain, vec!["US/West", "US", ""]);
        assert!(h.find(&PathKey::from(["MX"])).is_none());
        assert_eq!(h.record_index(id), Some(1));
    }

    #[test]
    fn test_sort_children_by_value() {
        let mut h = sample();
        h.sort_children_by(|a, b| b.value.total_cmp(&a.value));
        let top: Vec<String> = h
            .children(h.root())
            .iter()
            .map(|&c| h.node(c).key.to_string())
            .collect();
        assert_eq!(top, vec!["CA", "US"]);

        h.sort_children_by(|a, b| a.value.total_cmp(&b.value));
        let us = h.find(&PathKey::from(["US"])).unwrap();
        assert_eq!(h.node(h.children(h.root())[0]).key, PathKey::from(["US"]));
        assert_eq!(h.children(us).len(), 2);
    }

    #[test]
    fn test_without_descendants_prunes_subtrees() {
        let h = sample();
        let us = PathKey::from(["US"]);
        let pruned = h.without_descendants(|node| node.key == us);

        assert_eq!(pruned.len(), 5);
        let us_id = pruned.find(&us).unwrap();
        assert!(pruned.node(us_id).is_leaf());
        assert_eq!(pruned.node(us_id).value, 3.0);
        assert!(pruned.find(&PathKey::from(["US", "East"])).is_none());
        assert_eq!(pruned.node(pruned.root()).value, 7.0);
        assert_eq!(pruned.max_depth(), 3);

        let ca = pruned.find(&PathKey::from(["CA"])).unwrap();
        assert_eq!(pruned.parent(ca), Some(pruned.root()));
        for id in pruned.ids() {
            for &child in pruned.children(id) {
                assert!(child.0 > id.0);
                assert_eq!(pruned.parent(child), Some(id));
            }
        }

        let only_root = h.without_descendants(|node| node.key.is_root());
        assert_eq!(only_root.len(), 1);
        assert_eq!(only_root.max_depth(), 0);
    }
}
