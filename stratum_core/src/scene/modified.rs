// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modification tracking queries.

use slotmap::SecondaryMap;

use super::id::NodeId;
use super::tree::SceneTree;
use crate::error::SceneError;

impl SceneTree {
    /// Returns whether the node itself has changed since it was last drawn.
    pub fn is_modified(&self, id: NodeId) -> Result<bool, SceneError> {
        Ok(self.cell(id)?.is_modified())
    }

    /// Returns `true` if `id` or any node below it is modified.
    ///
    /// Stops at the first modified node found. Descendants destroyed during
    /// the walk are skipped.
    pub fn is_subtree_modified(&self, id: NodeId) -> Result<bool, SceneError> {
        let mut stack = vec![id];
        let mut seen = SecondaryMap::new();
        let mut first = true;
        while let Some(node) = stack.pop() {
            if seen.insert(node, ()).is_some() {
                continue;
            }
            let cell = match self.cell(node) {
                Ok(cell) => cell,
                Err(err) if first => return Err(err),
                Err(_) => continue,
            };
            first = false;
            if cell.is_modified() {
                return Ok(true);
            }
            stack.extend(cell.state.lock().children.values().copied());
        }
        Ok(false)
    }

    /// Clears the node's own modified flag. Descendants keep theirs.
    pub fn clear_modified(&self, id: NodeId) -> Result<(), SceneError> {
        self.cell(id)?.clear();
        Ok(())
    }

    /// Sets the node's modified flag without changing anything else.
    ///
    /// Useful when something outside the tree (a font load, a resized
    /// backing texture) invalidates a node's last draw.
    pub fn mark_modified(&self, id: NodeId) -> Result<(), SceneError> {
        self.cell(id)?.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};

    use crate::scene::{NodeDesc, SceneTree};

    #[test]
    fn new_nodes_start_modified() {
        let tree = SceneTree::new();
        let node = tree.create_node(NodeDesc::base());
        assert!(tree.is_modified(node).unwrap());
        tree.clear_modified(node).unwrap();
        assert!(!tree.is_modified(node).unwrap());
    }

    #[test]
    fn subtree_query_sees_deep_changes() {
        let tree = SceneTree::new();
        let root = tree.create_root(NodeDesc::base(), "root");
        let mid = tree.create_node(NodeDesc::base());
        let leaf = tree.create_node(NodeDesc::base());
        tree.add_child(root, "mid", mid).unwrap();
        tree.add_child(mid, "leaf", leaf).unwrap();
        for node in [root, mid, leaf] {
            tree.clear_modified(node).unwrap();
        }
        assert!(!tree.is_subtree_modified(root).unwrap());

        tree.set_dimensions(leaf, Size::new(3.0, 3.0)).unwrap();
        assert!(tree.is_subtree_modified(root).unwrap());
        assert!(!tree.is_modified(root).unwrap(), "ancestors are not flagged");

        tree.clear_modified(leaf).unwrap();
        assert!(!tree.is_subtree_modified(root).unwrap());
    }

    #[test]
    fn clear_is_not_recursive() {
        let tree = SceneTree::new();
        let root = tree.create_root(NodeDesc::base(), "root");
        let child = tree.create_node(NodeDesc::base());
        tree.add_child(root, "child", child).unwrap();

        tree.clear_modified(root).unwrap();
        assert!(!tree.is_modified(root).unwrap());
        assert!(tree.is_modified(child).unwrap());
        assert!(tree.is_subtree_modified(root).unwrap());
    }

    #[test]
    fn structural_changes_flag_both_ends() {
        let tree = SceneTree::new();
        let root = tree.create_root(NodeDesc::base(), "root");
        let child = tree.create_node(NodeDesc::base());
        tree.clear_modified(root).unwrap();
        tree.clear_modified(child).unwrap();

        tree.add_child(root, "child", child).unwrap();
        assert!(tree.is_modified(root).unwrap());
        assert!(tree.is_modified(child).unwrap());

        tree.clear_modified(root).unwrap();
        tree.remove_child(root, "child").unwrap();
        assert!(tree.is_modified(root).unwrap());
    }

    #[test]
    fn mark_modified_sets_flag_only() {
        let tree = SceneTree::new();
        let node = tree.create_node(NodeDesc::base().with_position(Point::new(1.0, 1.0)));
        tree.clear_modified(node).unwrap();
        tree.mark_modified(node).unwrap();
        assert!(tree.is_modified(node).unwrap());
        assert_eq!(tree.relative_position(node), Ok(Point::new(1.0, 1.0)));
    }
}
