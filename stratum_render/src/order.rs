// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-order synchronization.
//!
//! [`RenderOrder`] keeps one [`RenderRecord`] per node reachable from the
//! root, sorted by ascending depth. Records persist across frames so their
//! backend caches survive; [`reconcile`](RenderOrder::reconcile) brings the
//! sequence back in line with the tree after arbitrary mutation:
//!
//! - Nodes reached for the first time get a record inserted after every
//!   record of lower or equal depth, so equal depths keep first-seen-first
//!   order.
//! - Represented nodes whose depth changed are moved to their new position,
//!   keeping their cache.
//! - Represented nodes not reached by the walk are dropped, cache and all.
//!
//! The pass is two-phase: the tree is walked first and the sequence is only
//! touched once the walk has succeeded, so an error leaves it as it was.

use std::fmt;

use slotmap::SecondaryMap;
use stratum_core::error::SceneError;
use stratum_core::input::PaintOrder;
use stratum_core::scene::{NodeId, SceneTree};
use tracing::{debug, instrument};

use crate::backend::Backend;
use crate::record::RenderRecord;

/// What a reconciliation pass changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ReconcileChanges {
    /// Records created for newly reachable nodes.
    pub added: usize,
    /// Records dropped for nodes no longer reachable.
    pub removed: usize,
    /// Records moved because their node's depth changed.
    pub repositioned: usize,
}

impl ReconcileChanges {
    /// Returns `true` if the pass changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.repositioned == 0
    }
}

/// Persistent depth-sorted sequence of render records.
pub struct RenderOrder<B: Backend> {
    records: Vec<RenderRecord<B>>,
    /// Depth each represented node was last sorted at.
    members: SecondaryMap<NodeId, f64>,
    /// Index of each node's record in `records`.
    positions: SecondaryMap<NodeId, usize>,
    synced_version: Option<u64>,
}

impl<B: Backend> Default for RenderOrder<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> fmt::Debug for RenderOrder<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOrder")
            .field("records", &self.records)
            .field("synced_version", &self.synced_version)
            .finish_non_exhaustive()
    }
}

impl<B: Backend> RenderOrder<B> {
    /// Creates an empty order that will reconcile on first use.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            members: SecondaryMap::new(),
            positions: SecondaryMap::new(),
            synced_version: None,
        }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns whether `node` currently has a record.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.members.contains_key(node)
    }

    /// Iterates records in ascending depth order.
    pub fn iter(&self) -> impl Iterator<Item = &RenderRecord<B>> {
        self.records.iter()
    }

    /// Iterates node handles in ascending depth order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.records.iter().map(RenderRecord::node)
    }

    /// Index of `node`'s record in draw order, or `None` if it has none.
    /// Larger positions are painted later, on top.
    #[must_use]
    pub fn paint_position(&self, node: NodeId) -> Option<usize> {
        self.positions.get(node).copied()
    }

    pub(crate) fn records_mut(&mut self) -> &mut [RenderRecord<B>] {
        &mut self.records
    }

    /// The tree structure version the order was last reconciled against.
    #[must_use]
    pub fn synced_version(&self) -> Option<u64> {
        self.synced_version
    }

    /// Returns `true` if the tree's structure changed since the last
    /// successful reconciliation.
    #[must_use]
    pub fn needs_reconcile(&self, tree: &SceneTree) -> bool {
        self.synced_version != Some(tree.structure_version())
    }

    /// Forces the next [`needs_reconcile`](Self::needs_reconcile) to report
    /// `true`, e.g. after switching roots.
    pub fn invalidate(&mut self) {
        self.synced_version = None;
    }

    /// Synchronizes the sequence with the subtree at `root`.
    ///
    /// Children are visited in name order, depth first. Nodes destroyed
    /// while the walk is in progress are treated as unreachable.
    ///
    /// # Errors
    ///
    /// - [`SceneError::StaleNode`] if `root` has been destroyed.
    /// - [`SceneError::DuplicateNodeInTree`] if the walk reaches a node
    ///   twice.
    ///
    /// The sequence is unchanged when an error is returned.
    #[instrument(skip_all, fields(root = ?root))]
    pub fn reconcile(
        &mut self,
        tree: &SceneTree,
        root: NodeId,
    ) -> Result<ReconcileChanges, SceneError> {
        let version = tree.structure_version();
        let visited = walk(tree, root)?;

        let mut changes = ReconcileChanges::default();

        let before = self.records.len();
        self.records.retain(|record| visited.contains_key(record.node));
        changes.removed = before - self.records.len();
        self.members.retain(|node, _| visited.contains_key(node));

        for &(node, depth) in visited.iter() {
            match self.members.get(node).copied() {
                Some(sorted_at) if sorted_at.total_cmp(&depth).is_eq() => {}
                Some(_) => {
                    let Some(index) = self.records.iter().position(|r| r.node == node) else {
                        continue;
                    };
                    let mut record = self.records.remove(index);
                    record.depth = depth;
                    self.insert_sorted(record);
                    self.members.insert(node, depth);
                    changes.repositioned += 1;
                }
                None => {
                    self.insert_sorted(RenderRecord::new(node, depth));
                    self.members.insert(node, depth);
                    changes.added += 1;
                }
            }
        }

        self.positions.clear();
        for (index, record) in self.records.iter().enumerate() {
            self.positions.insert(record.node, index);
        }
        self.synced_version = Some(version);
        debug!(
            added = changes.added,
            removed = changes.removed,
            repositioned = changes.repositioned,
            len = self.records.len(),
            "reconciled render order"
        );
        Ok(changes)
    }

    /// Inserts after every record whose depth is `<=` the new one.
    fn insert_sorted(&mut self, record: RenderRecord<B>) {
        let at = self
            .records
            .partition_point(|existing| existing.depth.total_cmp(&record.depth).is_le());
        self.records.insert(at, record);
    }
}

impl<B: Backend> PaintOrder for RenderOrder<B> {
    fn paint_position(&self, node: NodeId) -> Option<usize> {
        Self::paint_position(self, node)
    }
}

/// Collects every node reachable from `root`, with its depth, in pre-order.
fn walk(tree: &SceneTree, root: NodeId) -> Result<VisitOrder, SceneError> {
    let mut visited = VisitOrder::default();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let depth = match tree.depth(node) {
            Ok(depth) => depth,
            Err(err) if node == root => return Err(err),
            Err(_) => continue,
        };
        if !visited.push(node, depth) {
            return Err(SceneError::DuplicateNodeInTree {
                node,
                name: tree.name(node).unwrap_or_default(),
            });
        }
        let children = match tree.children(node) {
            Ok(children) => children,
            Err(err) if node == root => return Err(err),
            Err(_) => continue,
        };
        stack.extend(children.into_iter().rev());
    }
    Ok(visited)
}

/// Insertion-ordered visited set.
#[derive(Default)]
struct VisitOrder {
    order: Vec<(NodeId, f64)>,
    seen: SecondaryMap<NodeId, ()>,
}

impl VisitOrder {
    fn push(&mut self, node: NodeId, depth: f64) -> bool {
        if self.seen.insert(node, ()).is_some() {
            return false;
        }
        self.order.push((node, depth));
        true
    }

    fn contains_key(&self, node: NodeId) -> bool {
        self.seen.contains_key(node)
    }

    fn iter(&self) -> impl Iterator<Item = &(NodeId, f64)> {
        self.order.iter()
    }
}

#[cfg(test)]
mod tests {
    use stratum_core::scene::NodeDesc;

    use super::*;
    use crate::testing::NullBackend;

    fn at_depth(depth: f64) -> NodeDesc {
        NodeDesc::base().with_depth(depth)
    }

    #[test]
    fn first_reconcile_sorts_by_depth() {
        let tree = SceneTree::new();
        let root = tree.create_root(at_depth(0.0), "root");
        let a = tree.create_node(at_depth(1.0));
        let b = tree.create_node(at_depth(2.0));
        tree.add_child(root, "a", a).unwrap();
        tree.add_child(root, "b", b).unwrap();

        let mut order = RenderOrder::<NullBackend>::new();
        assert!(order.needs_reconcile(&tree), "fresh order is unsynced");
        let changes = order.reconcile(&tree, root).unwrap();
        assert_eq!(changes.added, 3);
        assert_eq!(order.nodes().collect::<Vec<_>>(), vec![root, a, b]);
        assert!(!order.needs_reconcile(&tree), "synced after reconcile");
    }

    #[test]
    fn removal_drops_records() {
        let tree = SceneTree::new();
        let root = tree.create_root(at_depth(0.0), "root");
        let a = tree.create_node(at_depth(1.0));
        let b = tree.create_node(at_depth(2.0));
        tree.add_child(root, "a", a).unwrap();
        tree.add_child(root, "b", b).unwrap();
        let mut order = RenderOrder::<NullBackend>::new();
        order.reconcile(&tree, root).unwrap();

        tree.remove_child(root, "a").unwrap();
        assert!(order.needs_reconcile(&tree), "removal bumps the version");
        let changes = order.reconcile(&tree, root).unwrap();
        assert_eq!(changes.removed, 1);
        assert_eq!(order.nodes().collect::<Vec<_>>(), vec![root, b]);
        assert!(!order.contains(a), "detached node is no longer represented");
    }

    #[test]
    fn equal_depths_keep_first_seen_order() {
        let tree = SceneTree::new();
        let root = tree.create_root(at_depth(0.0), "root");
        let first = tree.create_node(at_depth(1.0));
        tree.add_child(root, "first", first).unwrap();
        let mut order = RenderOrder::<NullBackend>::new();
        order.reconcile(&tree, root).unwrap();

        // "a" sorts before "first" by name but is seen in a later pass.
        let later = tree.create_node(at_depth(1.0));
        tree.add_child(root, "a", later).unwrap();
        order.reconcile(&tree, root).unwrap();
        assert_eq!(order.nodes().collect::<Vec<_>>(), vec![root, first, later]);
    }

    #[test]
    fn depth_change_repositions() {
        let tree = SceneTree::new();
        let root = tree.create_root(at_depth(0.0), "root");
        let a = tree.create_node(at_depth(1.0));
        let b = tree.create_node(at_depth(2.0));
        tree.add_child(root, "a", a).unwrap();
        tree.add_child(root, "b", b).unwrap();
        let mut order = RenderOrder::<NullBackend>::new();
        order.reconcile(&tree, root).unwrap();

        tree.set_depth(a, 3.0).unwrap();
        let changes = order.reconcile(&tree, root).unwrap();
        assert_eq!(changes.repositioned, 1);
        assert_eq!(order.nodes().collect::<Vec<_>>(), vec![root, b, a]);
    }

    #[test]
    fn reattached_subtree_is_reinserted() {
        let tree = SceneTree::new();
        let root = tree.create_root(at_depth(0.0), "root");
        let group = tree.create_node(at_depth(5.0));
        let leaf = tree.create_node(at_depth(-1.0));
        tree.add_child(root, "group", group).unwrap();
        tree.add_child(group, "leaf", leaf).unwrap();
        let mut order = RenderOrder::<NullBackend>::new();
        order.reconcile(&tree, root).unwrap();
        assert_eq!(order.nodes().collect::<Vec<_>>(), vec![leaf, root, group]);

        tree.remove_child(root, "group").unwrap();
        order.reconcile(&tree, root).unwrap();
        assert_eq!(order.len(), 1);

        tree.add_child(root, "group", group).unwrap();
        let changes = order.reconcile(&tree, root).unwrap();
        assert_eq!(changes.added, 2);
        assert_eq!(order.nodes().collect::<Vec<_>>(), vec![leaf, root, group]);
    }

    #[test]
    fn destroyed_root_is_an_error_and_keeps_records() {
        let tree = SceneTree::new();
        let root = tree.create_root(at_depth(0.0), "root");
        let mut order = RenderOrder::<NullBackend>::new();
        order.reconcile(&tree, root).unwrap();

        tree.destroy_node(root).unwrap();
        assert_eq!(
            order.reconcile(&tree, root),
            Err(SceneError::StaleNode(root))
        );
        assert_eq!(order.len(), 1, "failed pass leaves the sequence alone");
        assert!(order.needs_reconcile(&tree), "version moved on destroy");
    }

    #[test]
    fn unchanged_tree_reconciles_to_nothing() {
        let tree = SceneTree::new();
        let root = tree.create_root(at_depth(0.0), "root");
        let mut order = RenderOrder::<NullBackend>::new();
        order.reconcile(&tree, root).unwrap();
        assert!(
            order.reconcile(&tree, root).unwrap().is_empty(),
            "second pass is a no-op"
        );
    }

    #[test]
    fn paint_positions_follow_the_sequence() {
        let tree = SceneTree::new();
        let root = tree.create_root(at_depth(0.0), "root");
        let a = tree.create_node(at_depth(2.0));
        let b = tree.create_node(at_depth(1.0));
        tree.add_child(root, "a", a).unwrap();
        tree.add_child(root, "b", b).unwrap();
        let mut order = RenderOrder::<NullBackend>::new();
        assert_eq!(order.paint_position(root), None, "nothing before a pass");

        order.reconcile(&tree, root).unwrap();
        assert_eq!(order.paint_position(root), Some(0));
        assert_eq!(order.paint_position(b), Some(1));
        assert_eq!(order.paint_position(a), Some(2));

        tree.remove_child(root, "b").unwrap();
        order.reconcile(&tree, root).unwrap();
        assert_eq!(order.paint_position(b), None);
        assert_eq!(order.paint_position(a), Some(1));
    }

    #[test]
    fn node_reached_twice_is_rejected_and_keeps_records() {
        let tree = SceneTree::new();
        let root = tree.create_root(at_depth(0.0), "root");
        let a = tree.create_node(at_depth(1.0));
        let b = tree.create_node(at_depth(2.0));
        tree.add_child(root, "a", a).unwrap();
        tree.add_child(root, "b", b).unwrap();
        let mut order = RenderOrder::<NullBackend>::new();
        order.reconcile(&tree, root).unwrap();

        // Second edge into `a`, bypassing the single-parent check.
        tree.link_unchecked(b, "again", a).unwrap();
        assert!(order.needs_reconcile(&tree));
        assert!(matches!(
            order.reconcile(&tree, root),
            Err(SceneError::DuplicateNodeInTree { node, .. }) if node == a
        ));
        assert_eq!(order.nodes().collect::<Vec<_>>(), vec![root, a, b]);
        assert_eq!(order.paint_position(b), Some(2));
        assert!(order.needs_reconcile(&tree), "failed pass does not sync");
    }

}
