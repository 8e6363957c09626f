// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing against node bounding boxes.
//!
//! Hits are ordered the way a viewer sees them: greater depth in front, and
//! among equal depths, whatever was painted later in front. Paint order for
//! equal depths comes from a [`PaintOrder`] (normally the render order); nodes
//! it does not know yet are treated as painted after every node it does
//! know, in tree walk order (depth first, children in name order), which is
//! where the next reconciliation will put them.

use std::cmp::Ordering;

use kurbo::{Point, Rect};
use slotmap::SecondaryMap;

use crate::config::HitTestPolicy;
use crate::error::SceneError;
use crate::scene::{NodeId, SceneTree};

/// Source of paint positions for breaking depth ties.
pub trait PaintOrder {
    /// Position of `node` in paint order, `0` painted first, or `None` if
    /// the node has not been placed yet.
    fn paint_position(&self, node: NodeId) -> Option<usize>;
}

/// No paint positions known: ties fall back to tree walk order.
impl PaintOrder for () {
    fn paint_position(&self, _: NodeId) -> Option<usize> {
        None
    }
}

/// One node under the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitEntry {
    /// The node hit.
    pub node: NodeId,
    /// Its depth at the time of the test.
    pub depth: f64,
    /// Its paint position, if the [`PaintOrder`] knew it.
    pub painted: Option<usize>,
    /// Its index in the tree walk, depth first with children in name order.
    pub visit: usize,
}

impl HitEntry {
    /// Front-to-back order: greater depth first, then painted later first.
    fn front_to_back(&self, other: &Self) -> Ordering {
        other
            .depth
            .total_cmp(&self.depth)
            .then_with(|| match (self.painted, other.painted) {
                (Some(a), Some(b)) => b.cmp(&a),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| other.visit.cmp(&self.visit))
    }
}

/// The nodes under the pointer, ordered front to back.
///
/// Index `i` of the set is the `stack_index` reported to listeners.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HitSet {
    entries: Vec<HitEntry>,
}

impl HitSet {
    /// Builds a set from unordered entries. A node listed twice keeps its
    /// front-most entry.
    #[must_use]
    pub fn from_entries(mut entries: Vec<HitEntry>) -> Self {
        entries.sort_by(HitEntry::front_to_back);
        let mut seen = SecondaryMap::new();
        entries.retain(|entry| seen.insert(entry.node, ()).is_none());
        Self { entries }
    }

    /// Number of nodes hit.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was hit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns whether `node` is in the set.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.iter().any(|entry| entry.node == node)
    }

    /// The front-most node, if any.
    #[must_use]
    pub fn front(&self) -> Option<NodeId> {
        self.entries.first().map(|entry| entry.node)
    }

    /// Iterates entries front to back.
    pub fn iter(&self) -> impl Iterator<Item = &HitEntry> {
        self.entries.iter()
    }

    /// Iterates node handles front to back.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|entry| entry.node)
    }

    /// Entries of `self` whose node is not in `other`, in `self`'s order.
    pub fn difference<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = &'a HitEntry> {
        self.entries
            .iter()
            .filter(move |entry| !other.contains(entry.node))
    }
}

/// Strict interior containment: points on an edge are outside.
#[inline]
fn strictly_contains(rect: Rect, point: Point) -> bool {
    rect.x0 < point.x && point.x < rect.x1 && rect.y0 < point.y && point.y < rect.y1
}

impl SceneTree {
    /// Returns every node at or below `root` whose absolute box strictly
    /// contains `point`, breaking depth ties by tree walk order.
    ///
    /// Walks the whole subtree; containment of a parent says nothing about
    /// its children. Each node is read under its own lock, so a concurrent
    /// move may be seen by some levels and not others.
    pub fn hit_test(
        &self,
        root: NodeId,
        point: Point,
        policy: HitTestPolicy,
    ) -> Result<HitSet, SceneError> {
        self.hit_test_with(root, point, policy, &())
    }

    /// Like [`hit_test`](Self::hit_test), breaking depth ties by
    /// `paint_order` first.
    pub fn hit_test_with(
        &self,
        root: NodeId,
        point: Point,
        policy: HitTestPolicy,
        paint_order: &dyn PaintOrder,
    ) -> Result<HitSet, SceneError> {
        let origin = match self.parent(root)? {
            Some(parent) => self.absolute_position(parent)?,
            None => Point::ZERO,
        };

        let mut hits = Vec::new();
        let mut seen = SecondaryMap::new();
        let mut visit = 0;
        let mut stack = vec![(root, origin)];
        while let Some((node, parent_origin)) = stack.pop() {
            if seen.insert(node, ()).is_some() {
                continue;
            }
            let Ok(cell) = self.cell(node) else {
                continue;
            };
            let state = cell.state.lock();
            let position = parent_origin + state.relative_position.to_vec2();
            let rect = Rect::from_origin_size(position, state.dimensions);
            let eligible = match policy {
                HitTestPolicy::IncludeHidden => true,
                HitTestPolicy::VisibleOnly => !state.hidden,
            };
            if eligible && strictly_contains(rect, point) {
                hits.push(HitEntry {
                    node,
                    depth: state.depth,
                    painted: paint_order.paint_position(node),
                    visit,
                });
            }
            visit += 1;
            stack.extend(state.children.values().rev().map(|child| (*child, position)));
        }
        Ok(HitSet::from_entries(hits))
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::*;
    use crate::scene::NodeDesc;

    fn boxed(x: f64, y: f64, w: f64, h: f64, depth: f64) -> NodeDesc {
        NodeDesc::base()
            .with_position(Point::new(x, y))
            .with_dimensions(Size::new(w, h))
            .with_depth(depth)
    }

    #[test]
    fn edges_are_outside() {
        let tree = SceneTree::new();
        let root = tree.create_root(boxed(0.0, 0.0, 10.0, 10.0, 0.0), "root");
        let at = |x, y| {
            tree.hit_test(root, Point::new(x, y), HitTestPolicy::default())
                .unwrap()
        };
        assert!(at(0.0, 5.0).is_empty());
        assert!(at(10.0, 5.0).is_empty());
        assert!(at(5.0, 0.0).is_empty());
        assert_eq!(at(5.0, 5.0).front(), Some(root));
    }

    #[test]
    fn ordered_by_depth_then_walk_order() {
        let tree = SceneTree::new();
        let root = tree.create_root(boxed(0.0, 0.0, 100.0, 100.0, 0.0), "root");
        let low = tree.create_node(boxed(0.0, 0.0, 50.0, 50.0, 1.0));
        let tie_b = tree.create_node(boxed(0.0, 0.0, 50.0, 50.0, 5.0));
        let tie_a = tree.create_node(boxed(0.0, 0.0, 50.0, 50.0, 5.0));
        tree.add_child(root, "low", low).unwrap();
        tree.add_child(root, "a", tie_a).unwrap();
        tree.add_child(low, "b", tie_b).unwrap();

        // Walk: root, a, low, b. `b` is visited after `a`, so it paints on top.
        let hits = tree
            .hit_test(root, Point::new(10.0, 10.0), HitTestPolicy::default())
            .unwrap();
        assert_eq!(hits.nodes().collect::<Vec<_>>(), vec![tie_b, tie_a, low, root]);
    }

    #[test]
    fn equal_depth_ties_ignore_creation_order() {
        let tree = SceneTree::new();
        let root = tree.create_root(boxed(0.0, 0.0, 100.0, 100.0, 0.0), "root");
        let b = tree.create_node(boxed(0.0, 0.0, 50.0, 50.0, 1.0));
        let a = tree.create_node(boxed(0.0, 0.0, 50.0, 50.0, 1.0));
        tree.add_child(root, "b", b).unwrap();
        tree.add_child(root, "a", a).unwrap();

        // Name order paints "a" then "b", so "b" is in front.
        let hits = tree
            .hit_test(root, Point::new(10.0, 10.0), HitTestPolicy::default())
            .unwrap();
        assert_eq!(hits.front(), Some(b));
    }

    struct Positions(Vec<NodeId>);

    impl PaintOrder for Positions {
        fn paint_position(&self, node: NodeId) -> Option<usize> {
            self.0.iter().position(|n| *n == node)
        }
    }

    #[test]
    fn paint_positions_override_walk_order() {
        let tree = SceneTree::new();
        let root = tree.create_root(boxed(0.0, 0.0, 100.0, 100.0, 0.0), "root");
        let a = tree.create_node(boxed(0.0, 0.0, 50.0, 50.0, 1.0));
        let b = tree.create_node(boxed(0.0, 0.0, 50.0, 50.0, 1.0));
        let c = tree.create_node(boxed(0.0, 0.0, 50.0, 50.0, 1.0));
        tree.add_child(root, "a", a).unwrap();
        tree.add_child(root, "b", b).unwrap();
        tree.add_child(root, "c", c).unwrap();
        let point = Point::new(10.0, 10.0);

        // `b` was placed after `a`; `c` is not placed yet and goes on top.
        let order = Positions(vec![root, b, a]);
        let hits = tree
            .hit_test_with(root, point, HitTestPolicy::default(), &order)
            .unwrap();
        assert_eq!(hits.nodes().collect::<Vec<_>>(), vec![c, a, b, root]);
    }

    #[test]
    fn children_hit_outside_parent_box() {
        let tree = SceneTree::new();
        let root = tree.create_root(boxed(0.0, 0.0, 10.0, 10.0, 0.0), "root");
        let child = tree.create_node(boxed(20.0, 20.0, 10.0, 10.0, 1.0));
        tree.add_child(root, "child", child).unwrap();

        let hits = tree
            .hit_test(root, Point::new(25.0, 25.0), HitTestPolicy::default())
            .unwrap();
        assert_eq!(hits.nodes().collect::<Vec<_>>(), vec![child]);
    }

    #[test]
    fn hidden_policy() {
        let tree = SceneTree::new();
        let root = tree.create_root(boxed(0.0, 0.0, 10.0, 10.0, 0.0), "root");
        let hidden = tree.create_node(boxed(0.0, 0.0, 10.0, 10.0, 1.0).with_hidden(true));
        let inner = tree.create_node(boxed(0.0, 0.0, 10.0, 10.0, 2.0));
        tree.add_child(root, "hidden", hidden).unwrap();
        tree.add_child(hidden, "inner", inner).unwrap();
        let point = Point::new(5.0, 5.0);

        let all = tree
            .hit_test(root, point, HitTestPolicy::IncludeHidden)
            .unwrap();
        assert!(all.contains(hidden));

        let visible = tree
            .hit_test(root, point, HitTestPolicy::VisibleOnly)
            .unwrap();
        assert!(!visible.contains(hidden));
        assert!(visible.contains(inner), "hiding does not cascade");
    }

    #[test]
    fn difference_keeps_order() {
        let tree = SceneTree::new();
        let a = tree.create_node(NodeDesc::base());
        let b = tree.create_node(NodeDesc::base());
        let entry = |node, depth| HitEntry {
            node,
            depth,
            painted: None,
            visit: 0,
        };
        let before = HitSet::from_entries(vec![entry(a, 1.0), entry(b, 2.0)]);
        let after = HitSet::from_entries(vec![entry(b, 2.0)]);
        assert_eq!(
            before.difference(&after).map(|e| e.node).collect::<Vec<_>>(),
            vec![a]
        );
    }
}
