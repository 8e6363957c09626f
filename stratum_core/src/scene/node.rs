// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node storage, construction descriptors, and read-only snapshots.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kurbo::{Point, Rect, Size};
use parking_lot::Mutex;

use super::id::NodeId;
use super::kind::NodeKind;
use crate::input::PointerListener;

/// Initial attributes for a node created with
/// [`SceneTree::create_node`](super::SceneTree::create_node).
///
/// ```
/// use kurbo::{Point, Size};
/// use stratum_core::scene::NodeDesc;
///
/// let desc = NodeDesc::base()
///     .with_depth(2.0)
///     .with_position(Point::new(10.0, 10.0))
///     .with_dimensions(Size::new(80.0, 24.0));
/// assert_eq!(desc.depth, 2.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeDesc {
    /// Paint and hit-test ordering key.
    pub depth: f64,
    /// Offset from the parent's origin.
    pub relative_position: Point,
    /// Width and height.
    pub dimensions: Size,
    /// Whether the node starts hidden.
    pub hidden: bool,
    /// Node kind and content.
    pub kind: NodeKind,
}

impl NodeDesc {
    /// A visible [`NodeKind::Base`] node at the origin with zero size.
    #[must_use]
    pub fn base() -> Self {
        Self::default()
    }

    /// A visible node of the given kind.
    #[must_use]
    pub fn of_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Sets the depth.
    #[must_use]
    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }

    /// Sets the offset from the parent's origin.
    #[must_use]
    pub fn with_position(mut self, position: Point) -> Self {
        self.relative_position = position;
        self
    }

    /// Sets the width and height.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: Size) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Sets the initial hidden flag.
    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// Lock-protected node state.
pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: BTreeMap<String, NodeId>,
    pub(crate) listeners: BTreeMap<String, Arc<dyn PointerListener>>,
    pub(crate) depth: f64,
    pub(crate) relative_position: Point,
    pub(crate) dimensions: Size,
    pub(crate) hidden: bool,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub(crate) fn from_desc(desc: NodeDesc, name: String) -> Self {
        Self {
            name,
            parent: None,
            children: BTreeMap::new(),
            listeners: BTreeMap::new(),
            depth: desc.depth,
            relative_position: desc.relative_position,
            dimensions: desc.dimensions,
            hidden: desc.hidden,
            kind: desc.kind,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("listeners", &self.listeners.keys().collect::<Vec<_>>())
            .field("depth", &self.depth)
            .field("relative_position", &self.relative_position)
            .field("dimensions", &self.dimensions)
            .field("hidden", &self.hidden)
            .field("kind", &self.kind.tag())
            .finish()
    }
}

/// Arena slot: the node's lock plus the state readable without it.
#[derive(Debug)]
pub(crate) struct NodeCell {
    pub(crate) modified: AtomicBool,
    pub(crate) state: Mutex<Node>,
}

impl NodeCell {
    pub(crate) fn new(node: Node) -> Self {
        Self {
            // New nodes have never been drawn.
            modified: AtomicBool::new(true),
            state: Mutex::new(node),
        }
    }

    #[inline]
    pub(crate) fn touch(&self) {
        self.modified.store(true, Ordering::Release);
    }

    #[inline]
    pub(crate) fn is_modified(&self) -> bool {
        self.modified.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn take_modified(&self) -> bool {
        self.modified.swap(false, Ordering::AcqRel)
    }

    #[inline]
    pub(crate) fn clear(&self) {
        self.modified.store(false, Ordering::Release);
    }
}

/// A read-only copy of a node's drawable state.
///
/// Produced by [`SceneTree::snapshot`](super::SceneTree::snapshot) for
/// rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSnapshot {
    /// The node's handle.
    pub id: NodeId,
    /// The node's name among its siblings.
    pub name: String,
    /// Absolute bounds (origin summed up the parent chain, plus dimensions).
    pub bounds: Rect,
    /// Paint ordering key.
    pub depth: f64,
    /// Whether the node is hidden.
    pub hidden: bool,
    /// Whether the node has changed since it was last drawn.
    pub modified: bool,
    /// Kind and content.
    pub kind: NodeKind,
}
