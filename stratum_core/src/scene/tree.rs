// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-backed node storage with allocation, topology, and property management.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use kurbo::{Point, Rect, Size};
use parking_lot::{Mutex, RwLock};
use slotmap::{SecondaryMap, SlotMap};
use tracing::debug;

use super::id::NodeId;
use super::kind::{ImageContent, ImageSource, KindTag, NodeKind, TextContent};
use super::node::{Node, NodeCell, NodeDesc, NodeSnapshot};
use crate::config::TreeConfig;
use crate::error::SceneError;

/// The retained scene tree.
///
/// Nodes are addressed by [`NodeId`] handles into an arena. Every method
/// takes `&self`: the arena map is only locked long enough to look up a
/// node, and each node carries its own lock, so a `SceneTree` shared through
/// an `Arc` can be mutated from several threads at once.
///
/// A tree may hold any number of detached nodes and independent roots;
/// consumers such as the render order and the pointer dispatcher are always
/// pointed at the root they should walk.
///
/// Structural edits (attach, detach, destroy) are serialized by a
/// tree-wide topology lock, so their checks and their effects are one step.
/// Reads and attribute edits never take it.
pub struct SceneTree {
    nodes: RwLock<SlotMap<NodeId, Arc<NodeCell>>>,
    topology: Mutex<()>,
    structure_version: AtomicU64,
    config: TreeConfig,
}

impl fmt::Debug for SceneTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneTree")
            .field("len", &self.len())
            .field("structure_version", &self.structure_version())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneTree {
    /// Creates an empty tree with strict error checking.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Creates an empty tree with the given configuration.
    #[must_use]
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            nodes: RwLock::new(SlotMap::with_key()),
            topology: Mutex::new(()),
            structure_version: AtomicU64::new(0),
            config,
        }
    }

    /// Returns the tree's configuration.
    #[must_use]
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Returns the number of live nodes, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    /// Returns `true` if the tree holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    /// Returns the structure version.
    ///
    /// The counter only grows. It is bumped by every change that can alter
    /// render order: attaching, detaching, or destroying nodes, and depth
    /// changes.
    #[must_use]
    pub fn structure_version(&self) -> u64 {
        self.structure_version.load(Ordering::Acquire)
    }

    // -- Allocation API --

    /// Creates a detached node and returns its handle.
    ///
    /// The node has no name until it is attached with
    /// [`add_child`](Self::add_child), and starts out modified.
    pub fn create_node(&self, desc: NodeDesc) -> NodeId {
        self.insert(desc, String::new())
    }

    /// Creates a detached node that keeps `name` as its name.
    ///
    /// Intended for roots, which are never named by a parent.
    pub fn create_root(&self, desc: NodeDesc, name: impl Into<String>) -> NodeId {
        self.insert(desc, name.into())
    }

    /// Destroys a node and its entire subtree, detaching it from its parent
    /// first. Returns the number of nodes destroyed.
    ///
    /// Handles to destroyed nodes become stale; any render records that
    /// reference them are discarded at the next reconciliation.
    pub fn destroy_node(&self, id: NodeId) -> Result<usize, SceneError> {
        let _topology = self.topology.lock();
        self.detach_locked(id)?;
        let doomed = self.subtree(id)?;
        {
            let mut nodes = self.nodes.write();
            for node in &doomed {
                nodes.remove(*node);
            }
        }
        self.bump_structure();
        debug!(node = ?id, destroyed = doomed.len(), "destroyed subtree");
        Ok(doomed.len())
    }

    /// Returns whether the handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes.read().contains_key(id)
    }

    // -- Topology API --

    /// Attaches `child` under `parent` with the name `id`.
    ///
    /// If `child` is currently attached elsewhere it is moved: the old parent
    /// loses it and is marked modified. On success the child's parent link
    /// and name are stamped, and both `parent` and `child` are marked
    /// modified.
    ///
    /// # Errors
    ///
    /// - [`SceneError::DuplicateIdentifier`] if `parent` already has a child
    ///   named `id`.
    /// - [`SceneError::DuplicateReference`] if `child` is already a child of
    ///   `parent` under another name.
    /// - [`SceneError::WouldCreateCycle`] if `child` is `parent` or one of its
    ///   ancestors.
    /// - [`SceneError::StaleNode`] if either handle is stale.
    ///
    /// The tree is unchanged when an error is returned. Without error
    /// checking the first two cases are silent no-ops.
    pub fn add_child(
        &self,
        parent: NodeId,
        id: impl Into<String>,
        child: NodeId,
    ) -> Result<(), SceneError> {
        let id = id.into();
        let _topology = self.topology.lock();
        let parent_cell = self.cell(parent)?;
        let child_cell = self.cell(child)?;

        if self.is_ancestor_or_self(child, parent) {
            let parent_name = parent_cell.state.lock().name.clone();
            return Err(SceneError::WouldCreateCycle {
                parent: parent_name,
                id,
            });
        }

        let previous = {
            let state = child_cell.state.lock();
            state.parent.map(|p| (p, state.name.clone()))
        };

        {
            let mut state = parent_cell.state.lock();
            if state.children.contains_key(&id) {
                let err = SceneError::DuplicateIdentifier {
                    parent: state.name.clone(),
                    id,
                };
                drop(state);
                return self.reject(err);
            }
            if let Some((old_parent, existing)) = &previous
                && *old_parent == parent
            {
                let err = SceneError::DuplicateReference {
                    parent: state.name.clone(),
                    existing: existing.clone(),
                    id,
                };
                drop(state);
                return self.reject(err);
            }
            state.children.insert(id.clone(), child);
        }
        parent_cell.touch();

        if let Some((old_parent, old_name)) = previous {
            if let Ok(old_cell) = self.cell(old_parent) {
                old_cell.state.lock().children.remove(&old_name);
                old_cell.touch();
            }
            debug!(child = ?child, from = ?old_parent, to = ?parent, "reparented node");
        }

        {
            let mut state = child_cell.state.lock();
            state.parent = Some(parent);
            state.name = id;
        }
        child_cell.touch();

        self.bump_structure();
        debug!(parent = ?parent, child = ?child, "attached node");
        Ok(())
    }

    /// Detaches the child named `id` from `parent` and returns its handle.
    ///
    /// The child (and its subtree) stays alive and may be attached again.
    /// `parent` is marked modified.
    ///
    /// # Errors
    ///
    /// - [`SceneError::NotFound`] if `parent` has no child named `id`
    ///   (`Ok(None)` without error checking).
    /// - [`SceneError::StaleNode`] if `parent` is stale.
    pub fn remove_child(&self, parent: NodeId, id: &str) -> Result<Option<NodeId>, SceneError> {
        let _topology = self.topology.lock();
        let parent_cell = self.cell(parent)?;
        let removed = {
            let mut state = parent_cell.state.lock();
            match state.children.remove(id) {
                Some(child) => child,
                None => {
                    let err = SceneError::NotFound {
                        parent: state.name.clone(),
                        id: id.to_owned(),
                    };
                    drop(state);
                    return self.reject(err);
                }
            }
        };
        parent_cell.touch();

        if let Ok(child_cell) = self.cell(removed) {
            let mut state = child_cell.state.lock();
            if state.parent == Some(parent) {
                state.parent = None;
            }
        }

        self.bump_structure();
        debug!(parent = ?parent, child = ?removed, "detached node");
        Ok(Some(removed))
    }

    /// Detaches `node` from whatever parent it has. Returns `false` if it was
    /// not attached.
    pub fn detach(&self, node: NodeId) -> Result<bool, SceneError> {
        let _topology = self.topology.lock();
        self.detach_locked(node)
    }

    fn detach_locked(&self, node: NodeId) -> Result<bool, SceneError> {
        let cell = self.cell(node)?;
        let (parent, name) = {
            let state = cell.state.lock();
            match state.parent {
                Some(parent) => (parent, state.name.clone()),
                None => return Ok(false),
            }
        };
        match self.cell(parent) {
            Ok(parent_cell) => {
                parent_cell.state.lock().children.remove(&name);
                parent_cell.touch();
            }
            Err(_) => debug!(node = ?node, "parent already destroyed while detaching"),
        }
        cell.state.lock().parent = None;
        self.bump_structure();
        Ok(true)
    }

    /// Looks up the child named `id`.
    ///
    /// # Errors
    ///
    /// - [`SceneError::NotFound`] if `parent` has no child named `id`
    ///   (`Ok(None)` without error checking).
    /// - [`SceneError::StaleNode`] if `parent` is stale.
    pub fn get_child(&self, parent: NodeId, id: &str) -> Result<Option<NodeId>, SceneError> {
        let cell = self.cell(parent)?;
        let state = cell.state.lock();
        match state.children.get(id) {
            Some(child) => Ok(Some(*child)),
            None => {
                let err = SceneError::NotFound {
                    parent: state.name.clone(),
                    id: id.to_owned(),
                };
                drop(state);
                self.reject(err)
            }
        }
    }

    /// Returns the names of `parent`'s children, in name order.
    pub fn list_child_ids(&self, parent: NodeId) -> Result<Vec<String>, SceneError> {
        self.with_node(parent, |node| node.children.keys().cloned().collect())
    }

    /// Returns the handles of `parent`'s children, in name order.
    pub fn children(&self, parent: NodeId) -> Result<Vec<NodeId>, SceneError> {
        self.with_node(parent, |node| node.children.values().copied().collect())
    }

    /// Returns the parent of a node, if it is attached.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, SceneError> {
        self.with_node(id, |node| node.parent)
    }

    /// Counts every node reachable below `id` (excluding `id` itself).
    pub fn count_descendants(&self, id: NodeId) -> Result<usize, SceneError> {
        Ok(self.subtree(id)?.len().saturating_sub(1))
    }

    /// Returns `id` followed by all of its descendants in depth-first
    /// pre-order, children visited in name order.
    ///
    /// Children destroyed concurrently with the walk are skipped, and a node
    /// reachable along two paths is listed once.
    pub fn subtree(&self, id: NodeId) -> Result<Vec<NodeId>, SceneError> {
        self.cell(id)?;
        let mut order = Vec::new();
        let mut seen = SecondaryMap::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            if seen.insert(node, ()).is_some() {
                continue;
            }
            let Ok(children) = self.children(node) else {
                continue;
            };
            order.push(node);
            stack.extend(children.into_iter().rev());
        }
        Ok(order)
    }

    // -- Property getters --

    /// Returns the node's name (empty for a detached, never-attached node).
    pub fn name(&self, id: NodeId) -> Result<String, SceneError> {
        self.with_node(id, |node| node.name.clone())
    }

    /// Returns the node's depth.
    pub fn depth(&self, id: NodeId) -> Result<f64, SceneError> {
        self.with_node(id, |node| node.depth)
    }

    /// Returns the node's offset from its parent's origin.
    pub fn relative_position(&self, id: NodeId) -> Result<Point, SceneError> {
        self.with_node(id, |node| node.relative_position)
    }

    /// Returns the node's width and height.
    pub fn dimensions(&self, id: NodeId) -> Result<Size, SceneError> {
        self.with_node(id, |node| node.dimensions)
    }

    /// Returns whether the node's own hidden flag is set.
    pub fn is_hidden(&self, id: NodeId) -> Result<bool, SceneError> {
        self.with_node(id, |node| node.hidden)
    }

    /// Returns the node's kind discriminant.
    pub fn kind_tag(&self, id: NodeId) -> Result<KindTag, SceneError> {
        self.with_node(id, |node| node.kind.tag())
    }

    /// Returns a copy of the node's kind and content.
    pub fn kind(&self, id: NodeId) -> Result<NodeKind, SceneError> {
        self.with_node(id, |node| node.kind.clone())
    }

    /// Returns the node's absolute position: its relative position summed
    /// with every ancestor's.
    ///
    /// Each level is read under its own lock, so under concurrent mutation
    /// the result may mix old and new positions of different ancestors.
    pub fn absolute_position(&self, id: NodeId) -> Result<Point, SceneError> {
        let cell = self.cell(id)?;
        let (mut position, mut next) = {
            let state = cell.state.lock();
            (state.relative_position, state.parent)
        };
        let mut remaining = self.len();
        while let Some(ancestor) = next {
            if remaining == 0 {
                break;
            }
            remaining -= 1;
            let Ok(cell) = self.cell(ancestor) else {
                break;
            };
            let state = cell.state.lock();
            position += state.relative_position.to_vec2();
            next = state.parent;
        }
        Ok(position)
    }

    /// Returns the node's absolute bounding box.
    pub fn bounds(&self, id: NodeId) -> Result<Rect, SceneError> {
        let origin = self.absolute_position(id)?;
        let size = self.dimensions(id)?;
        Ok(Rect::from_origin_size(origin, size))
    }

    /// Returns a read-only copy of the node's drawable state.
    pub fn snapshot(&self, id: NodeId) -> Result<NodeSnapshot, SceneError> {
        let bounds = self.bounds(id)?;
        let cell = self.cell(id)?;
        let state = cell.state.lock();
        Ok(NodeSnapshot {
            id,
            name: state.name.clone(),
            bounds,
            depth: state.depth,
            hidden: state.hidden,
            modified: cell.is_modified(),
            kind: state.kind.clone(),
        })
    }

    /// Like [`snapshot`](Self::snapshot), but clears the node's modified flag
    /// while the node is locked. The returned snapshot still reports the
    /// flag as it was.
    ///
    /// Any mutation that lands after this call marks the node modified
    /// again, so a draw pass built on it never loses a change.
    pub fn snapshot_and_clear(&self, id: NodeId) -> Result<NodeSnapshot, SceneError> {
        let bounds = self.bounds(id)?;
        let cell = self.cell(id)?;
        let state = cell.state.lock();
        let modified = cell.take_modified();
        Ok(NodeSnapshot {
            id,
            name: state.name.clone(),
            bounds,
            depth: state.depth,
            hidden: state.hidden,
            modified,
            kind: state.kind.clone(),
        })
    }

    // -- Mutation API (marks modified) --

    /// Sets the node's depth. Bumps the structure version, since depth
    /// decides render order.
    pub fn set_depth(&self, id: NodeId, depth: f64) -> Result<(), SceneError> {
        self.with_node_mut(id, |node| node.depth = depth)?;
        self.bump_structure();
        Ok(())
    }

    /// Sets the node's offset from its parent's origin.
    pub fn set_relative_position(&self, id: NodeId, position: Point) -> Result<(), SceneError> {
        self.with_node_mut(id, |node| node.relative_position = position)
    }

    /// Sets the node's width and height.
    pub fn set_dimensions(&self, id: NodeId, dimensions: Size) -> Result<(), SceneError> {
        self.with_node_mut(id, |node| node.dimensions = dimensions)
    }

    /// Edits the content of a text node. Returns `false` (and leaves the node
    /// untouched) if the node is not a text node.
    ///
    /// `edit` runs under the node's lock and must not call back into the
    /// tree.
    pub fn update_text(
        &self,
        id: NodeId,
        edit: impl FnOnce(&mut TextContent),
    ) -> Result<bool, SceneError> {
        let cell = self.cell(id)?;
        let mut state = cell.state.lock();
        let NodeKind::Text(text) = &mut state.kind else {
            return Ok(false);
        };
        edit(text);
        cell.touch();
        Ok(true)
    }

    /// Edits the content of an image node. Returns `false` (and leaves the
    /// node untouched) if the node is not an image node.
    ///
    /// `edit` runs under the node's lock and must not call back into the
    /// tree.
    pub fn update_image(
        &self,
        id: NodeId,
        edit: impl FnOnce(&mut ImageContent),
    ) -> Result<bool, SceneError> {
        let cell = self.cell(id)?;
        let mut state = cell.state.lock();
        let NodeKind::Image(image) = &mut state.kind else {
            return Ok(false);
        };
        edit(image);
        cell.touch();
        Ok(true)
    }

    /// Clears an image node's `source_changed` flag without marking it
    /// modified, provided its source is still `drawn`. Called by draw passes
    /// once the backend has loaded that source.
    ///
    /// Returns `false` if the source moved on in the meantime; the flag then
    /// stays set for the next draw.
    pub fn acknowledge_image_source(
        &self,
        id: NodeId,
        drawn: Option<&ImageSource>,
    ) -> Result<bool, SceneError> {
        let cell = self.cell(id)?;
        let mut state = cell.state.lock();
        let NodeKind::Image(image) = &mut state.kind else {
            return Ok(false);
        };
        if image.source.as_ref() != drawn {
            return Ok(false);
        }
        image.source_changed = false;
        Ok(true)
    }

    /// Clears the node's hidden flag.
    pub fn show(&self, id: NodeId) -> Result<(), SceneError> {
        self.with_node_mut(id, |node| node.hidden = false)
    }

    /// Sets the node's hidden flag.
    pub fn hide(&self, id: NodeId) -> Result<(), SceneError> {
        self.with_node_mut(id, |node| node.hidden = true)
    }

    /// Clears the hidden flag of the node and every descendant, marking each
    /// modified whether or not it was hidden.
    pub fn show_all_descendants(&self, id: NodeId) -> Result<(), SceneError> {
        self.set_hidden_recursive(id, false)
    }

    /// Sets the hidden flag of the node and every descendant, marking each
    /// modified whether or not it was visible.
    pub fn hide_all_descendants(&self, id: NodeId) -> Result<(), SceneError> {
        self.set_hidden_recursive(id, true)
    }

    /// Inserts `child` into `parent`'s child map with no checks, leaving the
    /// child's parent link alone. Can attach a node twice or close a cycle;
    /// exists so corruption handling downstream can be exercised.
    #[cfg(any(test, feature = "testing"))]
    #[doc(hidden)]
    pub fn link_unchecked(
        &self,
        parent: NodeId,
        id: impl Into<String>,
        child: NodeId,
    ) -> Result<(), SceneError> {
        let _topology = self.topology.lock();
        let cell = self.cell(parent)?;
        cell.state.lock().children.insert(id.into(), child);
        cell.touch();
        self.bump_structure();
        Ok(())
    }

    // -- Internal helpers --

    fn insert(&self, desc: NodeDesc, name: String) -> NodeId {
        let cell = Arc::new(NodeCell::new(Node::from_desc(desc, name)));
        let id = self.nodes.write().insert(cell);
        debug!(node = ?id, "created node");
        id
    }

    /// Clones the node's arena slot so its lock can be taken after the arena
    /// lock is released.
    pub(crate) fn cell(&self, id: NodeId) -> Result<Arc<NodeCell>, SceneError> {
        self.nodes
            .read()
            .get(id)
            .cloned()
            .ok_or(SceneError::StaleNode(id))
    }

    pub(crate) fn with_node<R>(
        &self,
        id: NodeId,
        f: impl FnOnce(&Node) -> R,
    ) -> Result<R, SceneError> {
        let cell = self.cell(id)?;
        let state = cell.state.lock();
        Ok(f(&state))
    }

    /// Runs `f` under the node's lock and marks the node modified.
    pub(crate) fn with_node_mut<R>(
        &self,
        id: NodeId,
        f: impl FnOnce(&mut Node) -> R,
    ) -> Result<R, SceneError> {
        let cell = self.cell(id)?;
        let result = f(&mut cell.state.lock());
        cell.touch();
        Ok(result)
    }

    /// Returns `err` in strict mode, or logs it and yields the default value
    /// when it is a [misuse](SceneError::is_misuse) error.
    pub(crate) fn reject<T: Default>(&self, err: SceneError) -> Result<T, SceneError> {
        if self.config.error_checking || !err.is_misuse() {
            Err(err)
        } else {
            debug!(%err, "ignoring misuse with error checking disabled");
            Ok(T::default())
        }
    }

    fn bump_structure(&self) {
        self.structure_version.fetch_add(1, Ordering::AcqRel);
    }

    /// Returns `true` if `candidate` is `node` or one of its ancestors.
    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        // Bounded so an already corrupt parent chain cannot spin forever.
        let mut remaining = self.len() + 1;
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            if remaining == 0 {
                return false;
            }
            remaining -= 1;
            current = self.parent(id).ok().flatten();
        }
        false
    }

    fn set_hidden_recursive(&self, id: NodeId, hidden: bool) -> Result<(), SceneError> {
        for node in self.subtree(id)? {
            // Skip nodes destroyed mid-walk.
            let _ = self.with_node_mut(node, |state| state.hidden = hidden);
        }
        Ok(())
    }
}
