// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene tree data model.
//!
//! A *node* is an element of the retained scene tree. Each node has:
//!
//! - **Identity**: a [`NodeId`] handle, a generational key that becomes
//!   stale when the node is destroyed, so dangling handles are reported
//!   instead of aliasing a reused slot.
//! - **Name**: the string identifier its parent assigned on insertion. Names
//!   are unique among siblings only.
//! - **Topology**: a non-owning parent link and a keyed map of children.
//! - **Geometry**: [`relative_position`](SceneTree::relative_position)
//!   (offset from the parent's origin), [`dimensions`](SceneTree::dimensions),
//!   and [`depth`](SceneTree::depth), a paint and hit-test ordering key that
//!   is unrelated to nesting level.
//! - **Visibility**: the [`hidden`](SceneTree::is_hidden) flag.
//! - **Content**: a [`NodeKind`] fixed at creation (base box, text, image).
//! - **Listeners**: pointer-event listeners keyed by string id.
//!
//! Nodes live in an arena owned by [`SceneTree`]. Every node sits behind its
//! own lock; operations that span several nodes (absolute positions, hit
//! tests, subtree walks) take those locks one at a time and never nest them,
//! so the result is a consistent per-node snapshot that may be stale across
//! levels when other threads are mutating concurrently.
//!
//! # Modification tracking
//!
//! Every attribute or structural mutation sets the node's *modified* flag.
//! [`is_subtree_modified`](SceneTree::is_subtree_modified) answers "has
//! anything below here changed since it was last drawn?" and stops at the
//! first dirty node. Draw passes clear flags one node at a time with
//! [`clear_modified`](SceneTree::clear_modified).
//!
//! Changes that can alter render order (attach, detach, destroy, depth
//! changes) additionally bump the tree's
//! [`structure_version`](SceneTree::structure_version).

mod id;
mod kind;
mod listeners;
mod modified;
mod node;
mod tree;

pub use id::NodeId;
pub use kind::{
    BorderWrapMode, HAlign, ImageContent, ImageFillMode, ImageSource, KindTag, NodeKind,
    TextContent, VAlign,
};
pub use node::{NodeDesc, NodeSnapshot};
pub use tree::SceneTree;
