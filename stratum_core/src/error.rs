// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy for scene mutation and render-order reconciliation.
//!
//! Node names in messages are the identifiers parents assigned on insertion
//! (the root carries the label it was created with).

use thiserror::Error;

use crate::scene::NodeId;

/// Errors reported by [`SceneTree`](crate::scene::SceneTree) operations and
/// render-order reconciliation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SceneError {
    /// A child with the requested identifier already exists under the parent.
    #[error("id collision: node \"{parent}\" already has a child with id \"{id}\"")]
    DuplicateIdentifier {
        /// Name of the parent node.
        parent: String,
        /// The colliding child identifier.
        id: String,
    },

    /// The node is already a child of the parent under another identifier.
    #[error(
        "double add: node \"{parent}\" already holds this node as \"{existing}\" (attempted id \"{id}\")"
    )]
    DuplicateReference {
        /// Name of the parent node.
        parent: String,
        /// The identifier the node is already registered under.
        existing: String,
        /// The identifier the caller attempted to use.
        id: String,
    },

    /// No child with the requested identifier exists under the parent.
    #[error("node \"{parent}\" has no child with id \"{id}\"")]
    NotFound {
        /// Name of the parent node.
        parent: String,
        /// The missing child identifier.
        id: String,
    },

    /// The operation would make a node its own ancestor.
    #[error("adding \"{id}\" under node \"{parent}\" would create a cycle")]
    WouldCreateCycle {
        /// Name of the would-be parent.
        parent: String,
        /// The identifier the caller attempted to use.
        id: String,
    },

    /// The handle refers to a node that has been destroyed.
    #[error("stale node handle {0:?}")]
    StaleNode(NodeId),

    /// A listener with the requested identifier is already registered.
    #[error("id collision: node \"{node}\" already has a listener with id \"{id}\"")]
    DuplicateListener {
        /// Name of the node.
        node: String,
        /// The colliding listener identifier.
        id: String,
    },

    /// The same listener instance is already registered under another id.
    #[error(
        "double add: node \"{node}\" already holds this listener as \"{existing}\" (attempted id \"{id}\")"
    )]
    DuplicateListenerReference {
        /// Name of the node.
        node: String,
        /// The identifier the listener is already registered under.
        existing: String,
        /// The identifier the caller attempted to use.
        id: String,
    },

    /// No listener with the requested identifier is registered.
    #[error("node \"{node}\" has no listener with id \"{id}\"")]
    ListenerNotFound {
        /// Name of the node.
        node: String,
        /// The missing listener identifier.
        id: String,
    },

    /// The same node was reached twice while walking the tree, meaning it is
    /// attached under more than one parent.
    #[error("node \"{name}\" ({node:?}) was reached twice while walking the tree")]
    DuplicateNodeInTree {
        /// The node reached twice.
        node: NodeId,
        /// Its current name.
        name: String,
    },
}

impl SceneError {
    /// Returns `true` for errors that the non-strict mode turns into no-ops.
    #[must_use]
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            Self::DuplicateIdentifier { .. }
                | Self::DuplicateReference { .. }
                | Self::NotFound { .. }
                | Self::DuplicateListener { .. }
                | Self::DuplicateListenerReference { .. }
                | Self::ListenerNotFound { .. }
        )
    }
}
