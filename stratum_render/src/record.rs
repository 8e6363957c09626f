// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render records: one node plus its backend-side drawing state.

use std::fmt;

use stratum_core::scene::NodeId;

use crate::backend::Backend;

/// Backend cache attached to a record, matching the node's kind.
pub enum DrawCache<B: Backend> {
    /// Not drawn yet, or a base node (which needs no cache).
    Empty,
    /// Cache for a text node.
    Text(B::TextCache),
    /// Cache for an image node.
    Image(B::ImageCache),
}

impl<B: Backend> fmt::Debug for DrawCache<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "Empty",
            Self::Text(_) => "Text(..)",
            Self::Image(_) => "Image(..)",
        })
    }
}

/// One entry of a [`RenderOrder`](crate::RenderOrder).
pub struct RenderRecord<B: Backend> {
    pub(crate) node: NodeId,
    pub(crate) depth: f64,
    pub(crate) cache: DrawCache<B>,
}

impl<B: Backend> RenderRecord<B> {
    pub(crate) fn new(node: NodeId, depth: f64) -> Self {
        Self {
            node,
            depth,
            cache: DrawCache::Empty,
        }
    }

    /// The node this record draws.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The depth the record is sorted by, as of the last reconciliation.
    #[must_use]
    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// The record's backend cache.
    #[must_use]
    pub fn cache(&self) -> &DrawCache<B> {
        &self.cache
    }
}

impl<B: Backend> fmt::Debug for RenderRecord<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderRecord")
            .field("node", &self.node)
            .field("depth", &self.depth)
            .field("cache", &self.cache)
            .finish()
    }
}
