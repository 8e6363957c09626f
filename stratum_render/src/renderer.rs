// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The draw pass.

use std::fmt;

use stratum_core::color::Color;
use stratum_core::error::SceneError;
use stratum_core::scene::{NodeId, NodeKind, SceneTree};
use tracing::{instrument, trace, warn};

use crate::backend::Backend;
use crate::order::{ReconcileChanges, RenderOrder};
use crate::record::DrawCache;

/// Draw-pass configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    /// Skip the backend call for nodes whose own hidden flag is set.
    ///
    /// Hidden nodes keep their records either way, and their modified flags
    /// are still cleared. Hiding does not cascade: children of a hidden node
    /// are drawn unless hidden themselves.
    pub skip_hidden: bool,
    /// Color passed to [`Backend::begin_frame`].
    pub background: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            skip_hidden: true,
            background: Color::WHITE,
        }
    }
}

/// What one [`Renderer::draw`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawReport {
    /// Records handed to the backend.
    pub drawn: usize,
    /// Records skipped because their node is hidden.
    pub skipped_hidden: usize,
    /// Records skipped because their node was destroyed after the last
    /// reconciliation.
    pub skipped_stale: usize,
    /// The reconciliation performed before drawing, if one was needed.
    pub reconciled: Option<ReconcileChanges>,
}

/// Owns a backend and the render order it draws from.
pub struct Renderer<B: Backend> {
    backend: B,
    order: RenderOrder<B>,
    config: RenderConfig,
}

impl<B: Backend> fmt::Debug for Renderer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("order", &self.order)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<B: Backend> Renderer<B> {
    /// Creates a renderer with an empty render order.
    #[must_use]
    pub fn new(backend: B, config: RenderConfig) -> Self {
        Self {
            backend,
            order: RenderOrder::new(),
            config,
        }
    }

    /// Returns the backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the backend mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consumes the renderer, returning its backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Returns the render order.
    #[must_use]
    pub fn order(&self) -> &RenderOrder<B> {
        &self.order
    }

    /// Returns the render order mutably, e.g. to force a reconciliation.
    pub fn order_mut(&mut self) -> &mut RenderOrder<B> {
        &mut self.order
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> RenderConfig {
        self.config
    }

    /// Sets the frame background color.
    pub fn set_background(&mut self, background: Color) {
        self.config.background = background;
    }

    /// Draws every record of the subtree at `root` in ascending depth order.
    ///
    /// Reconciles first if the tree's structure version moved since the last
    /// reconciliation; a failed reconciliation aborts before
    /// [`Backend::begin_frame`]. Each node's modified flag is cleared as its
    /// snapshot is taken, so a write landing while the backend draws leaves
    /// the node pending for the next frame. An image's `source_changed` flag
    /// is acknowledged only if the source drawn is still current.
    ///
    /// # Errors
    ///
    /// Propagates reconciliation errors ([`SceneError::StaleNode`] for a
    /// destroyed root, [`SceneError::DuplicateNodeInTree`]).
    #[instrument(skip_all, fields(root = ?root))]
    pub fn draw(&mut self, tree: &SceneTree, root: NodeId) -> Result<DrawReport, SceneError> {
        let mut report = DrawReport::default();
        if self.order.needs_reconcile(tree) {
            report.reconciled = Some(self.order.reconcile(tree, root)?);
        }

        let Self {
            backend,
            order,
            config,
        } = self;

        backend.begin_frame(config.background);
        for record in order.records_mut() {
            let Ok(snapshot) = tree.snapshot_and_clear(record.node) else {
                warn!(node = ?record.node, "skipping record of destroyed node");
                report.skipped_stale += 1;
                continue;
            };

            if snapshot.hidden && config.skip_hidden {
                report.skipped_hidden += 1;
            } else {
                trace!(node = ?record.node, depth = record.depth, "draw");
                match &snapshot.kind {
                    NodeKind::Base => backend.draw_base(&snapshot),
                    NodeKind::Text(text) => {
                        if !matches!(record.cache, DrawCache::Text(_)) {
                            record.cache =
                                DrawCache::Text(backend.create_text_cache(&snapshot, text));
                        }
                        if let DrawCache::Text(cache) = &mut record.cache {
                            backend.draw_text(&snapshot, text, cache);
                        }
                    }
                    NodeKind::Image(image) => {
                        if !matches!(record.cache, DrawCache::Image(_)) {
                            record.cache =
                                DrawCache::Image(backend.create_image_cache(&snapshot, image));
                        }
                        if let DrawCache::Image(cache) = &mut record.cache {
                            backend.draw_image(&snapshot, image, cache);
                        }
                        if image.source_changed {
                            // False when destroyed or re-sourced mid-draw; either way
                            // there is nothing to acknowledge.
                            let _ =
                                tree.acknowledge_image_source(record.node, image.source.as_ref());
                        }
                    }
                }
                report.drawn += 1;
            }
        }
        backend.end_frame();

        Ok(report)
    }
}
