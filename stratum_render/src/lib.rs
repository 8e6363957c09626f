// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth-ordered rendering and the host surface for stratum.
//!
//! This crate sits between [`stratum_core`]'s scene tree and a graphics
//! backend. It provides:
//!
//! - [`RenderOrder`] — the persistent, depth-sorted list of render records,
//!   reconciled incrementally against the tree
//! - [`Backend`] — the "given a node, draw it" contract, with per-record
//!   caches for text layouts and decoded images
//! - [`Renderer`] — the draw pass that walks the render order and clears
//!   modified flags
//! - [`Surface`] — the context object a host window drives: it owns the
//!   tree, the pointer dispatcher, the renderer, and the app handler
//!
//! ```text
//!   Host window
//!       │ feed_pointer_update() / feed_key_down() / render()
//!       ▼
//!   Surface ──► PointerDispatcher ──► listeners, AppHandler
//!       │
//!       └────► Renderer::draw() ──► RenderOrder::reconcile() (on version change)
//!                   │
//!                   ▼
//!               Backend::draw_base / draw_text / draw_image
//! ```

mod backend;
mod order;
mod record;
mod renderer;
mod surface;

pub use backend::Backend;
pub use order::{ReconcileChanges, RenderOrder};
pub use record::{DrawCache, RenderRecord};
pub use renderer::{DrawReport, RenderConfig, Renderer};
pub use surface::{Surface, SurfaceConfig};

#[cfg(test)]
mod testing;
