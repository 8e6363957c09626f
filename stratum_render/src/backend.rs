// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for graphics integrations.

use stratum_core::color::Color;
use stratum_core::scene::{ImageContent, NodeSnapshot, TextContent};

/// Turns node snapshots into pixels.
///
/// The [`Renderer`](crate::Renderer) calls [`begin_frame`](Self::begin_frame),
/// then one `draw_*` method per visible record in ascending depth order,
/// then [`end_frame`](Self::end_frame).
///
/// Text and image records carry a backend-owned cache (a shaped layout, a
/// decoded bitmap, a GPU texture) that lives as long as the record does.
/// Caches are created lazily the first time a record is drawn and dropped
/// when the node leaves the tree. A node's `modified` flag in the snapshot
/// tells the backend whether its cache may be stale; for images,
/// [`ImageContent::source_changed`] says the source itself must be reloaded.
///
/// # Frame loop pseudocode
///
/// ```rust,ignore
/// fn on_frame(surface: &mut Surface<MyBackend>) {
///     // Input: one pointer snapshot per frame
///     surface.feed_pointer_update(cursor, held_buttons)?;
///
///     // Draw only when something changed since the last frame
///     if surface.has_pending_visual_changes()? {
///         surface.render()?;
///     }
/// }
/// ```
pub trait Backend {
    /// Per-record state for text nodes.
    type TextCache;
    /// Per-record state for image nodes.
    type ImageCache;

    /// Starts a frame, clearing the target to `background`.
    fn begin_frame(&mut self, background: Color) {
        let _ = background;
    }

    /// Creates the cache for a text record on its first draw.
    fn create_text_cache(&mut self, node: &NodeSnapshot, text: &TextContent) -> Self::TextCache;

    /// Creates the cache for an image record on its first draw.
    fn create_image_cache(
        &mut self,
        node: &NodeSnapshot,
        image: &ImageContent,
    ) -> Self::ImageCache;

    /// Draws a content-free box.
    fn draw_base(&mut self, node: &NodeSnapshot);

    /// Draws a text node.
    fn draw_text(&mut self, node: &NodeSnapshot, text: &TextContent, cache: &mut Self::TextCache);

    /// Draws an image node.
    fn draw_image(
        &mut self,
        node: &NodeSnapshot,
        image: &ImageContent,
        cache: &mut Self::ImageCache,
    );

    /// Finishes the frame.
    fn end_frame(&mut self) {}
}
