// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backends for unit tests.

use std::sync::Arc;

use kurbo::{Point, Rect};
use stratum_core::color::Color;
use stratum_core::scene::{
    ImageContent, ImageSource, NodeId, NodeSnapshot, SceneTree, TextContent,
};

use crate::backend::Backend;

/// Draws nothing.
#[derive(Debug, Default)]
pub(crate) struct NullBackend;

impl Backend for NullBackend {
    type TextCache = ();
    type ImageCache = ();

    fn create_text_cache(&mut self, _: &NodeSnapshot, _: &TextContent) {}
    fn create_image_cache(&mut self, _: &NodeSnapshot, _: &ImageContent) {}
    fn draw_base(&mut self, _: &NodeSnapshot) {}
    fn draw_text(&mut self, _: &NodeSnapshot, _: &TextContent, _: &mut ()) {}
    fn draw_image(&mut self, _: &NodeSnapshot, _: &ImageContent, _: &mut ()) {}
}

/// One backend call.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Begin(Color),
    Base(NodeId),
    Text(NodeId, String, u32),
    Image(NodeId, bool),
    End,
}

/// Records every call; text caches count how often they were drawn.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub(crate) calls: Vec<Call>,
    pub(crate) caches_created: usize,
}

impl RecordingBackend {
    /// Nodes drawn, in order.
    pub(crate) fn drawn(&self) -> Vec<NodeId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Base(node) | Call::Text(node, ..) | Call::Image(node, _) => Some(*node),
                Call::Begin(_) | Call::End => None,
            })
            .collect()
    }
}

impl Backend for RecordingBackend {
    type TextCache = u32;
    type ImageCache = ();

    fn begin_frame(&mut self, background: Color) {
        self.calls.push(Call::Begin(background));
    }

    fn create_text_cache(&mut self, _: &NodeSnapshot, _: &TextContent) -> u32 {
        self.caches_created += 1;
        0
    }

    fn create_image_cache(&mut self, _: &NodeSnapshot, _: &ImageContent) {
        self.caches_created += 1;
    }

    fn draw_base(&mut self, node: &NodeSnapshot) {
        self.calls.push(Call::Base(node.id));
    }

    fn draw_text(&mut self, node: &NodeSnapshot, text: &TextContent, cache: &mut u32) {
        *cache += 1;
        self.calls.push(Call::Text(node.id, text.text.clone(), *cache));
    }

    fn draw_image(&mut self, node: &NodeSnapshot, image: &ImageContent, _: &mut ()) {
        self.calls.push(Call::Image(node.id, image.source_changed));
    }

    fn end_frame(&mut self) {
        self.calls.push(Call::End);
    }
}

/// Writes to its own tree from inside draw calls, as another thread would
/// if its update landed while a frame is being drawn.
#[derive(Debug)]
pub(crate) struct MutatingBackend {
    pub(crate) tree: Arc<SceneTree>,
    pub(crate) target: NodeId,
    /// Bounds the target was drawn with, one per frame.
    pub(crate) target_bounds: Vec<Rect>,
    /// Fires once, the first time the target is drawn.
    pub(crate) armed: bool,
}

impl MutatingBackend {
    pub(crate) fn new(tree: Arc<SceneTree>, target: NodeId) -> Self {
        Self {
            tree,
            target,
            target_bounds: Vec::new(),
            armed: true,
        }
    }
}

impl Backend for MutatingBackend {
    type TextCache = ();
    type ImageCache = ();

    fn create_text_cache(&mut self, _: &NodeSnapshot, _: &TextContent) {}
    fn create_image_cache(&mut self, _: &NodeSnapshot, _: &ImageContent) {}

    fn draw_base(&mut self, node: &NodeSnapshot) {
        if node.id != self.target {
            return;
        }
        self.target_bounds.push(node.bounds);
        if std::mem::take(&mut self.armed) {
            self.tree
                .set_relative_position(self.target, Point::new(99.0, 99.0))
                .unwrap();
        }
    }

    fn draw_text(&mut self, _: &NodeSnapshot, _: &TextContent, _: &mut ()) {}

    fn draw_image(&mut self, node: &NodeSnapshot, _: &ImageContent, _: &mut ()) {
        if node.id != self.target {
            return;
        }
        self.target_bounds.push(node.bounds);
        if std::mem::take(&mut self.armed) {
            self.tree
                .update_image(self.target, |image| {
                    image.set_source(Some(ImageSource::File("next.png".into())));
                })
                .unwrap();
        }
    }
}
