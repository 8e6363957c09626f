// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A backend that logs draw calls instead of drawing.
//!
//! [`LogBackend`] writes one line per [`Backend`] call to a
//! [`Write`](std::io::Write) destination (default: stderr) and keeps
//! counters, which makes it useful both for eyeballing a frame and as a test
//! double.

use std::io::Write;

use stratum_core::color::Color;
use stratum_core::scene::{ImageContent, ImageSource, NodeSnapshot, TextContent};
use stratum_render::Backend;

/// Per-record state for text nodes: how often the record was drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextCounter {
    /// Draw calls for this record.
    pub draws: u32,
}

/// Per-record state for image nodes: how often the source was (re)loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageCounter {
    /// Source loads for this record.
    pub loads: u32,
}

/// Counters accumulated across frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogStats {
    /// Frames begun.
    pub frames: u32,
    /// Nodes drawn, all kinds.
    pub draws: u32,
    /// Text caches created.
    pub text_caches: u32,
    /// Image caches created.
    pub image_caches: u32,
    /// Image sources loaded, counting reloads.
    pub image_loads: u32,
}

/// Writes one line per draw call to a [`Write`](std::io::Write) destination.
pub struct LogBackend<W: Write = Box<dyn Write>> {
    writer: W,
    stats: LogStats,
}

impl<W: Write> std::fmt::Debug for LogBackend<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogBackend")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl LogBackend {
    /// Creates a backend that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }
}

impl<W: Write> LogBackend<W> {
    /// Creates a backend that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            stats: LogStats::default(),
        }
    }

    /// Returns the accumulated counters.
    #[must_use]
    pub fn stats(&self) -> LogStats {
        self.stats
    }

    /// Returns the destination.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Consumes the backend, returning its destination.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn line(&mut self, kind: &str, node: &NodeSnapshot, detail: &str) {
        self.stats.draws += 1;
        let b = node.bounds;
        let _ = writeln!(
            self.writer,
            "[draw] {kind} {name} depth={depth} rect=({x0}, {y0}, {x1}, {y1}){modified}{detail}",
            name = if node.name.is_empty() { "<unnamed>" } else { node.name.as_str() },
            depth = node.depth,
            x0 = b.x0,
            y0 = b.y0,
            x1 = b.x1,
            y1 = b.y1,
            modified = if node.modified { " modified" } else { "" },
        );
    }
}

fn source_name(source: Option<&ImageSource>) -> String {
    match source {
        Some(ImageSource::File(path)) => format!("file:{path}"),
        Some(ImageSource::Resource(name)) => format!("resource:{name}"),
        None => String::from("none"),
    }
}

impl<W: Write> Backend for LogBackend<W> {
    type TextCache = TextCounter;
    type ImageCache = ImageCounter;

    fn begin_frame(&mut self, background: Color) {
        self.stats.frames += 1;
        let _ = writeln!(
            self.writer,
            "[frame {}] begin background=({:.2}, {:.2}, {:.2}, {:.2})",
            self.stats.frames, background.r, background.g, background.b, background.a
        );
    }

    fn create_text_cache(&mut self, _: &NodeSnapshot, _: &TextContent) -> TextCounter {
        self.stats.text_caches += 1;
        TextCounter::default()
    }

    fn create_image_cache(&mut self, _: &NodeSnapshot, _: &ImageContent) -> ImageCounter {
        self.stats.image_caches += 1;
        ImageCounter::default()
    }

    fn draw_base(&mut self, node: &NodeSnapshot) {
        self.line("base", node, "");
    }

    fn draw_text(&mut self, node: &NodeSnapshot, text: &TextContent, cache: &mut TextCounter) {
        cache.draws += 1;
        let detail = format!(" text={:?} size={}pt", text.text, text.point_size);
        self.line("text", node, &detail);
    }

    fn draw_image(&mut self, node: &NodeSnapshot, image: &ImageContent, cache: &mut ImageCounter) {
        if image.source_changed || cache.loads == 0 {
            cache.loads += 1;
            self.stats.image_loads += 1;
        }
        let detail = format!(
            " source={} loads={}",
            source_name(image.source.as_ref()),
            cache.loads
        );
        self.line("image", node, &detail);
    }

    fn end_frame(&mut self) {
        let _ = writeln!(self.writer, "[frame {}] end", self.stats.frames);
    }
}
