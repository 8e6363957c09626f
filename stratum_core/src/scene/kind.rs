// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node kinds and their content.

use crate::color::Color;

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HAlign {
    /// Align to the leading edge.
    #[default]
    Left,
    /// Center each line.
    Center,
    /// Align to the trailing edge.
    Right,
    /// Stretch lines to both edges.
    Justify,
}

/// Vertical text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VAlign {
    /// Align to the top edge.
    #[default]
    Top,
    /// Center vertically.
    Center,
    /// Align to the bottom edge.
    Bottom,
}

/// Text content and styling for a [`NodeKind::Text`] node.
#[derive(Clone, Debug, PartialEq)]
pub struct TextContent {
    /// The text to lay out.
    pub text: String,
    /// Glyph color.
    pub text_color: Color,
    /// Fill behind the text box.
    pub background_color: Color,
    /// Border stroke color.
    pub border_color: Color,
    /// Border stroke width in pixels.
    pub border_width: f64,
    /// Corner radius in pixels.
    pub corner_radius: f64,
    /// Inset between the box edge and the text layout area, in pixels.
    pub margin: f64,
    /// Font size in points.
    pub point_size: f64,
    /// Font family name, resolved by the backend.
    pub font_family: String,
    /// Horizontal alignment.
    pub h_align: HAlign,
    /// Vertical alignment.
    pub v_align: VAlign,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            text: String::new(),
            text_color: Color::BLACK,
            background_color: Color::TRANSPARENT,
            border_color: Color::BLACK,
            border_width: 0.0,
            corner_radius: 0.0,
            margin: 0.0,
            point_size: 12.0,
            font_family: String::from("Arial"),
            h_align: HAlign::Left,
            v_align: VAlign::Top,
        }
    }
}

impl TextContent {
    /// Creates default-styled content with the given text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// How an image is scaled into its node's box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageFillMode {
    /// Stretch to the box, ignoring aspect ratio.
    Fill,
    /// Scale to cover the box, cropping overflow.
    Cover,
    /// Scale to fit entirely inside the box.
    #[default]
    Contain,
}

/// What an image node's border wraps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BorderWrapMode {
    /// The border follows the drawn image bounds.
    #[default]
    FitToImage,
    /// The border follows the node's box.
    FitToBoundingBox,
}

/// Where an image's pixels come from. Loading is up to the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// A path on disk.
    File(String),
    /// A named resource bundled with the application.
    Resource(String),
}

/// Image content and styling for a [`NodeKind::Image`] node.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageContent {
    /// The image to draw, if any.
    pub source: Option<ImageSource>,
    /// Border stroke color.
    pub border_color: Color,
    /// Border stroke width in pixels.
    pub border_width: f64,
    /// Corner radius in pixels.
    pub corner_radius: f64,
    /// Scaling mode.
    pub fill_mode: ImageFillMode,
    /// Border placement.
    pub border_wrap: BorderWrapMode,
    /// Set when `source` changed and the backend has not reloaded it yet.
    ///
    /// Cleared by the draw pass after the node has been drawn.
    pub source_changed: bool,
}

impl Default for ImageContent {
    fn default() -> Self {
        Self {
            source: None,
            border_color: Color::BLACK,
            border_width: 0.0,
            corner_radius: 0.0,
            fill_mode: ImageFillMode::Contain,
            border_wrap: BorderWrapMode::FitToImage,
            source_changed: true,
        }
    }
}

impl ImageContent {
    /// Creates default-styled content showing `source`.
    #[must_use]
    pub fn new(source: ImageSource) -> Self {
        Self {
            source: Some(source),
            ..Self::default()
        }
    }

    /// Replaces the image source and flags it for reload.
    pub fn set_source(&mut self, source: Option<ImageSource>) {
        self.source = source;
        self.source_changed = true;
    }
}

/// What a node draws. Fixed when the node is created.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum NodeKind {
    /// A plain box with no content of its own.
    #[default]
    Base,
    /// A text box.
    Text(TextContent),
    /// An image box.
    Image(ImageContent),
}

impl NodeKind {
    /// Returns the content-free discriminant.
    #[must_use]
    pub const fn tag(&self) -> KindTag {
        match self {
            Self::Base => KindTag::Base,
            Self::Text(_) => KindTag::Text,
            Self::Image(_) => KindTag::Image,
        }
    }
}

/// Discriminant of a [`NodeKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KindTag {
    /// [`NodeKind::Base`].
    Base,
    /// [`NodeKind::Text`].
    Text,
    /// [`NodeKind::Image`].
    Image,
}
