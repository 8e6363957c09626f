// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted session over a small scene.
//!
//! Builds a toolbar with a label, an icon and a button, drives a short
//! pointer and keyboard script through a [`Surface`], renders through a
//! [`LogBackend`](stratum_debug::backend::LogBackend) on stderr, then prints
//! the final tree and the recorded events (as JSON) on stdout.
//!
//! Set `RUST_LOG=debug` to see reconciles, dispatch and ignored misuse.

use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

use kurbo::{Point, Size};
use stratum_core::color::Color;
use stratum_core::input::{MouseButtons, PointerListener};
use stratum_core::scene::{ImageContent, ImageSource, NodeDesc, NodeKind, TextContent};
use stratum_debug::backend::LogBackend;
use stratum_debug::pretty;
use stratum_debug::recorder::EventRecorder;
use stratum_render::{Surface, SurfaceConfig};
use tracing::info;

const WINDOW: Size = Size::new(320.0, 200.0);
const TOOLBAR_HEIGHT: f64 = 40.0;

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => tracing_subscriber::EnvFilter::new("info"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let recorder = EventRecorder::new("events");
    let mut surface = Surface::new(
        LogBackend::stderr(),
        Box::new(recorder.labeled("app")),
        SurfaceConfig {
            root_size: WINDOW,
            ..SurfaceConfig::default()
        },
    );
    let tree = Arc::clone(surface.tree());
    let root = surface.root();

    // -- scene ---

    let toolbar = tree.create_node(
        NodeDesc::base()
            .with_dimensions(Size::new(WINDOW.width, TOOLBAR_HEIGHT))
            .with_depth(1.0),
    );
    tree.add_child(root, "toolbar", toolbar)?;

    let label = tree.create_node(
        NodeDesc::of_kind(NodeKind::Text(TextContent {
            text_color: Color::grey(0.2),
            point_size: 14.0,
            ..TextContent::new("Untitled")
        }))
        .with_position(Point::new(8.0, 8.0))
        .with_dimensions(Size::new(120.0, 24.0))
        .with_depth(2.0),
    );
    tree.add_child(toolbar, "label", label)?;

    let icon = tree.create_node(
        NodeDesc::of_kind(NodeKind::Image(ImageContent::new(ImageSource::Resource(
            "save".into(),
        ))))
        .with_position(Point::new(280.0, 8.0))
        .with_dimensions(Size::new(24.0, 24.0))
        .with_depth(3.0),
    );
    tree.add_child(toolbar, "icon", icon)?;

    // The button sits under the icon; the icon is in front.
    let button = tree.create_node(
        NodeDesc::base()
            .with_position(Point::new(272.0, 4.0))
            .with_dimensions(Size::new(40.0, 32.0))
            .with_depth(2.0),
    );
    tree.add_child(toolbar, "button", button)?;

    for (node, name) in [(toolbar, "toolbar"), (icon, "icon"), (button, "button")] {
        let listener: Arc<dyn PointerListener> = Arc::new(recorder.labeled(name));
        tree.add_listener(node, "recorder", listener)?;
    }

    // -- session ---

    surface.enter();
    let report = surface.render()?;
    info!(drawn = report.drawn, "first frame");

    // Hover the label, then the icon stack, then click it.
    surface.feed_pointer_update(Point::new(20.0, 20.0), MouseButtons::empty())?;
    surface.feed_pointer_update(Point::new(290.0, 20.0), MouseButtons::empty())?;
    surface.feed_pointer_update(Point::new(290.0, 20.0), MouseButtons::PRIMARY)?;
    surface.feed_pointer_update(Point::new(290.0, 20.0), MouseButtons::empty())?;

    // The click "saves": retitle the label and swap the icon.
    tree.update_text(label, |text| text.text = String::from("Saved"))?;
    tree.update_image(icon, |image| {
        image.set_source(Some(ImageSource::Resource("saved".into())));
    })?;

    surface.feed_key_down(0x53);
    surface.feed_char('s');
    surface.feed_key_up(0x53);

    // Leave the toolbar entirely.
    surface.feed_pointer_update(Point::new(160.0, 150.0), MouseButtons::empty())?;

    if surface.has_pending_visual_changes()? {
        let report = surface.render()?;
        info!(drawn = report.drawn, "second frame");
    }

    surface.feed_resize(Size::new(480.0, 320.0))?;
    tree.hide(button)?;
    let report = surface.render()?;
    info!(
        drawn = report.drawn,
        skipped_hidden = report.skipped_hidden,
        "third frame"
    );
    surface.exit();

    // -- output ---

    let stats = surface.renderer().backend().stats();
    info!(
        frames = stats.frames,
        draws = stats.draws,
        image_loads = stats.image_loads,
        "backend totals"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "scene:")?;
    pretty::write_tree(&tree, root, &mut out)?;
    writeln!(out, "events:")?;
    recorder.export(&mut out)?;
    Ok(())
}
