// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host-facing context object.

use std::fmt;
use std::sync::Arc;

use kurbo::{Point, Size};
use stratum_core::config::{DispatchConfig, TreeConfig};
use stratum_core::error::SceneError;
use stratum_core::input::{AppHandler, MouseButton, MouseButtons, PointerDispatcher};
use stratum_core::scene::{NodeDesc, NodeId, SceneTree};
use tracing::debug;

use crate::backend::Backend;
use crate::renderer::{DrawReport, RenderConfig, Renderer};

/// Configuration for a [`Surface`], aggregating the per-component configs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceConfig {
    /// Strictness of the surface's tree.
    pub tree: TreeConfig,
    /// Pointer dispatch policy.
    pub dispatch: DispatchConfig,
    /// Draw-pass options.
    pub render: RenderConfig,
    /// Initial size of the root node.
    pub root_size: Size,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            tree: TreeConfig::default(),
            dispatch: DispatchConfig::default(),
            render: RenderConfig::default(),
            root_size: Size::new(800.0, 600.0),
        }
    }
}

/// One drawable, interactive surface (typically a window).
///
/// Owns the scene tree and its root node, the pointer dispatcher, the
/// renderer, and the application handler. The host forwards raw input to
/// the `feed_*` methods and calls [`render`](Self::render) when
/// [`has_pending_visual_changes`](Self::has_pending_visual_changes) says so.
///
/// The tree is shared through an `Arc` so other threads can mutate it while
/// the host thread drives input and drawing.
pub struct Surface<B: Backend> {
    tree: Arc<SceneTree>,
    root: NodeId,
    dispatcher: PointerDispatcher,
    renderer: Renderer<B>,
    app: Box<dyn AppHandler>,
}

impl<B: Backend> fmt::Debug for Surface<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("tree", &self.tree)
            .field("root", &self.root)
            .field("dispatcher", &self.dispatcher)
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}

impl<B: Backend> Surface<B> {
    /// Creates a surface with a fresh tree whose root is named `"root"` and
    /// sized to [`SurfaceConfig::root_size`].
    pub fn new(backend: B, app: Box<dyn AppHandler>, config: SurfaceConfig) -> Self {
        let tree = Arc::new(SceneTree::with_config(config.tree));
        let root = tree.create_root(NodeDesc::base().with_dimensions(config.root_size), "root");
        Self::with_tree(tree, root, backend, app, config)
    }

    /// Creates a surface over an existing tree and root.
    pub fn with_tree(
        tree: Arc<SceneTree>,
        root: NodeId,
        backend: B,
        app: Box<dyn AppHandler>,
        config: SurfaceConfig,
    ) -> Self {
        Self {
            tree,
            root,
            dispatcher: PointerDispatcher::new(config.dispatch),
            renderer: Renderer::new(backend, config.render),
            app,
        }
    }

    /// The scene tree.
    #[must_use]
    pub fn tree(&self) -> &Arc<SceneTree> {
        &self.tree
    }

    /// The root node everything on this surface hangs from.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The pointer dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &PointerDispatcher {
        &self.dispatcher
    }

    /// The renderer.
    #[must_use]
    pub fn renderer(&self) -> &Renderer<B> {
        &self.renderer
    }

    /// The renderer, mutably.
    pub fn renderer_mut(&mut self) -> &mut Renderer<B> {
        &mut self.renderer
    }

    /// Replaces the application handler, returning the old one.
    pub fn replace_app(&mut self, app: Box<dyn AppHandler>) -> Box<dyn AppHandler> {
        std::mem::replace(&mut self.app, app)
    }

    /// Notifies the app handler that the surface is live.
    pub fn enter(&mut self) {
        debug!("surface entered");
        self.app.on_enter();
    }

    /// Notifies the app handler that the surface is closing.
    pub fn exit(&mut self) {
        debug!("surface exited");
        self.app.on_exit();
    }

    /// Feeds one pointer snapshot through the dispatcher.
    ///
    /// The render order is brought up to date first so nodes at equal depth
    /// report stack indices in the order they are painted.
    ///
    /// # Errors
    ///
    /// - [`SceneError::StaleNode`] if the root has been destroyed.
    /// - [`SceneError::DuplicateNodeInTree`] if the render order cannot be
    ///   reconciled.
    pub fn feed_pointer_update(
        &mut self,
        position: Point,
        buttons: MouseButtons,
    ) -> Result<(), SceneError> {
        let order = self.renderer.order_mut();
        if order.needs_reconcile(&self.tree) {
            order.reconcile(&self.tree, self.root)?;
        }
        self.dispatcher.update_with(
            &self.tree,
            self.root,
            position,
            buttons,
            self.app.as_mut(),
            self.renderer.order(),
        )
    }

    /// Forwards a pointer move to the app handler only.
    pub fn feed_global_mouse_moved(&mut self, position: Point) {
        self.dispatcher
            .feed_global_mouse_moved(self.app.as_mut(), position);
    }

    /// Forwards a button press to the app handler only.
    pub fn feed_global_mouse_down(&mut self, position: Point, button: MouseButton) {
        self.dispatcher
            .feed_global_mouse_down(self.app.as_mut(), position, button);
    }

    /// Forwards a button release to the app handler only.
    pub fn feed_global_mouse_up(&mut self, position: Point, button: MouseButton) {
        self.dispatcher
            .feed_global_mouse_up(self.app.as_mut(), position, button);
    }

    /// Forwards a key press (host virtual key code).
    pub fn feed_key_down(&mut self, key: u32) {
        self.app.on_key_down(key);
    }

    /// Forwards a key release.
    pub fn feed_key_up(&mut self, key: u32) {
        self.app.on_key_up(key);
    }

    /// Forwards a typed character.
    pub fn feed_char(&mut self, ch: char) {
        self.app.on_char(ch);
    }

    /// Resizes the root node to `size` and notifies the app handler.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if the root has been destroyed; the
    /// app handler is not notified in that case.
    pub fn feed_resize(&mut self, size: Size) -> Result<(), SceneError> {
        self.tree.set_dimensions(self.root, size)?;
        debug!(width = size.width, height = size.height, "surface resized");
        self.app.on_resize(size);
        Ok(())
    }

    /// Returns `true` if anything under the root changed since it was last
    /// drawn.
    pub fn has_pending_visual_changes(&self) -> Result<bool, SceneError> {
        self.tree.is_subtree_modified(self.root)
    }

    /// Reconciles the render order if needed and draws a frame.
    pub fn render(&mut self) -> Result<DrawReport, SceneError> {
        self.renderer.draw(&self.tree, self.root)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::testing::RecordingBackend;

    #[derive(Default)]
    struct Script {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl AppHandler for Script {
        fn on_enter(&mut self) {
            self.log.lock().push("enter".into());
        }
        fn on_exit(&mut self) {
            self.log.lock().push("exit".into());
        }
        fn on_resize(&mut self, size: Size) {
            self.log
                .lock()
                .push(format!("resize {}x{}", size.width, size.height));
        }
        fn on_key_down(&mut self, key: u32) {
            self.log.lock().push(format!("down {key}"));
        }
        fn on_key_up(&mut self, key: u32) {
            self.log.lock().push(format!("up {key}"));
        }
        fn on_char(&mut self, ch: char) {
            self.log.lock().push(format!("char {ch}"));
        }
        fn on_global_mouse_down(&mut self, _: Point, button: MouseButton) {
            self.log.lock().push(format!("mouse down {button:?}"));
        }
    }

    #[test]
    fn host_callbacks_reach_the_app() {
        let script = Script::default();
        let log = Arc::clone(&script.log);
        let mut surface = Surface::new(
            RecordingBackend::default(),
            Box::new(script),
            SurfaceConfig::default(),
        );

        surface.enter();
        surface.feed_key_down(65);
        surface.feed_char('a');
        surface.feed_key_up(65);
        surface.feed_global_mouse_down(Point::ZERO, MouseButton::Middle);
        surface.feed_resize(Size::new(320.0, 240.0)).unwrap();
        surface.exit();

        assert_eq!(
            *log.lock(),
            vec![
                "enter",
                "down 65",
                "char a",
                "up 65",
                "mouse down Middle",
                "resize 320x240",
                "exit",
            ]
        );
        assert_eq!(
            surface.tree().dimensions(surface.root()),
            Ok(Size::new(320.0, 240.0))
        );
    }

    #[test]
    fn pending_changes_follow_render() {
        let mut surface = Surface::new(
            RecordingBackend::default(),
            Box::new(()),
            SurfaceConfig::default(),
        );
        assert!(
            surface.has_pending_visual_changes().unwrap(),
            "new root is modified"
        );
        surface.render().unwrap();
        assert!(
            !surface.has_pending_visual_changes().unwrap(),
            "render clears"
        );

        let child = surface.tree().create_node(NodeDesc::base());
        surface
            .tree()
            .add_child(surface.root(), "child", child)
            .unwrap();
        assert!(
            surface.has_pending_visual_changes().unwrap(),
            "attach marks the root"
        );
        let report = surface.render().unwrap();
        assert_eq!(report.reconciled.map(|c| c.added), Some(1));
        let root = surface.root();
        assert_eq!(
            surface.renderer().backend().drawn(),
            vec![root, root, child],
            "second frame draws the new child after the root"
        );
    }
}
