// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer event dispatch: diffing pointer state between updates.
//!
//! Each [`update`](PointerDispatcher::update) compares the new pointer
//! position, button mask, and hit set against the ones stored by the
//! previous update and emits, in this order:
//!
//! 1. `on_global_mouse_moved` to the app handler if the position changed.
//! 2. `on_global_mouse_down` per newly pressed button.
//! 3. `on_global_mouse_up` per newly released button.
//! 4. `on_mouse_down` per newly pressed button, to every listener of every
//!    currently hit node, front to back.
//! 5. `on_mouse_hover` to every listener of every currently hit node.
//! 6. `on_mouse_leave_hover` to listeners of nodes hit last time but not now.
//! 7. `on_mouse_up` per newly released button, to listeners of the nodes hit
//!    *last* time, then to any node that received that button's press but
//!    has since left the hit set. Every press is paired with exactly one
//!    release even after the pointer dragged out.
//!
//! The stored hit set is then replaced.

use std::sync::Arc;

use kurbo::Point;
use tracing::trace;

use super::app::AppHandler;
use super::buttons::{MouseButton, MouseButtons};
use super::hit::{HitSet, PaintOrder};
use super::listener::PointerListener;
use crate::config::DispatchConfig;
use crate::error::SceneError;
use crate::scene::{NodeId, SceneTree};

/// Pointer state machine turning per-frame pointer snapshots into events.
#[derive(Clone, Debug, Default)]
pub struct PointerDispatcher {
    config: DispatchConfig,
    position: Point,
    buttons: MouseButtons,
    hovered: HitSet,
    /// Hit set at the moment each button went down, by [`MouseButton::index`].
    press_targets: [HitSet; 5],
}

impl PointerDispatcher {
    /// Creates a dispatcher with no buttons held, the pointer at the origin,
    /// and nothing hovered.
    #[must_use]
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the dispatch configuration.
    #[must_use]
    pub fn config(&self) -> DispatchConfig {
        self.config
    }

    /// Pointer position as of the last update.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Buttons held as of the last update.
    #[must_use]
    pub fn buttons(&self) -> MouseButtons {
        self.buttons
    }

    /// Nodes under the pointer as of the last update, front to back.
    #[must_use]
    pub fn hovered(&self) -> &HitSet {
        &self.hovered
    }

    /// Processes one pointer snapshot against the subtree at `root`.
    ///
    /// Listener callbacks run with no tree lock held. Nodes destroyed since
    /// the previous update are skipped silently when their leave and release
    /// events come due.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `root` has been destroyed. No
    /// events are emitted and the stored state is unchanged in that case.
    pub fn update(
        &mut self,
        tree: &SceneTree,
        root: NodeId,
        position: Point,
        buttons: MouseButtons,
        app: &mut dyn AppHandler,
    ) -> Result<(), SceneError> {
        self.update_with(tree, root, position, buttons, app, &())
    }

    /// Like [`update`](Self::update), breaking depth ties by `paint_order`
    /// so the node painted on top receives stack index 0.
    ///
    /// # Errors
    ///
    /// As for [`update`](Self::update).
    pub fn update_with(
        &mut self,
        tree: &SceneTree,
        root: NodeId,
        position: Point,
        buttons: MouseButtons,
        app: &mut dyn AppHandler,
        paint_order: &dyn PaintOrder,
    ) -> Result<(), SceneError> {
        let current = tree.hit_test_with(root, position, self.config.hit_test, paint_order)?;
        let previous_buttons = self.buttons;
        let pressed: Vec<MouseButton> = buttons.pressed_since(previous_buttons).collect();
        let released: Vec<MouseButton> = buttons.released_since(previous_buttons).collect();

        if position != self.position {
            trace!(x = position.x, y = position.y, "global mouse moved");
            app.on_global_mouse_moved(position);
        }
        for &button in &pressed {
            trace!(?button, "global mouse down");
            app.on_global_mouse_down(position, button);
        }
        for &button in &released {
            trace!(?button, "global mouse up");
            app.on_global_mouse_up(position, button);
        }

        for &button in &pressed {
            for (stack_index, entry) in current.iter().enumerate() {
                trace!(node = ?entry.node, ?button, stack_index, "mouse down");
                for listener in listeners_of(tree, entry.node) {
                    listener.on_mouse_down(position, button, stack_index);
                }
            }
        }

        for (stack_index, entry) in current.iter().enumerate() {
            for listener in listeners_of(tree, entry.node) {
                listener.on_mouse_hover(position, stack_index);
            }
        }

        for entry in self.hovered.difference(&current) {
            trace!(node = ?entry.node, "mouse leave");
            for listener in listeners_of(tree, entry.node) {
                listener.on_mouse_leave_hover(position);
            }
        }

        for &button in &released {
            let pressed_on = std::mem::take(&mut self.press_targets[button.index()]);
            let dragged_out = pressed_on.difference(&self.hovered);
            for entry in self.hovered.iter().chain(dragged_out) {
                trace!(node = ?entry.node, ?button, "mouse up");
                for listener in listeners_of(tree, entry.node) {
                    listener.on_mouse_up(position, button);
                }
            }
        }
        for &button in &pressed {
            self.press_targets[button.index()] = current.clone();
        }

        self.position = position;
        self.buttons = buttons;
        self.hovered = current;
        Ok(())
    }

    /// Forwards a pointer move straight to the app handler, bypassing hit
    /// testing and stored state.
    pub fn feed_global_mouse_moved(&self, app: &mut dyn AppHandler, position: Point) {
        app.on_global_mouse_moved(position);
    }

    /// Forwards a button press straight to the app handler.
    pub fn feed_global_mouse_down(
        &self,
        app: &mut dyn AppHandler,
        position: Point,
        button: MouseButton,
    ) {
        app.on_global_mouse_down(position, button);
    }

    /// Forwards a button release straight to the app handler.
    pub fn feed_global_mouse_up(
        &self,
        app: &mut dyn AppHandler,
        position: Point,
        button: MouseButton,
    ) {
        app.on_global_mouse_up(position, button);
    }
}

/// Snapshot of a node's listeners; empty if the node is gone.
fn listeners_of(tree: &SceneTree, node: NodeId) -> Vec<Arc<dyn PointerListener>> {
    tree.listeners(node).unwrap_or_default()
}
