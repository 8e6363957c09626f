// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node pointer listeners.

use kurbo::Point;

use super::buttons::MouseButton;

/// Receives pointer events for the node it is registered on.
///
/// Registered with [`SceneTree::add_listener`](crate::scene::SceneTree::add_listener)
/// and shared through `Arc`, so one listener may serve several nodes. All
/// methods default to no-ops.
///
/// `stack_index` is the node's position in the current hit set, front to
/// back: `0` is the front-most node under the pointer.
///
/// Callbacks run with no tree lock held; a listener may freely mutate the
/// tree it is attached to.
pub trait PointerListener: Send + Sync {
    /// A button was pressed while the pointer was over the node.
    fn on_mouse_down(&self, position: Point, button: MouseButton, stack_index: usize) {
        let _ = (position, button, stack_index);
    }

    /// A button was released that was pressed while the pointer was over the
    /// node (on the previous update).
    fn on_mouse_up(&self, position: Point, button: MouseButton) {
        let _ = (position, button);
    }

    /// The pointer is over the node. Sent on every update.
    fn on_mouse_hover(&self, position: Point, stack_index: usize) {
        let _ = (position, stack_index);
    }

    /// The pointer left the node since the previous update.
    fn on_mouse_leave_hover(&self, position: Point) {
        let _ = position;
    }
}
