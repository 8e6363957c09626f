// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host application's global event handler.

use kurbo::{Point, Size};

use super::buttons::MouseButton;

/// Surface-wide callbacks for the application hosting a scene.
///
/// Exactly one handler is attached to a surface. Unlike
/// [`PointerListener`](super::PointerListener), these events are not tied to
/// any node. All methods default to no-ops, and `()` is the handler that
/// ignores everything.
pub trait AppHandler {
    /// The surface was opened and is about to receive events.
    fn on_enter(&mut self) {}

    /// The surface is closing.
    fn on_exit(&mut self) {}

    /// The surface was resized.
    fn on_resize(&mut self, size: Size) {
        let _ = size;
    }

    /// The pointer moved.
    fn on_global_mouse_moved(&mut self, position: Point) {
        let _ = position;
    }

    /// A button was pressed anywhere on the surface.
    fn on_global_mouse_down(&mut self, position: Point, button: MouseButton) {
        let _ = (position, button);
    }

    /// A button was released anywhere on the surface.
    fn on_global_mouse_up(&mut self, position: Point, button: MouseButton) {
        let _ = (position, button);
    }

    /// A key was pressed. `key` is the host's virtual key code.
    fn on_key_down(&mut self, key: u32) {
        let _ = key;
    }

    /// A key was released.
    fn on_key_up(&mut self, key: u32) {
        let _ = key;
    }

    /// A character was typed.
    fn on_char(&mut self, ch: char) {
        let _ = ch;
    }
}

impl AppHandler for () {}
