// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event recording.
//!
//! [`EventRecorder`] is a cheap-to-clone handle onto a shared event log. It
//! implements both [`PointerListener`] (register it on nodes, optionally
//! under different labels via [`EventRecorder::labeled`]) and
//! [`AppHandler`] (hand a clone to a surface), so a whole session lands in
//! one ordered log that can be asserted on or exported as JSON.

use std::io::{self, Write};
use std::sync::Arc;

use kurbo::{Point, Size};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use stratum_core::input::{AppHandler, MouseButton, PointerListener};

/// Serializable mirror of [`MouseButton`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    /// [`MouseButton::Primary`].
    Primary,
    /// [`MouseButton::Secondary`].
    Secondary,
    /// [`MouseButton::Middle`].
    Middle,
    /// [`MouseButton::Side1`].
    Side1,
    /// [`MouseButton::Side2`].
    Side2,
}

impl From<MouseButton> for Button {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Primary => Self::Primary,
            MouseButton::Secondary => Self::Secondary,
            MouseButton::Middle => Self::Middle,
            MouseButton::Side1 => Self::Side1,
            MouseButton::Side2 => Self::Side2,
        }
    }
}

/// One recorded callback.
///
/// Per-node events carry the label of the recorder handle they arrived
/// through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecordedEvent {
    /// [`PointerListener::on_mouse_down`].
    MouseDown {
        /// Recorder label.
        label: String,
        /// Pointer x.
        x: f64,
        /// Pointer y.
        y: f64,
        /// Button pressed.
        button: Button,
        /// Front-to-back index in the hit set.
        stack_index: usize,
    },
    /// [`PointerListener::on_mouse_up`].
    MouseUp {
        /// Recorder label.
        label: String,
        /// Pointer x.
        x: f64,
        /// Pointer y.
        y: f64,
        /// Button released.
        button: Button,
    },
    /// [`PointerListener::on_mouse_hover`].
    Hover {
        /// Recorder label.
        label: String,
        /// Pointer x.
        x: f64,
        /// Pointer y.
        y: f64,
        /// Front-to-back index in the hit set.
        stack_index: usize,
    },
    /// [`PointerListener::on_mouse_leave_hover`].
    Leave {
        /// Recorder label.
        label: String,
        /// Pointer x.
        x: f64,
        /// Pointer y.
        y: f64,
    },
    /// [`AppHandler::on_global_mouse_moved`].
    GlobalMoved {
        /// Pointer x.
        x: f64,
        /// Pointer y.
        y: f64,
    },
    /// [`AppHandler::on_global_mouse_down`].
    GlobalDown {
        /// Pointer x.
        x: f64,
        /// Pointer y.
        y: f64,
        /// Button pressed.
        button: Button,
    },
    /// [`AppHandler::on_global_mouse_up`].
    GlobalUp {
        /// Pointer x.
        x: f64,
        /// Pointer y.
        y: f64,
        /// Button released.
        button: Button,
    },
    /// [`AppHandler::on_enter`].
    Enter,
    /// [`AppHandler::on_exit`].
    Exit,
    /// [`AppHandler::on_resize`].
    Resize {
        /// New width.
        width: f64,
        /// New height.
        height: f64,
    },
    /// [`AppHandler::on_key_down`].
    KeyDown {
        /// Host key code.
        key: u32,
    },
    /// [`AppHandler::on_key_up`].
    KeyUp {
        /// Host key code.
        key: u32,
    },
    /// [`AppHandler::on_char`].
    Char {
        /// Character typed.
        ch: char,
    },
}

impl RecordedEvent {
    /// The label of a per-node event; `None` for app events.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::MouseDown { label, .. }
            | Self::MouseUp { label, .. }
            | Self::Hover { label, .. }
            | Self::Leave { label, .. } => Some(label.as_str()),
            _ => None,
        }
    }
}

/// A labeled handle onto a shared event log.
#[derive(Clone, Debug)]
pub struct EventRecorder {
    label: String,
    log: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl Default for EventRecorder {
    fn default() -> Self {
        Self::new("recorder")
    }
}

impl EventRecorder {
    /// Creates a recorder with a fresh log.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            log: Arc::default(),
        }
    }

    /// Returns a handle onto the same log that tags per-node events with
    /// `label`.
    #[must_use]
    pub fn labeled(&self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            log: Arc::clone(&self.log),
        }
    }

    /// This handle's label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns a copy of every event recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.log.lock().clone()
    }

    /// Removes and returns every event recorded so far.
    pub fn take(&self) -> Vec<RecordedEvent> {
        std::mem::take(&mut *self.log.lock())
    }

    /// Discards every event recorded so far.
    pub fn clear(&self) {
        self.log.lock().clear();
    }

    /// Returns the per-node events recorded under `label`.
    #[must_use]
    pub fn events_for(&self, label: &str) -> Vec<RecordedEvent> {
        self.log
            .lock()
            .iter()
            .filter(|event| event.label() == Some(label))
            .cloned()
            .collect()
    }

    /// Serializes the log as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&*self.log.lock())
    }

    /// Writes the log as a JSON array to `writer`.
    pub fn export(&self, writer: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, &*self.log.lock())?;
        writeln!(writer)
    }

    /// Parses a log previously written by [`export`](Self::export).
    pub fn parse(json: &str) -> serde_json::Result<Vec<RecordedEvent>> {
        serde_json::from_str(json)
    }

    fn push(&self, event: RecordedEvent) {
        self.log.lock().push(event);
    }
}

impl PointerListener for EventRecorder {
    fn on_mouse_down(&self, position: Point, button: MouseButton, stack_index: usize) {
        self.push(RecordedEvent::MouseDown {
            label: self.label.clone(),
            x: position.x,
            y: position.y,
            button: button.into(),
            stack_index,
        });
    }

    fn on_mouse_up(&self, position: Point, button: MouseButton) {
        self.push(RecordedEvent::MouseUp {
            label: self.label.clone(),
            x: position.x,
            y: position.y,
            button: button.into(),
        });
    }

    fn on_mouse_hover(&self, position: Point, stack_index: usize) {
        self.push(RecordedEvent::Hover {
            label: self.label.clone(),
            x: position.x,
            y: position.y,
            stack_index,
        });
    }

    fn on_mouse_leave_hover(&self, position: Point) {
        self.push(RecordedEvent::Leave {
            label: self.label.clone(),
            x: position.x,
            y: position.y,
        });
    }
}

impl AppHandler for EventRecorder {
    fn on_enter(&mut self) {
        self.push(RecordedEvent::Enter);
    }

    fn on_exit(&mut self) {
        self.push(RecordedEvent::Exit);
    }

    fn on_resize(&mut self, size: Size) {
        self.push(RecordedEvent::Resize {
            width: size.width,
            height: size.height,
        });
    }

    fn on_global_mouse_moved(&mut self, position: Point) {
        self.push(RecordedEvent::GlobalMoved {
            x: position.x,
            y: position.y,
        });
    }

    fn on_global_mouse_down(&mut self, position: Point, button: MouseButton) {
        self.push(RecordedEvent::GlobalDown {
            x: position.x,
            y: position.y,
            button: button.into(),
        });
    }

    fn on_global_mouse_up(&mut self, position: Point, button: MouseButton) {
        self.push(RecordedEvent::GlobalUp {
            x: position.x,
            y: position.y,
            button: button.into(),
        });
    }

    fn on_key_down(&mut self, key: u32) {
        self.push(RecordedEvent::KeyDown { key });
    }

    fn on_key_up(&mut self, key: u32) {
        self.push(RecordedEvent::KeyUp { key });
    }

    fn on_char(&mut self, ch: char) {
        self.push(RecordedEvent::Char { ch });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_handles_share_one_log() {
        let app = EventRecorder::new("app");
        let button = app.labeled("button");
        button.on_mouse_hover(Point::new(1.0, 2.0), 0);
        let mut handler = app.clone();
        handler.on_key_down(13);

        assert_eq!(
            app.events(),
            vec![
                RecordedEvent::Hover {
                    label: "button".into(),
                    x: 1.0,
                    y: 2.0,
                    stack_index: 0,
                },
                RecordedEvent::KeyDown { key: 13 },
            ]
        );
        assert_eq!(app.events_for("button").len(), 1);
        assert!(app.events_for("app").is_empty(), "app events carry no label");
    }

    #[test]
    fn json_export_is_tagged_and_parses_back() {
        let recorder = EventRecorder::new("x");
        recorder.on_mouse_down(Point::new(3.0, 4.0), MouseButton::Secondary, 2);
        let mut handler = recorder.clone();
        handler.on_char('q');

        let json = recorder.to_json().unwrap();
        assert!(json.contains("\"event\": \"mouse_down\""), "{json}");
        assert!(json.contains("\"button\": \"secondary\""), "{json}");

        let mut exported = Vec::new();
        recorder.export(&mut exported).unwrap();
        let parsed = EventRecorder::parse(std::str::from_utf8(&exported).unwrap()).unwrap();
        assert_eq!(parsed, recorder.events());
    }

    #[test]
    fn take_drains() {
        let recorder = EventRecorder::default();
        recorder.on_mouse_leave_hover(Point::ZERO);
        assert_eq!(recorder.take().len(), 1);
        assert!(recorder.events().is_empty(), "drained");
    }
}
