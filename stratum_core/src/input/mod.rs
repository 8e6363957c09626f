// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input: buttons, listeners, hit testing, and dispatch.
//!
//! The host feeds one pointer snapshot per frame (position plus the mask of
//! held buttons) into a [`PointerDispatcher`]. The dispatcher hit-tests the
//! tree, diffs the result against the previous snapshot, and turns the
//! difference into global events for the single [`AppHandler`] and per-node
//! events for every [`PointerListener`] on the nodes involved.

mod app;
mod buttons;
mod dispatcher;
mod hit;
mod listener;

pub use app::AppHandler;
pub use buttons::{MouseButton, MouseButtons};
pub use dispatcher::PointerDispatcher;
pub use hit::{HitEntry, HitSet, PaintOrder};
pub use listener::PointerListener;
