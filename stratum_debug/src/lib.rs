// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree dumps, event recording, and a logging backend for stratum
//! diagnostics.
//!
//! - [`pretty::write_tree`] — indented one-line-per-node dump of a subtree.
//! - [`recorder::EventRecorder`] — a [`PointerListener`] and [`AppHandler`]
//!   that records every callback, with JSON export.
//! - [`backend::LogBackend`] — a [`Backend`] that writes one line per draw
//!   call and counts cache work.
//!
//! [`PointerListener`]: stratum_core::input::PointerListener
//! [`AppHandler`]: stratum_core::input::AppHandler
//! [`Backend`]: stratum_render::Backend

pub mod backend;
pub mod pretty;
pub mod recorder;
