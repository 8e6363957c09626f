// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained scene tree, modification tracking, and pointer dispatch.
//!
//! `stratum_core` provides the data structures behind an interactive UI
//! surface: a tree of positioned, sized, nestable nodes that can be mutated
//! from any thread, queried lazily for pending visual changes, and hit-tested
//! against a pointer to produce depth-ordered input events.
//!
//! # Architecture
//!
//! ```text
//!   Host input (position, buttons)
//!       │
//!       ▼
//!   PointerDispatcher::update() ──► SceneTree::hit_test() ──► HitSet
//!       │                                                      │
//!       │           diff(previous HitSet, current HitSet) ◄────┘
//!       ▼
//!   AppHandler (global events)  +  PointerListener (per-node events)
//! ```
//!
//! **[`scene`]** — Arena-backed node tree with generational [`NodeId`]
//! handles. Each node is guarded by its own lock, so unrelated subtrees can
//! be mutated concurrently. Mutations set a per-node *modified* flag and
//! structural changes bump a tree-wide structure version that render-order
//! consumers compare against.
//!
//! **[`input`]** — Button masks, the listener and host handler traits, hit
//! testing, and the [`PointerDispatcher`](input::PointerDispatcher) diff
//! machine that turns per-frame pointer state into hover, press, and release
//! events.
//!
//! **[`config`]** — Strictness and hit-test policy switches.
//!
//! **[`error`]** — [`SceneError`], the checked failure taxonomy.
//!
//! **[`color`]** — RGBA color values used by node content.
//!
//! [`NodeId`]: scene::NodeId
//! [`SceneError`]: error::SceneError

pub mod color;
pub mod config;
pub mod error;
pub mod input;
pub mod scene;
