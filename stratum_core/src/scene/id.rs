// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity.

slotmap::new_key_type! {
    /// A handle to a node in a [`SceneTree`](super::SceneTree).
    ///
    /// Contains both a slot index and a version so that handles to destroyed
    /// nodes are detected after the slot is reused.
    pub struct NodeId;
}
