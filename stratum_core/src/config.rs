// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree and dispatch configuration.

/// Configuration for a [`SceneTree`](crate::scene::SceneTree).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeConfig {
    /// Whether misuse of the mutation API is reported as an error.
    ///
    /// When `false`, duplicate identifiers, duplicate references, and lookups
    /// of missing children or listeners degrade to no-ops (and `None`
    /// results) instead of returning [`SceneError`](crate::error::SceneError).
    /// Stale handles, cycles, and render-order invariant violations are
    /// reported either way.
    pub error_checking: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::strict()
    }
}

impl TreeConfig {
    /// Reports every misuse of the mutation API.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            error_checking: true,
        }
    }

    /// Turns misuse of the mutation API into no-ops.
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            error_checking: false,
        }
    }
}

/// Whether hidden nodes take part in hit testing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HitTestPolicy {
    /// Every node in the tree is hit-tested regardless of its hidden flag.
    ///
    /// A hidden node therefore still receives hover, press, and release
    /// events.
    #[default]
    IncludeHidden,
    /// Nodes whose own hidden flag is set are never hit.
    ///
    /// Their descendants are still tested; hiding does not cascade.
    VisibleOnly,
}

/// Configuration for a [`PointerDispatcher`](crate::input::PointerDispatcher).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DispatchConfig {
    /// Hit-test policy for hidden nodes.
    pub hit_test: HitTestPolicy,
}
