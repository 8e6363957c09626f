// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable tree dumps.
//!
//! One line per node, indented two spaces per level, children in name
//! order:
//!
//! ```text
//! root [base] depth=0 at=(0, 0) size=800x600 *
//!   label [text "hello"] depth=2 at=(10, 10) size=80x20
//!   icon [image] depth=1 at=(0, 0) size=16x16 hidden
//! ```
//!
//! A trailing `*` marks a modified node.

use std::io::{self, Write};

use stratum_core::scene::{NodeId, NodeKind, NodeSnapshot, SceneTree};

/// Writes the subtree at `root` to `writer`.
///
/// Nodes destroyed while the dump is in progress are left out. A stale
/// `root` is reported as an [`io::ErrorKind::Other`] error.
pub fn write_tree(tree: &SceneTree, root: NodeId, writer: &mut dyn Write) -> io::Result<()> {
    tree.snapshot(root).map_err(io::Error::other)?;

    let mut stack = vec![(root, 0_usize)];
    while let Some((node, level)) = stack.pop() {
        let Ok(snapshot) = tree.snapshot(node) else {
            continue;
        };
        write_line(writer, &snapshot, level)?;
        if let Ok(children) = tree.children(node) {
            stack.extend(children.into_iter().rev().map(|child| (child, level + 1)));
        }
    }
    Ok(())
}

/// Returns the dump of the subtree at `root` as a string.
pub fn tree_to_string(tree: &SceneTree, root: NodeId) -> io::Result<String> {
    let mut out = Vec::new();
    write_tree(tree, root, &mut out)?;
    String::from_utf8(out).map_err(io::Error::other)
}

fn write_line(writer: &mut dyn Write, node: &NodeSnapshot, level: usize) -> io::Result<()> {
    let name = if node.name.is_empty() {
        "<unnamed>"
    } else {
        node.name.as_str()
    };
    write!(writer, "{:indent$}{name} [", "", indent = level * 2)?;
    match &node.kind {
        NodeKind::Base => write!(writer, "base")?,
        NodeKind::Text(text) => write!(writer, "text {:?}", text.text)?,
        NodeKind::Image(_) => write!(writer, "image")?,
    }
    let origin = node.bounds.origin();
    let size = node.bounds.size();
    write!(
        writer,
        "] depth={} at=({}, {}) size={}x{}",
        node.depth, origin.x, origin.y, size.width, size.height
    )?;
    if node.hidden {
        write!(writer, " hidden")?;
    }
    if node.modified {
        write!(writer, " *")?;
    }
    writeln!(writer)
}
