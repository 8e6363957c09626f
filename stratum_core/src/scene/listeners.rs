// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer-listener registration.

use std::sync::Arc;

use tracing::debug;

use super::id::NodeId;
use super::tree::SceneTree;
use crate::error::SceneError;
use crate::input::PointerListener;

impl SceneTree {
    /// Registers `listener` on `node` under `id`.
    ///
    /// Listeners are invoked in id order. Registering does not mark the node
    /// modified, since listeners have no visual effect.
    ///
    /// # Errors
    ///
    /// - [`SceneError::DuplicateListener`] if `id` is taken on this node.
    /// - [`SceneError::DuplicateListenerReference`] if the same listener
    ///   (by `Arc` identity) is already registered under another id.
    /// - [`SceneError::StaleNode`] if `node` is stale.
    pub fn add_listener(
        &self,
        node: NodeId,
        id: impl Into<String>,
        listener: Arc<dyn PointerListener>,
    ) -> Result<(), SceneError> {
        let id = id.into();
        let cell = self.cell(node)?;
        let mut state = cell.state.lock();
        if state.listeners.contains_key(&id) {
            let err = SceneError::DuplicateListener {
                node: state.name.clone(),
                id,
            };
            drop(state);
            return self.reject(err);
        }
        if let Some(existing) = state
            .listeners
            .iter()
            .find(|(_, registered)| Arc::ptr_eq(registered, &listener))
            .map(|(key, _)| key.clone())
        {
            let err = SceneError::DuplicateListenerReference {
                node: state.name.clone(),
                existing,
                id,
            };
            drop(state);
            return self.reject(err);
        }
        debug!(node = ?node, listener = %id, "added listener");
        state.listeners.insert(id, listener);
        Ok(())
    }

    /// Unregisters and returns the listener registered under `id`.
    ///
    /// # Errors
    ///
    /// - [`SceneError::ListenerNotFound`] if nothing is registered under `id`
    ///   (`Ok(None)` without error checking).
    /// - [`SceneError::StaleNode`] if `node` is stale.
    pub fn remove_listener(
        &self,
        node: NodeId,
        id: &str,
    ) -> Result<Option<Arc<dyn PointerListener>>, SceneError> {
        let cell = self.cell(node)?;
        let mut state = cell.state.lock();
        match state.listeners.remove(id) {
            Some(listener) => Ok(Some(listener)),
            None => {
                let err = SceneError::ListenerNotFound {
                    node: state.name.clone(),
                    id: id.to_owned(),
                };
                drop(state);
                self.reject(err)
            }
        }
    }

    /// Returns the node's listeners in id order.
    ///
    /// The returned handles are clones, so callers can invoke them after the
    /// node lock is released.
    pub fn listeners(&self, node: NodeId) -> Result<Vec<Arc<dyn PointerListener>>, SceneError> {
        self.with_node(node, |state| state.listeners.values().cloned().collect())
    }

    /// Returns the ids of the node's listeners, in order.
    pub fn listener_ids(&self, node: NodeId) -> Result<Vec<String>, SceneError> {
        self.with_node(node, |state| state.listeners.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::config::TreeConfig;
    use crate::error::SceneError;
    use crate::input::PointerListener;
    use crate::scene::{NodeDesc, SceneTree};

    struct Silent;

    impl PointerListener for Silent {}

    #[test]
    fn add_and_remove() {
        let tree = SceneTree::new();
        let node = tree.create_root(NodeDesc::base(), "button");
        tree.add_listener(node, "b", Arc::new(Silent)).unwrap();
        tree.add_listener(node, "a", Arc::new(Silent)).unwrap();
        assert_eq!(tree.listener_ids(node).unwrap(), vec!["a", "b"]);
        assert_eq!(tree.listeners(node).unwrap().len(), 2);

        assert!(tree.remove_listener(node, "a").unwrap().is_some());
        assert_eq!(tree.listener_ids(node).unwrap(), vec!["b"]);
    }

    #[test]
    fn duplicate_id_and_reference_are_rejected() {
        let tree = SceneTree::new();
        let node = tree.create_root(NodeDesc::base(), "button");
        let listener: Arc<dyn PointerListener> = Arc::new(Silent);
        tree.add_listener(node, "a", Arc::clone(&listener)).unwrap();

        assert_eq!(
            tree.add_listener(node, "a", Arc::new(Silent)),
            Err(SceneError::DuplicateListener {
                node: "button".into(),
                id: "a".into(),
            })
        );
        assert_eq!(
            tree.add_listener(node, "b", listener),
            Err(SceneError::DuplicateListenerReference {
                node: "button".into(),
                existing: "a".into(),
                id: "b".into(),
            })
        );
        assert!(matches!(
            tree.remove_listener(node, "zzz"),
            Err(SceneError::ListenerNotFound { .. })
        ));
    }

    #[test]
    fn fast_mode_ignores_listener_misuse() {
        let tree = SceneTree::with_config(TreeConfig::fast());
        let node = tree.create_node(NodeDesc::base());
        tree.add_listener(node, "a", Arc::new(Silent)).unwrap();
        assert_eq!(tree.add_listener(node, "a", Arc::new(Silent)), Ok(()));
        assert!(tree.remove_listener(node, "missing").unwrap().is_none());
        assert_eq!(tree.listener_ids(node).unwrap(), vec!["a"]);
    }

    #[test]
    fn listeners_do_not_mark_modified() {
        let tree = SceneTree::new();
        let node = tree.create_node(NodeDesc::base());
        tree.clear_modified(node).unwrap();
        tree.add_listener(node, "a", Arc::new(Silent)).unwrap();
        assert!(!tree.is_modified(node).unwrap());
    }
}
