//! Prefix-scoped live views.
//!
//! A view is a light handle: one node acting as a logical root plus a
//! borrow of the owning trie. Reads and iteration behave exactly like the
//! top-level API restricted to that subtree; lookups still take the full
//! key as seen from the trie root. Views are live - a [`SubTrieMut`]
//! mutates the owning trie directly, and the borrow checker keeps shared
//! views and mutation from overlapping.

use super::iter::{Iter, IterMut, Keys, Nodes, Values, ValuesMut};
use super::node::NodeId;
use super::search::MatchMode;
use super::SeqTrie;
use crate::sequencer::Sequencer;

/// Shared view over the subtree under one node.
///
/// Obtained from [`SeqTrie::subtrie`]; a prefix that matches nothing
/// yields an empty view.
pub struct SubTrie<'a, Z: Sequencer, V> {
    trie: &'a SeqTrie<Z, V>,
    root: Option<NodeId>,
}

impl<'a, Z: Sequencer, V> SubTrie<'a, Z, V> {
    pub(crate) fn new(trie: &'a SeqTrie<Z, V>, root: Option<NodeId>) -> Self {
        SubTrie { trie, root }
    }

    /// Stored values inside this view. O(1) via the root's cached size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.map_or(0, |r| self.trie.arena.node(r).size)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scoped lookup under the trie's default mode. `key` is the full
    /// key, not relative to the view root.
    pub fn get(&self, key: &Z::Seq) -> Option<&'a V> {
        self.get_with(key, self.trie.default_mode())
    }

    pub fn get_with(&self, key: &Z::Seq, mode: MatchMode) -> Option<&'a V> {
        self.trie.get_from(self.root, key, mode)
    }

    pub fn has(&self, key: &Z::Seq) -> bool {
        self.has_with(key, self.trie.default_mode())
    }

    pub fn has_with(&self, key: &Z::Seq, mode: MatchMode) -> bool {
        self.root
            .and_then(|r| self.trie.search_from(r, key, mode))
            .is_some()
    }

    pub fn keys(&self) -> Keys<'a, Z, V> {
        Keys::new(self.trie, self.root)
    }

    pub fn values(&self) -> Values<'a, Z, V> {
        Values::new(self.trie, self.root)
    }

    pub fn iter(&self) -> Iter<'a, Z, V> {
        Iter::new(self.trie, self.root)
    }

    /// Handles on the valued nodes of this subtree.
    pub fn nodes(&self) -> Nodes<'a, Z, V> {
        Nodes::new(self.trie, self.root, false)
    }

    /// Handles on every node of this subtree, naked branches included.
    pub fn nodes_all(&self) -> Nodes<'a, Z, V> {
        Nodes::new(self.trie, self.root, true)
    }

    pub fn contains_value(&self, probe: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == probe)
    }
}

impl<Z: Sequencer, V> Clone for SubTrie<'_, Z, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Z: Sequencer, V> Copy for SubTrie<'_, Z, V> {}

/// Mutating view over the subtree under one node.
///
/// Obtained from [`SeqTrie::subtrie_mut`]. Mutations go straight to the
/// owning trie; removing the view root's own key empties the view.
pub struct SubTrieMut<'a, Z: Sequencer, V> {
    trie: &'a mut SeqTrie<Z, V>,
    root: Option<NodeId>,
}

impl<'a, Z: Sequencer, V> SubTrieMut<'a, Z, V> {
    pub(crate) fn new(trie: &'a mut SeqTrie<Z, V>, root: Option<NodeId>) -> Self {
        SubTrieMut { trie, root }
    }

    /// Reborrows as a shared view.
    pub fn as_view(&self) -> SubTrie<'_, Z, V> {
        SubTrie::new(self.trie, self.root)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.as_view().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &Z::Seq) -> Option<&V> {
        self.trie.get_from(self.root, key, self.trie.default_mode())
    }

    pub fn get_with(&self, key: &Z::Seq, mode: MatchMode) -> Option<&V> {
        self.trie.get_from(self.root, key, mode)
    }

    pub fn has(&self, key: &Z::Seq) -> bool {
        self.as_view().has(key)
    }

    pub fn has_with(&self, key: &Z::Seq, mode: MatchMode) -> bool {
        self.as_view().has_with(key, mode)
    }

    /// Mutable access to the value stored under exactly `key`, scoped to
    /// this subtree.
    pub fn get_mut(&mut self, key: &Z::Seq) -> Option<&mut V> {
        let root = self.root?;
        let id = self.trie.search_from(root, key, MatchMode::Exact)?;
        self.trie.arena.node_mut(id).value.as_mut()
    }

    /// Removes the value stored under exactly `key` from the owning trie,
    /// provided the key lies inside this view.
    pub fn remove(&mut self, key: &Z::Seq) -> Option<V> {
        let root = self.root?;
        let removed = self.trie.remove_from(root, key);
        if removed.is_some() && !self.trie.arena.is_live(root) {
            // the view root itself was detached
            self.root = None;
        }
        removed
    }

    pub fn keys(&self) -> Keys<'_, Z, V> {
        Keys::new(self.trie, self.root)
    }

    pub fn values(&self) -> Values<'_, Z, V> {
        Values::new(self.trie, self.root)
    }

    pub fn iter(&self) -> Iter<'_, Z, V> {
        Iter::new(self.trie, self.root)
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, Z, V> {
        ValuesMut::new(self.trie, self.root)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, Z, V> {
        IterMut::new(self.trie, self.root)
    }

    pub fn nodes(&self) -> Nodes<'_, Z, V> {
        Nodes::new(self.trie, self.root, false)
    }

    pub fn nodes_all(&self) -> Nodes<'_, Z, V> {
        Nodes::new(self.trie, self.root, true)
    }

    pub fn contains_value(&self, probe: &V) -> bool
    where
        V: PartialEq,
    {
        self.as_view().contains_value(probe)
    }
}
