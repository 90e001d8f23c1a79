//! The radix trie core.
//!
//! A [`SeqTrie`] maps variable-length element sequences to values while
//! storing shared prefixes once. Chains of single-child nodes are kept
//! collapsed at all times: inserting splits an edge in place, removing
//! merges a lone survivor back into its parent. Every node caches the
//! number of valued descendants below it, so [`SeqTrie::len`] and subtree
//! view sizes are O(1).
//!
//! # Architecture
//!
//! * [`sequencer`](crate::sequencer) - how the trie reads keys; supplied
//!   at construction, never bypassed.
//! * `node` / `children` - arena-backed nodes with dense per-node child
//!   tables addressed by element bucket.
//! * [`search`] - the single descent routine behind every read, with four
//!   [`MatchMode`]s.
//! * `edit` - split/absorb surgery and size bookkeeping.
//! * [`view`] / [`iter`] - prefix-scoped live views and lazy pre-order
//!   traversal.
//!
//! Traversal order is the stable position order of each node's child
//! table (ascending element bucket), not insertion order and not
//! lexicographic order of whole keys.
//!
//! The structure is single-writer: none of it is internally synchronized,
//! and the borrow checker enforces that mutation and live iterators never
//! coexist.

mod children;
mod edit;
mod node;

pub mod iter;
pub mod search;
pub mod validate;
pub mod view;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::Arc;

use crate::sequencer::Sequencer;

use self::iter::{Iter, IterMut, Keys, Nodes, Values, ValuesMut};
use self::node::{Arena, Node, NodeId};
use self::search::MatchMode;
use self::view::{SubTrie, SubTrieMut};

/// A compact (radix) trie from sequences of type `Z::Seq` to values.
///
/// Construction takes the [`Sequencer`] that defines the key type; an
/// optional default value is returned by [`get`](Self::get) on a miss.
/// The default match mode starts as [`MatchMode::StartsWith`] and can be
/// changed per instance.
pub struct SeqTrie<Z: Sequencer, V> {
    sequencer: Z,
    arena: Arena<Z::Seq, V>,
    root: NodeId,
    default_mode: MatchMode,
    default_value: Option<V>,
}

impl<Z: Sequencer, V> SeqTrie<Z, V> {
    /// Creates an empty trie reading keys through `sequencer`.
    pub fn new(sequencer: Z) -> Self {
        let mut arena = Arena::new();
        let root = arena.alloc(Node::root());
        SeqTrie {
            sequencer,
            arena,
            root,
            default_mode: MatchMode::default(),
            default_value: None,
        }
    }

    /// Creates an empty trie whose `get` returns `default_value` on a
    /// miss.
    pub fn with_default(sequencer: Z, default_value: V) -> Self {
        let mut trie = Self::new(sequencer);
        trie.default_value = Some(default_value);
        trie
    }

    /// Stores `value` under `key`, returning the previous value stored
    /// under exactly that key.
    ///
    /// A zero-length key is a no-op returning `None`. A key whose
    /// diverging element shares a child bucket with an existing sibling
    /// (a sequencer hash collision between unequal elements) is not
    /// stored and `None` is returned; later lookups of it miss. The key
    /// is shared with the nodes that end up windowing into it and is
    /// released once nothing references it anymore.
    pub fn put(&mut self, key: Z::Seq, value: V) -> Option<V> {
        let len = self.sequencer.length(&key);
        if len == 0 {
            return None;
        }
        let seq = Arc::new(key);
        let mut cur = match self.child_of(self.root, self.sequencer.hash_at(&*seq, 0)) {
            Some(id) => id,
            None => {
                self.attach_leaf(self.root, seq, 0, len, value);
                return None;
            }
        };
        let mut offset = 0;
        loop {
            let (node_len, cap, m) = {
                let node = self.arena.node(cur);
                let node_len = node.edge_len();
                let cap = node_len.min(len - offset);
                let nseq = node.seq.as_deref().expect("non-root node without sequence");
                let m = self.sequencer.matches(nseq, node.start, &*seq, offset, cap);
                (node_len, cap, m)
            };
            offset += m;
            if m < cap {
                // keys diverge inside the edge; a split hangs the two
                // tails in separate buckets, which requires the differing
                // elements to hash apart
                let colliding = {
                    let node = self.arena.node(cur);
                    let nseq = node.seq.as_deref().expect("non-root node without sequence");
                    self.sequencer.hash_at(nseq, node.start + m)
                        == self.sequencer.hash_at(&*seq, offset)
                };
                if colliding {
                    tracing::warn!("element bucket collision, key not stored");
                    return None;
                }
                self.split_edge(cur, m, None, None);
                self.attach_leaf(cur, seq, offset, len, value);
                return None;
            }
            if cap < node_len {
                // the new key ends inside the edge: the head keeps it
                debug_assert_eq!(offset, len);
                self.split_edge(cur, cap, Some(value), Some(seq));
                return None;
            }
            if offset == len {
                // boundary hit: overwrite, re-pointing at the newest key
                // so the older (possibly longer) one can be released
                let node = self.arena.node_mut(cur);
                node.seq = Some(seq);
                let prior = node.value.replace(value);
                if prior.is_none() {
                    self.adjust_size_walk(cur, 1);
                }
                return prior;
            }
            match self.child_of(cur, self.sequencer.hash_at(&*seq, offset)) {
                Some(next) => cur = next,
                None => {
                    self.attach_leaf(cur, seq, offset, len, value);
                    return None;
                }
            }
        }
    }

    /// Looks up `key` under the default match mode, falling back to the
    /// default value on a miss.
    pub fn get(&self, key: &Z::Seq) -> Option<&V> {
        self.get_with(key, self.default_mode)
    }

    /// Looks up `key` under an explicit match mode.
    pub fn get_with(&self, key: &Z::Seq, mode: MatchMode) -> Option<&V> {
        self.get_from(Some(self.root), key, mode)
    }

    /// Mutable access to the value stored under exactly `key`.
    pub fn get_mut(&mut self, key: &Z::Seq) -> Option<&mut V> {
        let id = self.search_from(self.root, key, MatchMode::Exact)?;
        self.arena.node_mut(id).value.as_mut()
    }

    /// Whether `key` matches under the default mode.
    pub fn has(&self, key: &Z::Seq) -> bool {
        self.has_with(key, self.default_mode)
    }

    /// Whether `key` matches under `mode`. For [`MatchMode::Exact`] this
    /// requires a verified stored value; the other modes test structure.
    pub fn has_with(&self, key: &Z::Seq, mode: MatchMode) -> bool {
        self.search_from(self.root, key, mode).is_some()
    }

    /// Removes the value stored under exactly `key`, compacting the path
    /// it leaves behind.
    pub fn remove(&mut self, key: &Z::Seq) -> Option<V> {
        let root = self.root;
        self.remove_from(root, key)
    }

    /// Number of stored values. O(1).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.node(self.root).size
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every stored key and value.
    pub fn clear(&mut self) {
        self.arena = Arena::new();
        self.root = self.arena.alloc(Node::root());
        tracing::debug!("cleared trie");
    }

    /// Whether any stored value equals `probe`.
    pub fn contains_value(&self, probe: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == probe)
    }

    /// The match mode used by `get`/`has` when none is given.
    #[inline]
    #[must_use]
    pub fn default_mode(&self) -> MatchMode {
        self.default_mode
    }

    pub fn set_default_mode(&mut self, mode: MatchMode) {
        self.default_mode = mode;
    }

    /// The value `get` falls back to on a miss.
    #[inline]
    #[must_use]
    pub fn default_value(&self) -> Option<&V> {
        self.default_value.as_ref()
    }

    pub fn set_default_value(&mut self, value: Option<V>) {
        self.default_value = value;
    }

    #[inline]
    #[must_use]
    pub fn sequencer(&self) -> &Z {
        &self.sequencer
    }

    // ---- iteration over the whole trie ----

    /// Stored keys, lazily, in traversal order.
    pub fn keys(&self) -> Keys<'_, Z, V> {
        Keys::new(self, Some(self.root))
    }

    /// Stored values, lazily, in traversal order.
    pub fn values(&self) -> Values<'_, Z, V> {
        Values::new(self, Some(self.root))
    }

    /// Mutable stored values, lazily, in traversal order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, Z, V> {
        let root = self.root;
        ValuesMut::new(self, Some(root))
    }

    /// `(key, value)` pairs, lazily, in traversal order.
    pub fn iter(&self) -> Iter<'_, Z, V> {
        Iter::new(self, Some(self.root))
    }

    /// `(key, mutable value)` pairs, lazily, in traversal order.
    pub fn iter_mut(&mut self) -> IterMut<'_, Z, V> {
        let root = self.root;
        IterMut::new(self, Some(root))
    }

    /// Read handles on every valued node.
    pub fn nodes(&self) -> Nodes<'_, Z, V> {
        Nodes::new(self, Some(self.root), false)
    }

    /// Read handles on every node, naked branches included.
    pub fn nodes_all(&self) -> Nodes<'_, Z, V> {
        Nodes::new(self, Some(self.root), true)
    }

    // ---- prefix-scoped views ----

    /// Live view over every stored key starting with `prefix`
    /// ([`MatchMode::Subtree`]). An unmatched prefix yields an empty
    /// view.
    pub fn subtrie(&self, prefix: &Z::Seq) -> SubTrie<'_, Z, V> {
        self.subtrie_with(prefix, MatchMode::Subtree)
    }

    /// Live view rooted by resolving `prefix` under `mode`.
    pub fn subtrie_with(&self, prefix: &Z::Seq, mode: MatchMode) -> SubTrie<'_, Z, V> {
        let root = self.search_from(self.root, prefix, mode);
        SubTrie::new(self, root)
    }

    /// Mutating view over every stored key starting with `prefix`.
    pub fn subtrie_mut(&mut self, prefix: &Z::Seq) -> SubTrieMut<'_, Z, V> {
        self.subtrie_mut_with(prefix, MatchMode::Subtree)
    }

    /// Mutating view rooted by resolving `prefix` under `mode`.
    pub fn subtrie_mut_with(&mut self, prefix: &Z::Seq, mode: MatchMode) -> SubTrieMut<'_, Z, V> {
        let root = self.search_from(self.root, prefix, mode);
        SubTrieMut::new(self, root)
    }

    // ---- shared internals ----

    pub(crate) fn get_from(
        &self,
        from: Option<NodeId>,
        key: &Z::Seq,
        mode: MatchMode,
    ) -> Option<&V> {
        match from.and_then(|f| self.search_from(f, key, mode)) {
            Some(id) => self
                .arena
                .node(id)
                .value
                .as_ref()
                .or(self.default_value.as_ref()),
            None => self.default_value.as_ref(),
        }
    }
}

impl<Z: Sequencer, V> fmt::Debug for SeqTrie<Z, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeqTrie")
            .field("len", &self.len())
            .field("nodes", &self.arena.live_count())
            .field("default_mode", &self.default_mode)
            .finish_non_exhaustive()
    }
}
