//! Structural surgery: edge splitting, compaction, size maintenance.
//!
//! Insertion splits a node in place by carving its tail into a fresh child
//! that takes over the original identity (value, children, sequence
//! window). Removal runs the reverse move: a node left with a single
//! child absorbs it, re-extending the edge label. Subtree sizes are kept
//! incrementally by walking the parent chain on every value-presence
//! toggle; splits and absorbs never change the valued set, so they never
//! walk.

use std::sync::Arc;

use smallvec::SmallVec;

use super::children::ChildIndex;
use super::node::{Node, NodeId};
use super::search::MatchMode;
use super::SeqTrie;
use crate::sequencer::Sequencer;

impl<Z: Sequencer, V> SeqTrie<Z, V> {
    /// Hangs a new valued leaf under `parent` for `seq[start..end)`.
    pub(crate) fn attach_leaf(
        &mut self,
        parent: NodeId,
        seq: Arc<Z::Seq>,
        start: usize,
        end: usize,
        value: V,
    ) -> NodeId {
        let hash = self.sequencer.hash_at(&*seq, start);
        let id = self.arena.alloc(Node {
            parent: Some(parent),
            seq: Some(seq),
            start,
            end,
            value: Some(value),
            children: None,
            size: 1,
        });
        let displaced = self
            .arena
            .node_mut(parent)
            .children
            .get_or_insert_with(ChildIndex::new)
            .insert(hash, id);
        debug_assert!(displaced.is_none(), "sibling bucket collision");
        self.adjust_size_walk(parent, 1);
        id
    }

    /// Splits `cur`'s edge at relative index `at`, strictly inside the
    /// edge.
    ///
    /// The tail `[start + at, end)` moves into a new child that takes over
    /// `cur`'s value, children, and sequence handle; `cur` keeps the head
    /// and receives `new_value` (and, for an interior-key insert,
    /// `new_seq` - the freshly stored key whose length is exactly the
    /// head).
    pub(crate) fn split_edge(
        &mut self,
        cur: NodeId,
        at: usize,
        new_value: Option<V>,
        new_seq: Option<Arc<Z::Seq>>,
    ) {
        let has_new_value = new_value.is_some();
        let (tail_seq, tail_start, tail_end, tail_value, tail_children, tail_size) = {
            let node = self.arena.node_mut(cur);
            debug_assert!(at > 0 && at < node.edge_len());
            let tail_start = node.start + at;
            let tail_end = node.end;
            node.end = tail_start;
            (
                node.seq.clone().expect("split of the root"),
                tail_start,
                tail_end,
                node.value.take(),
                node.children.take(),
                node.size,
            )
        };
        let tail_hash = self.sequencer.hash_at(&*tail_seq, tail_start);
        let tail = self.arena.alloc(Node {
            parent: Some(cur),
            seq: Some(tail_seq),
            start: tail_start,
            end: tail_end,
            value: tail_value,
            children: tail_children,
            size: tail_size,
        });
        self.reparent_children(tail);

        let node = self.arena.node_mut(cur);
        if let Some(seq) = new_seq {
            node.seq = Some(seq);
        }
        node.value = new_value;
        let mut index = ChildIndex::new();
        index.insert(tail_hash, tail);
        node.children = Some(index);
        if has_new_value {
            self.adjust_size_walk(cur, 1);
        }
        tracing::trace!(at, valued = has_new_value, "split edge");
    }

    /// EXACT-scoped removal under `from`. Returns the removed value.
    pub(crate) fn remove_from(&mut self, from: NodeId, key: &Z::Seq) -> Option<V> {
        let target = self.search_from(from, key, MatchMode::Exact)?;
        let prior = self.arena.node_mut(target).value.take();
        debug_assert!(prior.is_some());
        self.adjust_size_walk(target, -1);
        match self.arena.node(target).child_count() {
            0 => {
                let parent = self.detach(target);
                // a parent left naked with one remaining child is
                // compacted right away, keeping branch degrees >= 2
                if parent != self.root {
                    let p = self.arena.node(parent);
                    if p.is_naked() && p.child_count() == 1 {
                        self.absorb_lone_child(parent);
                    }
                }
            }
            1 => self.absorb_lone_child(target),
            _ => {} // survives as a naked branch
        }
        prior
    }

    /// Unhooks `id` from its parent's child index and releases it.
    /// Returns the parent.
    fn detach(&mut self, id: NodeId) -> NodeId {
        let (parent, hash) = {
            let node = self.arena.node(id);
            let seq = node.seq.as_deref().expect("detached the root");
            (
                node.parent.expect("detached the root"),
                self.sequencer.hash_at(seq, node.start),
            )
        };
        let pnode = self.arena.node_mut(parent);
        let removed = pnode.children.as_mut().and_then(|c| c.remove(hash));
        debug_assert_eq!(removed, Some(id));
        if pnode.children.as_ref().is_some_and(ChildIndex::is_empty) {
            pnode.children = None;
        }
        self.arena.release(id);
        parent
    }

    /// Merges the single child of naked `n` into `n`, extending `n`'s
    /// edge label by the child's window.
    pub(crate) fn absorb_lone_child(&mut self, n: NodeId) {
        let d = {
            let children = self
                .arena
                .node(n)
                .children
                .as_ref()
                .expect("absorb on a childless node");
            debug_assert_eq!(children.len(), 1);
            children.iter().next().expect("absorb on a childless node")
        };
        let donor = self.arena.release(d);
        let node = self.arena.node_mut(n);
        debug_assert!(node.value.is_none());
        node.seq = donor.seq;
        node.end = donor.end;
        node.value = donor.value;
        node.children = donor.children;
        // n.size already equals the donor's subtree size
        self.reparent_children(n);
        tracing::trace!("absorbed lone child");
    }

    /// Points every child of `id` back at `id`.
    fn reparent_children(&mut self, id: NodeId) {
        let kids: SmallVec<[NodeId; 8]> = self
            .arena
            .node(id)
            .children
            .as_ref()
            .map(|c| c.iter().collect())
            .unwrap_or_default();
        for kid in kids {
            self.arena.node_mut(kid).parent = Some(id);
        }
    }

    /// Adds `delta` to the cached size of `from` and every ancestor.
    pub(crate) fn adjust_size_walk(&mut self, from: NodeId, delta: isize) {
        let mut cur = Some(from);
        while let Some(id) = cur {
            let node = self.arena.node_mut(id);
            node.size = (node.size as isize + delta) as usize;
            cur = node.parent;
        }
    }
}
