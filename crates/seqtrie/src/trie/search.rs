//! The search engine.
//!
//! One routine drives every read API. Descent consumes the query against
//! edge windows, counting agreement with the sequencer's `matches`; the
//! four match modes differ only in which terminal situations they accept:
//!
//! * the query ends exactly at a node boundary - accepted by every mode
//!   (`Exact` additionally demands a verified value),
//! * the query ends in agreement strictly inside an edge - accepted by
//!   every mode except `Exact`,
//! * the query overruns the structure after fully matching a node -
//!   accepted only by `Partial`, which yields that deepest node,
//! * the query diverges strictly inside an edge - a miss for every mode.

use super::node::NodeId;
use super::SeqTrie;
use crate::sequencer::Sequencer;

/// How a query is matched against stored keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// The query must equal a stored key verbatim.
    Exact,
    /// The query must be a prefix of at least one stored key.
    #[default]
    StartsWith,
    /// Like `StartsWith`, and additionally accepts a query that runs past
    /// the structure, yielding the deepest fully-matched node.
    Partial,
    /// Same acceptance as `StartsWith`; the mode used to root subtree
    /// views.
    Subtree,
}

impl<Z: Sequencer, V> SeqTrie<Z, V> {
    /// Resolves `key` to a node, scoped to the subtree under `from`.
    ///
    /// `key` is always the full key as seen from the trie root, even when
    /// `from` is an interior node: the view root's own prefix is verified
    /// first and descent continues past it.
    pub(crate) fn search_from(
        &self,
        from: NodeId,
        key: &Z::Seq,
        mode: MatchMode,
    ) -> Option<NodeId> {
        let len = self.sequencer.length(key);
        if len == 0 {
            return None;
        }
        let origin = self.arena.node(from);
        let mut offset = origin.end;
        if len < offset {
            return None;
        }
        if from != self.root {
            let seq = origin.seq.as_deref()?;
            if self.sequencer.matches(seq, 0, key, 0, offset) < offset {
                return None;
            }
            if len == offset {
                // the query is exactly the view root's own prefix
                return self.accept_at(from, key, len, mode);
            }
        }
        let mut cur = match self.child_of(from, self.sequencer.hash_at(key, offset)) {
            Some(id) => id,
            None => {
                // a verified view root is itself the deepest matched node
                return match mode {
                    MatchMode::Partial if from != self.root => Some(from),
                    _ => None,
                };
            }
        };
        loop {
            let node = self.arena.node(cur);
            let node_len = node.edge_len();
            let cap = node_len.min(len - offset);
            let seq = node.seq.as_deref().expect("non-root node without sequence");
            let m = self.sequencer.matches(seq, node.start, key, offset, cap);
            offset += m;
            if m < cap {
                // diverged strictly inside the edge
                return None;
            }
            if cap < node_len {
                // query exhausted inside the edge; the node's keys extend it
                debug_assert_eq!(offset, len);
                return match mode {
                    MatchMode::Exact => None,
                    _ => Some(cur),
                };
            }
            if offset == len {
                return self.accept_at(cur, key, len, mode);
            }
            match self.child_of(cur, self.sequencer.hash_at(key, offset)) {
                Some(next) => cur = next,
                None => {
                    // query continues past everything stored here
                    return match mode {
                        MatchMode::Partial => Some(cur),
                        _ => None,
                    };
                }
            }
        }
    }

    /// Terminal acceptance for a query ending exactly at `id`'s boundary.
    fn accept_at(&self, id: NodeId, key: &Z::Seq, len: usize, mode: MatchMode) -> Option<NodeId> {
        match mode {
            MatchMode::Exact => {
                let node = self.arena.node(id);
                if node.value.is_none() || node.end != len {
                    return None;
                }
                // re-verify the whole key; bucket collisions along the
                // descent degrade to a miss here
                let seq = node.seq.as_deref()?;
                if self.sequencer.matches(seq, 0, key, 0, len) == len {
                    Some(id)
                } else {
                    None
                }
            }
            _ => Some(id),
        }
    }

    #[inline]
    pub(crate) fn child_of(&self, id: NodeId, hash: usize) -> Option<NodeId> {
        self.arena
            .node(id)
            .children
            .as_ref()
            .and_then(|c| c.get(hash))
    }
}
