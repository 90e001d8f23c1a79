//! Structural self-check.
//!
//! Every public mutation leaves the trie satisfying a set of structural
//! invariants (edge labels non-empty, branch degrees >= 2, cached sizes
//! consistent, child buckets matching first elements, valued nodes
//! spanning their full keys). None of them can fail through the public
//! API; [`SeqTrie::validate`] exists so tests and debug builds can prove
//! it after arbitrary operation sequences.

use thiserror::Error;

use super::SeqTrie;
use crate::sequencer::Sequencer;

/// A violated structural invariant, reported by [`SeqTrie::validate`].
///
/// Seeing one of these outside a deliberately corrupted test fixture
/// means a bug in the trie, not in the caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvariantError {
    #[error("root node carries a window, value, or parent link")]
    MalformedRoot,

    #[error("node {index} has an empty edge label")]
    EmptyEdge { index: usize },

    #[error("node {index} has no sequence handle")]
    MissingSequence { index: usize },

    #[error("node {index} caches subtree size {cached} but its subtree holds {actual}")]
    SizeMismatch {
        index: usize,
        cached: usize,
        actual: usize,
    },

    #[error("child of node {index} sits in bucket {bucket} but its first element hashes to {actual}")]
    BucketMismatch {
        index: usize,
        bucket: usize,
        actual: usize,
    },

    #[error("naked branch {index} has {count} children")]
    UnderfullBranch { index: usize, count: usize },

    #[error("valued node {index} does not span its full key")]
    KeyMismatch { index: usize },

    #[error("node {index} disagrees with its parent about their link")]
    BrokenLink { index: usize },

    #[error("node {index} window does not continue its parent's path")]
    WindowMismatch { index: usize },
}

impl<Z: Sequencer, V> SeqTrie<Z, V> {
    /// Walks the whole structure and checks every invariant, returning
    /// the first violation found.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let root = self.arena.node(self.root);
        if root.start != 0 || root.end != 0 || root.value.is_some() || root.parent.is_some() {
            return Err(InvariantError::MalformedRoot);
        }

        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.arena.node(id);
            let index = id.index();

            if id != self.root {
                if node.end <= node.start {
                    return Err(InvariantError::EmptyEdge { index });
                }
                if node.seq.is_none() {
                    return Err(InvariantError::MissingSequence { index });
                }
                if node.is_naked() && node.child_count() < 2 {
                    return Err(InvariantError::UnderfullBranch {
                        index,
                        count: node.child_count(),
                    });
                }
                if let (Some(seq), true) = (node.seq.as_deref(), node.value.is_some()) {
                    // a valued node's sequence is the exact stored key
                    if self.sequencer.length(seq) != node.end {
                        return Err(InvariantError::KeyMismatch { index });
                    }
                }
            }

            let mut child_sum = 0;
            if let Some(children) = node.children.as_ref() {
                for bucket in 0..children.capacity() {
                    let Some(child_id) = children.value_at(bucket) else {
                        continue;
                    };
                    let child = self.arena.node(child_id);
                    if child.parent != Some(id) {
                        return Err(InvariantError::BrokenLink {
                            index: child_id.index(),
                        });
                    }
                    let cseq = child.seq.as_deref().ok_or(InvariantError::MissingSequence {
                        index: child_id.index(),
                    })?;
                    let actual = self.sequencer.hash_at(cseq, child.start);
                    if actual != bucket {
                        return Err(InvariantError::BucketMismatch {
                            index,
                            bucket,
                            actual,
                        });
                    }
                    // the child's window picks up where this node's path
                    // ends, and the two sequences agree over that path
                    if child.start != node.end {
                        return Err(InvariantError::WindowMismatch {
                            index: child_id.index(),
                        });
                    }
                    if let Some(nseq) = node.seq.as_deref() {
                        if self.sequencer.matches(cseq, 0, nseq, 0, node.end) != node.end {
                            return Err(InvariantError::WindowMismatch {
                                index: child_id.index(),
                            });
                        }
                    }
                    child_sum += child.size;
                    stack.push(child_id);
                }
            }

            let own = usize::from(node.value.is_some());
            if node.size != own + child_sum {
                return Err(InvariantError::SizeMismatch {
                    index,
                    cached: node.size,
                    actual: own + child_sum,
                });
            }
        }
        Ok(())
    }
}
