//! seqtrie: a generic compact (radix) trie.
//!
//! Maps variable-length sequences to values, storing shared prefixes
//! once. The crate is generic in two dimensions: the key type, described
//! entirely by a [`Sequencer`] supplied at construction, and the value
//! type stored at terminal nodes. On top of the core map operations it
//! offers four match modes sharing one search routine, and prefix-scoped
//! live views with lazy iteration.
//!
//! ```
//! use seqtrie::{MatchMode, StrSequencer, SeqTrie};
//!
//! let mut trie = SeqTrie::new(StrSequencer);
//! trie.put("hammer".to_string(), 1);
//! trie.put("hamster".to_string(), 2);
//!
//! assert_eq!(trie.get_with(&"hammer".to_string(), MatchMode::Exact), Some(&1));
//! assert!(trie.has(&"ham".to_string())); // default mode: StartsWith
//! assert_eq!(trie.subtrie(&"ham".to_string()).len(), 2);
//! ```
//!
//! Single-writer: the structure has no internal synchronization, and the
//! borrow checker keeps mutation and live iterators apart.

pub mod sequencer;
pub mod trie;

pub use crate::sequencer::{BytesSequencer, Sequencer, StrSequencer, TokenSequencer};
pub use crate::trie::iter::{Iter, IterMut, Keys, NodeRef, Nodes, Values, ValuesMut};
pub use crate::trie::search::MatchMode;
pub use crate::trie::validate::InvariantError;
pub use crate::trie::view::{SubTrie, SubTrieMut};
pub use crate::trie::SeqTrie;

/// Radix trie over UTF-8 string keys.
pub type StrTrie<V> = SeqTrie<StrSequencer, V>;

/// Radix trie over raw byte keys.
pub type BytesTrie<V> = SeqTrie<BytesSequencer, V>;
