//! Sequencer - the capability that teaches the trie about a sequence type.
//!
//! The trie core never inspects key elements directly. Everything it needs
//! to know about a key - how long it is, which child bucket an element
//! routes to, how far two key windows agree - goes through a [`Sequencer`]
//! supplied at construction. This keeps the core generic over character
//! strings, byte arrays, token lists, or anything else with ordered
//! elements.

/// Measures, hashes, and compares sequences of type [`Sequencer::Seq`].
///
/// # Contract
///
/// * `length` returns the element count of a sequence.
/// * `hash_at` maps one element to a small non-negative bucket number.
///   Equal elements must hash equal. Unequal elements should hash unequal:
///   the dense child index holds one child per bucket, so two diverging
///   keys whose first differing elements collide cannot both be stored,
///   and the later one degrades to a miss. Buckets should also be densely
///   packed across the elements that actually occur - the child index is
///   sized by the largest bucket seen among siblings.
/// * `matches` is the sole equality primitive the core trusts. It returns
///   the length of the longest element-wise equal prefix of `a[a_from..]`
///   and `b[b_from..]`, never exceeding `cap`.
pub trait Sequencer {
    /// The sequence type this sequencer understands.
    type Seq;

    /// Number of elements in `seq`.
    fn length(&self, seq: &Self::Seq) -> usize;

    /// Bucket number of the element at `index`. Callers guarantee
    /// `index < length(seq)`.
    fn hash_at(&self, seq: &Self::Seq, index: usize) -> usize;

    /// Length of the longest common prefix of `a[a_from..]` and
    /// `b[b_from..]`, capped at `cap` elements.
    fn matches(&self, a: &Self::Seq, a_from: usize, b: &Self::Seq, b_from: usize, cap: usize)
        -> usize;
}

/// Sequencer over `String` keys, one UTF-8 byte per element.
///
/// Byte elements keep buckets dense (at most 256 per sibling set) and make
/// `matches` a plain byte comparison. Edge windows may land in the middle
/// of a multi-byte scalar; that is fine because the trie only ever hands
/// out whole stored keys, never edge substrings.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrSequencer;

impl Sequencer for StrSequencer {
    type Seq = String;

    #[inline]
    fn length(&self, seq: &String) -> usize {
        seq.len()
    }

    #[inline]
    fn hash_at(&self, seq: &String, index: usize) -> usize {
        seq.as_bytes()[index] as usize
    }

    fn matches(&self, a: &String, a_from: usize, b: &String, b_from: usize, cap: usize) -> usize {
        common_prefix(&a.as_bytes()[a_from..], &b.as_bytes()[b_from..], cap)
    }
}

/// Sequencer over raw byte keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct BytesSequencer;

impl Sequencer for BytesSequencer {
    type Seq = Vec<u8>;

    #[inline]
    fn length(&self, seq: &Vec<u8>) -> usize {
        seq.len()
    }

    #[inline]
    fn hash_at(&self, seq: &Vec<u8>, index: usize) -> usize {
        seq[index] as usize
    }

    fn matches(&self, a: &Vec<u8>, a_from: usize, b: &Vec<u8>, b_from: usize, cap: usize) -> usize {
        common_prefix(&a[a_from..], &b[b_from..], cap)
    }
}

/// Sequencer over `u32` token lists (vocabulary ids, code points, ...).
///
/// Buckets are the token values themselves, so the child index of a node
/// grows to the largest token that branches there. Suited to compact
/// vocabularies; for sparse 32-bit ids, supply a custom sequencer that
/// remaps to a dense range.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokenSequencer;

impl Sequencer for TokenSequencer {
    type Seq = Vec<u32>;

    #[inline]
    fn length(&self, seq: &Vec<u32>) -> usize {
        seq.len()
    }

    #[inline]
    fn hash_at(&self, seq: &Vec<u32>, index: usize) -> usize {
        seq[index] as usize
    }

    fn matches(&self, a: &Vec<u32>, a_from: usize, b: &Vec<u32>, b_from: usize, cap: usize) -> usize {
        a[a_from..]
            .iter()
            .zip(&b[b_from..])
            .take(cap)
            .take_while(|(x, y)| x == y)
            .count()
    }
}

fn common_prefix(a: &[u8], b: &[u8], cap: usize) -> usize {
    a.iter()
        .zip(b)
        .take(cap)
        .take_while(|(x, y)| x == y)
        .count()
}
