//! Unit tests for the trie core.
//!
//! These exercise structural behavior an outside caller cannot see
//! directly - node counts, branch shapes, cached sizes - alongside the
//! public operations that produce them.

use crate::sequencer::{BytesSequencer, Sequencer, StrSequencer};
use crate::trie::search::MatchMode;
use crate::trie::SeqTrie;

fn strie() -> SeqTrie<StrSequencer, i32> {
    SeqTrie::new(StrSequencer)
}

fn s(text: &str) -> String {
    text.to_string()
}

// ==================== insertion ====================

#[test]
fn put_into_empty() {
    let mut trie = strie();
    assert_eq!(trie.put(s("hello"), 1), None);
    assert_eq!(trie.len(), 1);
    assert_eq!(trie.get_with(&s("hello"), MatchMode::Exact), Some(&1));
    // root plus one leaf
    assert_eq!(trie.arena.live_count(), 2);
    trie.validate().unwrap();
}

#[test]
fn put_empty_key_is_noop() {
    let mut trie = strie();
    assert_eq!(trie.put(s(""), 1), None);
    assert_eq!(trie.len(), 0);
    assert!(trie.is_empty());
}

#[test]
fn divergence_splits_into_naked_branch() {
    let mut trie = strie();
    trie.put(s("hello"), 1);
    trie.put(s("help"), 2);

    assert_eq!(trie.len(), 2);
    assert_eq!(trie.get_with(&s("hello"), MatchMode::Exact), Some(&1));
    assert_eq!(trie.get_with(&s("help"), MatchMode::Exact), Some(&2));
    // root, naked "hel", leaves "lo" and "p"
    assert_eq!(trie.arena.live_count(), 4);

    let branch = trie
        .nodes_all()
        .find(|n| !n.has_value())
        .expect("naked branch after divergence");
    assert_eq!(branch.edge_len(), 3);
    assert_eq!(branch.child_count(), 2);
    assert_eq!(branch.subtree_len(), 2);
    trie.validate().unwrap();
}

#[test]
fn interior_key_splits_with_value() {
    let mut trie = strie();
    trie.put(s("hello"), 1);
    trie.put(s("hell"), 2);

    assert_eq!(trie.len(), 2);
    assert_eq!(trie.get_with(&s("hell"), MatchMode::Exact), Some(&2));
    assert_eq!(trie.get_with(&s("hello"), MatchMode::Exact), Some(&1));
    // root, valued "hell", leaf "o" - no naked node appears
    assert_eq!(trie.arena.live_count(), 3);
    assert!(trie.nodes_all().all(|n| n.has_value()));
    trie.validate().unwrap();
}

#[test]
fn overwrite_returns_prior_and_keeps_size() {
    let mut trie = strie();
    assert_eq!(trie.put(s("key"), 1), None);
    assert_eq!(trie.put(s("key"), 2), Some(1));
    assert_eq!(trie.len(), 1);
    assert_eq!(trie.get_with(&s("key"), MatchMode::Exact), Some(&2));
    trie.validate().unwrap();
}

#[test]
fn valuing_a_naked_branch_counts_it() {
    let mut trie = strie();
    trie.put(s("hello"), 1);
    trie.put(s("help"), 2);
    // "hel" exists as a naked branch; storing under it has no prior
    assert_eq!(trie.put(s("hel"), 3), None);
    assert_eq!(trie.len(), 3);
    assert_eq!(trie.get_with(&s("hel"), MatchMode::Exact), Some(&3));
    trie.validate().unwrap();
}

// ==================== removal ====================

#[test]
fn removing_a_leaf_compacts_the_parent() {
    let mut trie = strie();
    trie.put(s("hello"), 1);
    trie.put(s("help"), 2);

    assert_eq!(trie.remove(&s("hello")), Some(1));
    assert_eq!(trie.len(), 1);
    assert_eq!(trie.get_with(&s("help"), MatchMode::Exact), Some(&2));
    // the naked "hel" absorbed its survivor: root plus one "help" leaf
    assert_eq!(trie.arena.live_count(), 2);
    let leaf = trie.nodes_all().next().expect("surviving leaf");
    assert_eq!(leaf.edge_len(), 4);
    assert!(leaf.has_value());
    trie.validate().unwrap();
}

#[test]
fn removing_an_interior_value_absorbs_the_child() {
    let mut trie = strie();
    trie.put(s("hello"), 1);
    trie.put(s("hell"), 2);

    assert_eq!(trie.remove(&s("hell")), Some(2));
    assert_eq!(trie.len(), 1);
    assert_eq!(trie.get_with(&s("hello"), MatchMode::Exact), Some(&1));
    assert_eq!(trie.arena.live_count(), 2);
    trie.validate().unwrap();
}

#[test]
fn removing_a_branch_value_keeps_the_branch() {
    let mut trie = strie();
    trie.put(s("hel"), 3);
    trie.put(s("hello"), 1);
    trie.put(s("help"), 2);

    assert_eq!(trie.remove(&s("hel")), Some(3));
    assert_eq!(trie.len(), 2);
    let branch = trie
        .nodes_all()
        .find(|n| !n.has_value())
        .expect("branch survives naked");
    assert_eq!(branch.child_count(), 2);
    trie.validate().unwrap();
}

#[test]
fn remove_misses_are_noops() {
    let mut trie = strie();
    trie.put(s("hello"), 1);
    assert_eq!(trie.remove(&s("hell")), None);
    assert_eq!(trie.remove(&s("hellos")), None);
    assert_eq!(trie.remove(&s("")), None);
    assert_eq!(trie.len(), 1);
    trie.validate().unwrap();
}

#[test]
fn clear_drops_everything() {
    let mut trie = strie();
    trie.put(s("a"), 1);
    trie.put(s("b"), 2);
    trie.clear();
    assert!(trie.is_empty());
    assert_eq!(trie.arena.live_count(), 1);
    assert_eq!(trie.get_with(&s("a"), MatchMode::Exact), None);
    trie.validate().unwrap();
}

// ==================== search modes ====================

#[test]
fn exact_requires_a_verbatim_key() {
    let mut trie = strie();
    trie.put(s("hammer"), 1);
    assert!(trie.has_with(&s("hammer"), MatchMode::Exact));
    assert!(!trie.has_with(&s("ham"), MatchMode::Exact));
    assert!(!trie.has_with(&s("hammers"), MatchMode::Exact));
}

#[test]
fn starts_with_accepts_stored_key_extensions_only() {
    let mut trie = strie();
    trie.put(s("hammer"), 1);
    // query is a prefix of a stored key: hit, even inside the edge
    assert!(trie.has_with(&s("ham"), MatchMode::StartsWith));
    assert!(trie.has_with(&s("hammer"), MatchMode::StartsWith));
    // query extends past every stored key: miss
    assert!(!trie.has_with(&s("hammers"), MatchMode::StartsWith));
    // divergence inside the edge: miss
    assert!(!trie.has_with(&s("hat"), MatchMode::StartsWith));
}

#[test]
fn partial_adds_the_deepest_node_fallback() {
    let mut trie = strie();
    trie.put(s("hammer"), 1);
    assert!(trie.has_with(&s("hammers"), MatchMode::Partial));
    assert!(trie.has_with(&s("ham"), MatchMode::Partial));
    // divergence inside the edge still misses
    assert!(!trie.has_with(&s("hat"), MatchMode::Partial));
    // the fallback only fires after a fully matched node
    assert!(!trie.has_with(&s("x"), MatchMode::Partial));
}

#[test]
fn partial_get_yields_the_deepest_value() {
    let mut trie = strie();
    trie.put(s("ham"), 1);
    trie.put(s("hammer"), 2);
    // "hammerhead" overruns "hammer"; Partial lands on that node
    assert_eq!(trie.get_with(&s("hammerhead"), MatchMode::Partial), Some(&2));
    assert_eq!(trie.get_with(&s("hammerhead"), MatchMode::StartsWith), None);
}

#[test]
fn subtree_mode_matches_starts_with() {
    let mut trie = strie();
    trie.put(s("hammer"), 1);
    for q in ["ham", "hammer"] {
        assert_eq!(
            trie.has_with(&s(q), MatchMode::Subtree),
            trie.has_with(&s(q), MatchMode::StartsWith),
        );
    }
    assert!(!trie.has_with(&s("hammers"), MatchMode::Subtree));
}

#[test]
fn empty_query_misses_every_mode() {
    let mut trie = strie();
    trie.put(s("a"), 1);
    for mode in [
        MatchMode::Exact,
        MatchMode::StartsWith,
        MatchMode::Partial,
        MatchMode::Subtree,
    ] {
        assert!(!trie.has_with(&s(""), mode));
    }
}

#[test]
fn default_mode_is_starts_with_and_mutable() {
    let mut trie = strie();
    trie.put(s("hello"), 1);
    assert_eq!(trie.default_mode(), MatchMode::StartsWith);
    assert_eq!(trie.get(&s("he")), Some(&1));

    trie.set_default_mode(MatchMode::Exact);
    assert_eq!(trie.get(&s("he")), None);
    assert_eq!(trie.get(&s("hello")), Some(&1));
}

// ==================== views ====================

#[test]
fn subtrie_len_is_the_cached_subtree_size() {
    let mut trie = strie();
    trie.put(s("ham"), 1);
    trie.put(s("hammer"), 2);
    trie.put(s("hamster"), 3);
    trie.put(s("apple"), 4);

    assert_eq!(trie.subtrie(&s("ham")).len(), 3);
    assert_eq!(trie.subtrie(&s("hamm")).len(), 1);
    assert_eq!(trie.subtrie(&s("a")).len(), 1);
    assert_eq!(trie.subtrie(&s("zebra")).len(), 0);
    assert!(trie.subtrie(&s("zebra")).is_empty());
}

#[test]
fn subtrie_lookups_take_full_keys() {
    let mut trie = strie();
    trie.put(s("ham"), 1);
    trie.put(s("hammer"), 2);
    trie.put(s("apple"), 3);

    let view = trie.subtrie(&s("ham"));
    assert_eq!(view.get_with(&s("hammer"), MatchMode::Exact), Some(&2));
    assert_eq!(view.get_with(&s("ham"), MatchMode::Exact), Some(&1));
    // keys outside the subtree do not resolve through the view
    assert!(!view.has_with(&s("apple"), MatchMode::Exact));
}

#[test]
fn subtrie_mut_removal_reaches_the_owner() {
    let mut trie = strie();
    trie.put(s("ham"), 1);
    trie.put(s("hammer"), 2);
    trie.put(s("hamster"), 3);
    trie.put(s("apple"), 4);

    let mut view = trie.subtrie_mut(&s("ham"));
    assert_eq!(view.remove(&s("hammer")), Some(2));
    assert_eq!(view.len(), 2);
    // the same view cannot remove keys outside its subtree
    assert_eq!(view.remove(&s("apple")), None);

    assert_eq!(trie.len(), 3);
    assert_eq!(trie.get_with(&s("hammer"), MatchMode::Exact), None);
    trie.validate().unwrap();
}

#[test]
fn removing_the_view_root_key_empties_the_view() {
    let mut trie = strie();
    trie.put(s("hammer"), 1);

    let mut view = trie.subtrie_mut(&s("hammer"));
    assert_eq!(view.remove(&s("hammer")), Some(1));
    assert_eq!(view.len(), 0);
    assert_eq!(view.remove(&s("hammer")), None);

    assert!(trie.is_empty());
    trie.validate().unwrap();
}

// ==================== iteration ====================

#[test]
fn traversal_follows_bucket_positions() {
    let mut trie: SeqTrie<BytesSequencer, u8> = SeqTrie::new(BytesSequencer);
    // inserted out of order; first bytes route the buckets
    trie.put(vec![9, 1], 0);
    trie.put(vec![3], 1);
    trie.put(vec![200, 7], 2);
    trie.put(vec![3, 5], 3);

    let first_bytes: Vec<u8> = trie.keys().map(|k| k[0]).collect();
    assert_eq!(first_bytes, vec![3, 3, 9, 200]);
}

#[test]
fn keys_and_values_visit_everything_once() {
    let mut trie = strie();
    let entries = [("ham", 1), ("hammer", 2), ("hamster", 3), ("apple", 4)];
    for (k, v) in entries {
        trie.put(s(k), v);
    }

    let mut seen: Vec<(String, i32)> =
        trie.iter().map(|(k, v)| (k.clone(), *v)).collect();
    seen.sort();
    let mut expected: Vec<(String, i32)> =
        entries.iter().map(|(k, v)| (s(k), *v)).collect();
    expected.sort();
    assert_eq!(seen, expected);
    assert_eq!(trie.values().count(), 4);
    assert_eq!(trie.keys().count(), 4);
}

#[test]
fn nodes_all_sees_naked_branches() {
    let mut trie = strie();
    trie.put(s("hello"), 1);
    trie.put(s("help"), 2);

    assert_eq!(trie.nodes().count(), 2);
    assert_eq!(trie.nodes_all().count(), 3);
    assert_eq!(
        trie.nodes_all().filter(|n| !n.has_value()).count(),
        1
    );
    // naked branches expose no key
    assert!(trie
        .nodes_all()
        .filter(|n| !n.has_value())
        .all(|n| n.key().is_none()));
}

#[test]
fn values_mut_writes_through() {
    let mut trie = strie();
    trie.put(s("a"), 1);
    trie.put(s("ab"), 2);
    trie.put(s("b"), 3);

    for v in trie.values_mut() {
        *v *= 10;
    }
    assert_eq!(trie.get_with(&s("ab"), MatchMode::Exact), Some(&20));
    assert_eq!(trie.values().sum::<i32>(), 60);
    trie.validate().unwrap();
}

#[test]
fn deep_chains_iterate_without_a_depth_limit() {
    let mut trie = strie();
    let mut key = String::new();
    for _ in 0..200 {
        key.push('a');
        trie.put(key.clone(), key.len() as i32);
    }
    assert_eq!(trie.len(), 200);
    assert_eq!(trie.keys().count(), 200);
    assert_eq!(trie.subtrie(&s("aaaa")).len(), 197);
    trie.validate().unwrap();
}

// ==================== bucket collisions ====================

/// Sequencer whose buckets all collide; unequal elements are told apart
/// only by `matches`.
struct CollidingSequencer;

impl Sequencer for CollidingSequencer {
    type Seq = Vec<u8>;

    fn length(&self, seq: &Vec<u8>) -> usize {
        seq.len()
    }

    fn hash_at(&self, _seq: &Vec<u8>, _index: usize) -> usize {
        0
    }

    fn matches(&self, a: &Vec<u8>, a_from: usize, b: &Vec<u8>, b_from: usize, cap: usize) -> usize {
        a[a_from..]
            .iter()
            .zip(&b[b_from..])
            .take(cap)
            .take_while(|(x, y)| x == y)
            .count()
    }
}

#[test]
fn colliding_divergence_at_the_branch_bucket_is_not_stored() {
    let mut trie: SeqTrie<CollidingSequencer, i32> = SeqTrie::new(CollidingSequencer);
    assert_eq!(trie.put(vec![1, 2], 1), None);
    // first elements differ but share the bucket: the key degrades to a miss
    assert_eq!(trie.put(vec![9, 9], 2), None);
    assert_eq!(trie.len(), 1);
    assert_eq!(trie.get_with(&vec![9, 9], MatchMode::Exact), None);
    assert_eq!(trie.get_with(&vec![1, 2], MatchMode::Exact), Some(&1));
    trie.validate().unwrap();
}

#[test]
fn colliding_divergence_inside_an_edge_is_not_stored() {
    let mut trie: SeqTrie<CollidingSequencer, i32> = SeqTrie::new(CollidingSequencer);
    trie.put(vec![1, 2, 3], 1);
    // diverges at the second element, whose bucket also collides
    assert_eq!(trie.put(vec![1, 7], 2), None);
    assert_eq!(trie.len(), 1);
    assert_eq!(trie.get_with(&vec![1, 7], MatchMode::Exact), None);
    assert_eq!(trie.get_with(&vec![1, 2, 3], MatchMode::Exact), Some(&1));
    trie.validate().unwrap();
}

#[test]
fn colliding_buckets_still_store_extensions() {
    let mut trie: SeqTrie<CollidingSequencer, i32> = SeqTrie::new(CollidingSequencer);
    trie.put(vec![1, 2], 1);
    // pure extensions and interior keys never need a second sibling bucket
    trie.put(vec![1, 2, 3], 2);
    trie.put(vec![1], 3);
    assert_eq!(trie.len(), 3);
    assert_eq!(trie.get_with(&vec![1], MatchMode::Exact), Some(&3));
    assert_eq!(trie.get_with(&vec![1, 2], MatchMode::Exact), Some(&1));
    assert_eq!(trie.get_with(&vec![1, 2, 3], MatchMode::Exact), Some(&2));
    trie.validate().unwrap();
}

// ==================== validation ====================

#[test]
fn validate_accepts_a_busy_trie() {
    let mut trie = strie();
    for (i, k) in ["romane", "romanus", "romulus", "rubens", "ruber", "rubicon", "rubicundus"]
        .iter()
        .enumerate()
    {
        trie.put(s(k), i as i32);
    }
    trie.validate().unwrap();
}

#[test]
fn validate_detects_a_corrupted_size() {
    let mut trie = strie();
    trie.put(s("hello"), 1);
    let root = trie.root;
    trie.arena.node_mut(root).size += 1;
    assert!(trie.validate().is_err());
}
