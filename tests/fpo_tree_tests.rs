//! Integration tests for the compressed itemset tree: merge, prune, byte
//! exchange and filtered output.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use fast_fism::config::MiningConfig;
use fast_fism::fpo::{output_file, FpoTree};
use fast_fism::item_index::{count_item_frequencies, ItemIndex};
use fast_fism::partitioner::WorkPartitioner;
use fast_fism::types::{CodecError, ItemCode, Support};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_tree(rng: &mut StdRng, itemsets: usize, items: ItemCode) -> FpoTree {
    let mut tree = FpoTree::new();
    for _ in 0..itemsets {
        let mut codes: Vec<ItemCode> = (0..rng.random_range(1..=5)).map(|_| rng.random_range(0..items)).collect();
        codes.sort_unstable();
        codes.dedup();
        // every prefix gets a support so merged sums are checkable
        for end in 1..=codes.len() {
            let node_support = rng.random_range(1..20);
            tree.insert(&codes[..end]).support += node_support;
        }
    }
    tree
}

fn as_map(tree: &FpoTree) -> BTreeMap<Vec<ItemCode>, Support> {
    tree.itemsets().into_iter().map(|f| (f.items, f.support)).collect()
}

#[test]
fn test_merge_scenario() {
    let partitioner = WorkPartitioner::new(2);
    let mut a = FpoTree::new();
    a.insert(&[0, 1]);
    let mut b = FpoTree::new();
    b.insert(&[0, 2]);

    a.merge(b, &partitioner).unwrap();
    let root = a.root();
    assert_eq!(root.children().len(), 1);
    assert_eq!(root.children()[0].item, 0);
    let grandchildren: Vec<ItemCode> = root.children()[0].children().iter().map(|n| n.item).collect();
    assert_eq!(grandchildren, vec![1, 2]);

    let counts = a.count_nodes(&partitioner).unwrap();
    assert_eq!(counts.total, 3);
    assert_eq!(counts.inner, 1);
    assert_eq!(counts.leaves, 2);
}

#[test]
fn test_merge_is_union_with_summed_supports() {
    let mut rng = StdRng::seed_from_u64(1);
    let partitioner = WorkPartitioner::new(4);
    for _ in 0..10 {
        let a = random_tree(&mut rng, 30, 12);
        let b = random_tree(&mut rng, 30, 12);

        let mut expected = as_map(&a);
        for (items, support) in as_map(&b) {
            *expected.entry(items).or_insert(0) += support;
        }

        let mut ab = a.clone();
        ab.merge(b.clone(), &partitioner).unwrap();
        let mut ba = b;
        ba.merge(a, &partitioner).unwrap();

        assert_eq!(as_map(&ab), expected);
        assert_eq!(ab, ba);
    }
}

#[test]
fn test_serialize_roundtrip_random_trees() {
    let mut rng = StdRng::seed_from_u64(2);
    let partitioner = WorkPartitioner::new(2);
    for _ in 0..10 {
        let mut tree = random_tree(&mut rng, 40, 16);
        let counts = tree.count_nodes(&partitioner).unwrap();

        let full = FpoTree::from_bytes(&tree.to_bytes(true).unwrap(), true).unwrap();
        assert_eq!(full.itemsets(), tree.itemsets());
        assert_eq!(full.counts(), counts);

        let codes_only = FpoTree::from_bytes(&tree.to_bytes(false).unwrap(), false).unwrap();
        let shape: Vec<Vec<ItemCode>> = codes_only.itemsets().into_iter().map(|f| f.items).collect();
        let expected: Vec<Vec<ItemCode>> = tree.itemsets().into_iter().map(|f| f.items).collect();
        assert_eq!(shape, expected);
    }
}

#[test]
fn test_serialize_stream_of_trees() {
    // several trees back to back on one stream
    let mut rng = StdRng::seed_from_u64(9);
    let trees: Vec<FpoTree> = (0..3).map(|_| random_tree(&mut rng, 10, 8)).collect();
    let mut stream = Vec::new();
    for tree in &trees {
        tree.serialize(&mut stream, true).unwrap();
    }
    let mut reader = stream.as_slice();
    for tree in &trees {
        let back = FpoTree::deserialize(&mut reader, true).unwrap();
        assert_eq!(back.itemsets(), tree.itemsets());
    }
    assert!(reader.is_empty());
}

#[test]
fn test_prune_removes_exactly_infrequent() {
    let mut rng = StdRng::seed_from_u64(3);
    for threshold in [5, 10, 15] {
        let tree = random_tree(&mut rng, 40, 10);
        let before = as_map(&tree);

        let mut pruned = tree.clone();
        pruned.prune(threshold);
        let expected: BTreeMap<Vec<ItemCode>, Support> = before
            .iter()
            .filter(|(items, _)| (1..=items.len()).all(|end| before[&items[..end].to_vec()] >= threshold))
            .map(|(items, &s)| (items.clone(), s))
            .collect();
        assert_eq!(as_map(&pruned), expected);

        let mut twice = pruned.clone();
        twice.prune(threshold);
        assert_eq!(twice, pruned);
    }
}

#[test]
fn test_support_exchange() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut tree = random_tree(&mut rng, 20, 10);
    let original = as_map(&tree);

    let mut buf = Vec::new();
    tree.write_support_array(&mut buf).unwrap();
    let supports = FpoTree::read_support_array(&mut buf.as_slice()).unwrap();
    tree.accumulate_supports(&supports).unwrap();
    for (items, support) in as_map(&tree) {
        assert_eq!(support, 2 * original[&items]);
    }

    let short = &supports[..supports.len() - 1];
    assert!(matches!(
        tree.accumulate_supports(short),
        Err(CodecError::SupportLengthMismatch { .. })
    ));
}

#[test]
fn test_exchange_merge_prune_write() {
    let freqs = count_item_frequencies("a b c d e\n".as_bytes()).unwrap();
    let index = ItemIndex::from_ordering(&["a", "b", "c", "d", "e"], &freqs);
    let partitioner = WorkPartitioner::new(2);

    let mut left = FpoTree::new();
    left.insert_with_support(&[0], 3);
    left.insert_with_support(&[0, 1], 2);
    left.insert_with_support(&[0, 1, 2], 2);
    let mut right = FpoTree::new();
    right.insert_with_support(&[0], 2);
    right.insert_with_support(&[0, 1], 1);
    right.insert_with_support(&[0, 3], 1);
    right.insert_with_support(&[4], 1);

    let received: Vec<FpoTree> = [left, right]
        .iter()
        .map(|t| FpoTree::from_bytes(&t.to_bytes(true).unwrap(), true).unwrap())
        .collect();
    let mut merged = FpoTree::merge_all(received, &partitioner).unwrap();
    merged.prune(2);
    assert!(merged.get(&[0, 3]).is_none());
    assert!(merged.get(&[4]).is_none());

    let path = std::env::temp_dir().join(format!("fast_fism_fpo_{}", std::process::id()));
    let config = MiningConfig {
        num_threads: Some(4),
        max_writer_threads: 2,
        ..Default::default()
    };
    let written = merged.write_frequent_itemsets(&index, &path, 3, false, &config).unwrap();
    assert_eq!(written, 2);

    let mut lines = Vec::new();
    for worker in 0..2 {
        let file = output_file(&path, worker);
        if Path::new(&file).exists() {
            lines.extend(fs::read_to_string(&file).unwrap().lines().map(str::to_string));
            fs::remove_file(&file).unwrap();
        }
    }
    lines.sort();
    assert_eq!(lines, vec!["a b:3", "a:5"]);
}
