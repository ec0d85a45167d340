//! # Local Miner
//!
//! One mining pass over one transaction source:
//! 1. Count items and fix the item index and absolute threshold
//! 2. Build the prefix-count tree and its traversal codes
//! 3. Read off per-item occurrence lists
//! 4. Accumulate the co-occurrence matrix in parallel and filter 2-itemsets
//! 5. Build the occurrence list of every frequent 2-itemset in parallel
//! 6. Expand 2-itemsets into k-itemsets in parallel (see [`expand`](LocalMiner::expand))
//!
//! Steps 1-5 run in [`prepare`](LocalMiner::prepare); the tree is dropped as soon
//! as lists and matrix exist.

/**
 * File: /src/mining/miner.rs
 * Created Date: Friday, October 9th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-18		Zihan	Expansion of a selected subset of 2-itemsets
 * 2026-10-14		Zihan	Support lookup for arbitrary itemsets
 * 2026-10-09		Zihan	Created local miner
 */

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::time::Instant;

use crate::config::MiningConfig;
use crate::item_index::{absolute_threshold, count_item_frequencies, ItemFrequencies, ItemIndex};
use crate::matrix::CooccurrenceMatrix;
use crate::mining::expander::{EquivalenceExpander, PairList};
use crate::mining::subsets::FrequentSubset;
use crate::partitioner::WorkPartitioner;
use crate::ppc::{build_item_lists, itemset_support, ListJoin, MergeJoin, Nodelist, PpcTree};
use crate::types::{FrequentItemset, ItemCode, MiningError, MiningStats, Support};

pub struct LocalMiner<J: ListJoin = MergeJoin> {
    config: MiningConfig,
    partitioner: WorkPartitioner,
    join: J,
    frequencies: ItemFrequencies,
    index: ItemIndex,
    threshold: Support,
    item_lists: Vec<Nodelist>,
    matrix: CooccurrenceMatrix,
    /// Frequent 2-itemsets ascending by items
    pairs: Vec<PairList>,
    subsets: BTreeMap<[ItemCode; 2], FrequentSubset>,
    stats: MiningStats,
}

impl LocalMiner<MergeJoin> {
    /// `counting` and `transactions` must yield the same transactions; the
    /// source is read twice. With no `ordering`, the locally frequent items
    /// sorted by name become the index.
    pub fn prepare<R1: BufRead, R2: BufRead>(
        config: MiningConfig,
        counting: R1,
        transactions: R2,
        ordering: Option<&[String]>,
    ) -> Result<Self, MiningError> {
        Self::prepare_with_join(config, MergeJoin, counting, transactions, ordering)
    }

    pub fn from_path(
        config: MiningConfig,
        path: &Path,
        ordering: Option<&[String]>,
    ) -> Result<Self, MiningError> {
        let counting = BufReader::new(File::open(path)?);
        let transactions = BufReader::new(File::open(path)?);
        Self::prepare(config, counting, transactions, ordering)
    }

    pub fn from_text(
        config: MiningConfig,
        text: &str,
        ordering: Option<&[String]>,
    ) -> Result<Self, MiningError> {
        Self::prepare(config, text.as_bytes(), text.as_bytes(), ordering)
    }
}

impl<J: ListJoin> LocalMiner<J> {
    pub fn prepare_with_join<R1: BufRead, R2: BufRead>(
        config: MiningConfig,
        join: J,
        counting: R1,
        transactions: R2,
        ordering: Option<&[String]>,
    ) -> Result<Self, MiningError> {
        config.validate()?;
        let partitioner = config.partitioner();
        let total_start = Instant::now();
        let mut stats = MiningStats::default();

        // Phase 1: item counting
        let start = Instant::now();
        let frequencies = count_item_frequencies(counting)?;
        let threshold = absolute_threshold(config.relative_threshold, frequencies.transaction_count)?;
        let index = match ordering {
            Some(names) => ItemIndex::from_ordering(names, &frequencies),
            None => ItemIndex::from_local_frequencies(&frequencies, threshold),
        };
        stats.transaction_count = frequencies.transaction_count;
        stats.absolute_threshold = threshold;
        stats.frequent_items = index.frequent_codes(threshold).len();
        stats.phase_times.counting_ms = start.elapsed().as_millis() as u64;
        log::info!(
            "Phase 1: {} transactions, {} indexed items ({} frequent), threshold {}",
            stats.transaction_count,
            index.len(),
            stats.frequent_items,
            threshold
        );

        // Phase 2: prefix-count tree
        let start = Instant::now();
        let mut tree = PpcTree::new();
        for line in transactions.lines() {
            let codes = index.encode(&line?);
            tree.insert(&codes);
        }
        tree.assign_traversal_codes();
        stats.tree_nodes = tree.len();
        stats.phase_times.tree_building_ms = start.elapsed().as_millis() as u64;
        log::info!("Phase 2: prefix tree with {} nodes", stats.tree_nodes);

        // Phase 3: per-item occurrence lists
        let start = Instant::now();
        let item_lists = build_item_lists(&tree, index.len());
        stats.item_list_entries = item_lists.iter().map(Nodelist::len).sum();
        stats.phase_times.item_lists_ms = start.elapsed().as_millis() as u64;
        log::info!("Phase 3: {} occurrence entries", stats.item_list_entries);

        // Phase 4: co-occurrence matrix
        let start = Instant::now();
        let matrix = CooccurrenceMatrix::from_tree(&tree, index.len(), &partitioner)?;
        drop(tree);
        let frequent_pairs = matrix.filter_frequent(threshold);
        stats.frequent_2itemsets = frequent_pairs.len();
        stats.phase_times.matrix_ms = start.elapsed().as_millis() as u64;
        log::info!("Phase 4: {} frequent 2-itemsets", stats.frequent_2itemsets);

        // Phase 5: 2-itemset occurrence lists
        let start = Instant::now();
        let pairs = partitioner.run("2-itemset lists", frequent_pairs, |_, fi| {
            let (a, b) = (fi.items[0], fi.items[1]);
            let mut list = join.join(&item_lists[a as usize], &item_lists[b as usize]);
            list.shrink();
            PairList {
                items: [a, b],
                support: fi.support,
                list,
            }
        })?;
        stats.phase_times.pair_lists_ms = start.elapsed().as_millis() as u64;
        stats.phase_times.total_ms = total_start.elapsed().as_millis() as u64;

        let mut miner = Self {
            config,
            partitioner,
            join,
            frequencies,
            index,
            threshold,
            item_lists,
            matrix,
            pairs,
            subsets: BTreeMap::new(),
            stats,
        };
        miner.stats.frequent_itemsets = miner.count_frequent_itemsets();
        Ok(miner)
    }

    /// Expand every frequent 2-itemset.
    pub fn expand(&mut self) -> Result<&MiningStats, MiningError> {
        let all: Vec<[ItemCode; 2]> = self.pairs.iter().map(|p| p.items).collect();
        self.expand_pairs(&all)?;
        Ok(&self.stats)
    }

    /// Expand only the given 2-itemsets. Ones that are not locally frequent
    /// are skipped. Returns the number of k-itemsets (k > 2) found.
    pub fn expand_pairs(&mut self, selected: &[[ItemCode; 2]]) -> Result<usize, MiningError> {
        let start = Instant::now();
        let positions: Vec<usize> = selected
            .iter()
            .filter_map(|items| self.pairs.binary_search_by(|p| p.items.cmp(items)).ok())
            .collect();

        let pairs = &self.pairs;
        let join = &self.join;
        let threshold = self.threshold;
        let subsets = self.partitioner.run("k-itemset expansion", positions, |_, p| {
            let pair = &pairs[p];
            let rest = &pairs[p + 1..];
            let siblings = &rest[..rest.partition_point(|q| q.items[0] == pair.items[0])];
            EquivalenceExpander::new(join, threshold).expand(pair, siblings)
        })?;

        let found: usize = subsets.iter().map(FrequentSubset::len).sum();
        for subset in subsets {
            self.subsets.insert(subset.prefix, subset);
        }

        let elapsed = start.elapsed().as_millis() as u64;
        self.stats.phase_times.expansion_ms += elapsed;
        self.stats.phase_times.total_ms += elapsed;
        self.stats.frequent_itemsets = self.count_frequent_itemsets();
        log::info!(
            "Phase 6: {} k-itemsets from {} 2-itemsets in {}ms",
            found,
            selected.len(),
            elapsed
        );
        Ok(found)
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    pub fn partitioner(&self) -> &WorkPartitioner {
        &self.partitioner
    }

    pub fn join(&self) -> &J {
        &self.join
    }

    pub fn index(&self) -> &ItemIndex {
        &self.index
    }

    pub fn frequencies(&self) -> &ItemFrequencies {
        &self.frequencies
    }

    pub fn threshold(&self) -> Support {
        self.threshold
    }

    pub fn item_lists(&self) -> &[Nodelist] {
        &self.item_lists
    }

    pub fn matrix(&self) -> &CooccurrenceMatrix {
        &self.matrix
    }

    pub fn pair_lists(&self) -> &[PairList] {
        &self.pairs
    }

    pub fn frequent_pairs(&self) -> Vec<FrequentItemset> {
        self.pairs
            .iter()
            .map(|p| FrequentItemset::new(p.items.to_vec(), p.support))
            .collect()
    }

    pub fn subsets(&self) -> &BTreeMap<[ItemCode; 2], FrequentSubset> {
        &self.subsets
    }

    pub fn stats(&self) -> &MiningStats {
        &self.stats
    }

    /// Local support of any itemset, frequent or not.
    pub fn support_of(&self, codes: &[ItemCode]) -> Support {
        let mut codes = codes.to_vec();
        codes.sort_unstable();
        codes.dedup();
        match codes.as_slice() {
            [] => 0,
            [a] => self.index.frequency(*a),
            [a, b] => self.matrix.pair_support(*a, *b),
            [a, b, ..] => self
                .subsets
                .get(&[*a, *b])
                .and_then(|s| s.support_of(&codes))
                .unwrap_or_else(|| itemset_support(&self.join, &self.item_lists, &codes)),
        }
    }

    /// Every local frequent itemset found so far, ascending by items.
    pub fn frequent_itemsets(&self) -> Vec<FrequentItemset> {
        let mut out: Vec<FrequentItemset> = self
            .index
            .frequent_codes(self.threshold)
            .into_iter()
            .map(|c| FrequentItemset::new(vec![c], self.index.frequency(c)))
            .collect();
        out.extend(self.frequent_pairs());
        for subset in self.subsets.values() {
            out.extend(subset.itemsets());
        }
        out.sort();
        out
    }

    /// `"<codes>:<support>"` per line. Returns the number of lines.
    pub fn write_results<W: Write>(&self, writer: &mut W) -> Result<usize, MiningError> {
        let itemsets = self.frequent_itemsets();
        for fi in &itemsets {
            writeln!(writer, "{}", fi.to_line())?;
        }
        writer.flush()?;
        Ok(itemsets.len())
    }

    /// (total entries, average entries per non-empty list)
    pub fn occurrence_list_stats(&self) -> (usize, f64) {
        let non_empty = self.item_lists.iter().filter(|l| !l.is_empty()).count();
        let total: usize = self.item_lists.iter().map(Nodelist::len).sum();
        let avg = if non_empty == 0 {
            0.0
        } else {
            total as f64 / non_empty as f64
        };
        (total, avg)
    }

    fn count_frequent_itemsets(&self) -> usize {
        self.index.frequent_codes(self.threshold).len()
            + self.pairs.len()
            + self.subsets.values().map(FrequentSubset::len).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "a b c\na b\nb c d\n";

    fn scenario_order() -> Vec<String> {
        ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect()
    }

    fn config(threshold: f64) -> MiningConfig {
        MiningConfig {
            relative_threshold: threshold,
            num_threads: Some(2),
            ..Default::default()
        }
    }

    #[test]
    fn test_scenario_with_global_order() {
        // 0.7 * 3 transactions floors to an absolute threshold of 2
        let order = scenario_order();
        let mut miner = LocalMiner::from_text(config(0.7), SCENARIO, Some(order.as_slice())).unwrap();
        assert_eq!(miner.threshold(), 2);
        assert_eq!(miner.index().frequencies(), &[2, 3, 2, 1]);

        let matrix = miner.matrix();
        assert_eq!(matrix[(0, 1)], 2);
        assert_eq!(matrix[(0, 2)], 1);
        assert_eq!(matrix[(1, 2)], 2);
        assert_eq!(matrix[(1, 3)], 1);
        assert_eq!(matrix[(2, 3)], 1);

        miner.expand().unwrap();
        let lines: Vec<String> = miner.frequent_itemsets().iter().map(|f| f.to_line()).collect();
        assert_eq!(lines, vec!["0:2", "0 1:2", "1:3", "1 2:2", "2:2"]);
        assert_eq!(miner.support_of(&[0, 1, 2]), 1);
        assert_eq!(miner.support_of(&[3]), 1);
        assert_eq!(miner.stats().frequent_itemsets, 5);
    }

    #[test]
    fn test_local_order_by_name() {
        let text = "y x\nx z\nx y\n";
        let mut miner = LocalMiner::from_text(config(0.5), text, None).unwrap();
        miner.expand().unwrap();
        // threshold 1; items named x y z get codes 0 1 2
        assert_eq!(miner.index().names(), &["x", "y", "z"]);
        assert_eq!(miner.support_of(&[0, 1]), 2);
        assert_eq!(miner.support_of(&[1, 2]), 0);
    }

    #[test]
    fn test_expand_selected_pairs_only() {
        let text = "a b c\na b c\na b c\nb c\n";
        let order = scenario_order();
        let mut miner = LocalMiner::from_text(config(0.5), text, Some(order.as_slice())).unwrap();
        assert_eq!(miner.expand_pairs(&[[1, 2], [0, 3]]).unwrap(), 0);
        assert!(miner.subsets().contains_key(&[1, 2]));
        assert!(!miner.subsets().contains_key(&[0, 1]));
        assert_eq!(miner.expand_pairs(&[[0, 1]]).unwrap(), 1);
        assert_eq!(miner.subsets()[&[0, 1]].get(&[2]), Some(3));
    }

    #[test]
    fn test_write_results() {
        let order = scenario_order();
        let mut miner = LocalMiner::from_text(config(0.7), SCENARIO, Some(order.as_slice())).unwrap();
        miner.expand().unwrap();
        let mut buf: Vec<u8> = Vec::new();
        let written = miner.write_results(&mut buf).unwrap();
        assert_eq!(written, 5);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("1 2:2\n"));
    }

    #[test]
    fn test_occurrence_list_stats() {
        let order = scenario_order();
        let miner = LocalMiner::from_text(config(0.7), SCENARIO, Some(order.as_slice())).unwrap();
        let (total, avg) = miner.occurrence_list_stats();
        assert_eq!(total, miner.stats().item_list_entries);
        assert!(avg >= 1.0);
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(matches!(
            LocalMiner::from_text(config(1.2), SCENARIO, None),
            Err(MiningError::InvalidThreshold(_))
        ));
    }
}
