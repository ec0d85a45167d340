//! # Mining Pipeline
//!
//! End-to-end runs built from the local miner and the itemset tree:
//! - [`MiningPipeline::run_path`] / [`MiningPipeline::run_text`]: one source,
//!   one local pass
//! - [`MiningPipeline::run_partitioned`]: several sources mined separately and
//!   combined through itemset-tree exchange, giving the same itemsets as one
//!   pass over the concatenated sources

use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use crate::config::MiningConfig;
use crate::fpo::FpoTree;
use crate::item_index::{absolute_threshold, count_item_frequencies};
use crate::merger::merge_sorted_items;
use crate::mining::LocalMiner;
use crate::types::{FrequentItemset, MiningError, MiningStats, Support};

/// Result of a single-source run
#[derive(Debug, Clone)]
pub struct MiningResult {
    pub itemsets: Vec<FrequentItemset>,
    /// Item names by code
    pub names: Vec<String>,
    pub stats: MiningStats,
}

impl MiningResult {
    /// `"<item names>:<support>"`
    pub fn named_line(&self, itemset: &FrequentItemset) -> String {
        let names: Vec<&str> = itemset
            .items
            .iter()
            .map(|&c| self.names.get(c as usize).map_or("?", String::as_str))
            .collect();
        format!("{}:{}", names.join(" "), itemset.support)
    }

    pub fn write_lines<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        for fi in &self.itemsets {
            writeln!(writer, "{}", fi.to_line())?;
        }
        writer.flush()?;
        Ok(self.itemsets.len())
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Found {} frequent itemsets in {} transactions (threshold {})",
            self.itemsets.len(),
            self.stats.transaction_count,
            self.stats.absolute_threshold
        );
        if let Some(longest) = self.itemsets.iter().map(|f| f.items.len()).max() {
            summary.push_str(&format!("\nLongest itemset: {} items", longest));
        }

        let mut by_support: Vec<&FrequentItemset> = self.itemsets.iter().filter(|f| f.items.len() > 1).collect();
        by_support.sort_by(|a, b| b.support.cmp(&a.support).then_with(|| a.items.cmp(&b.items)));
        for (i, fi) in by_support.iter().take(5).enumerate() {
            summary.push_str(&format!("\n  #{}: {}", i + 1, self.named_line(fi)));
        }
        if by_support.len() > 5 {
            summary.push_str(&format!("\n  ... and {} more", by_support.len() - 5));
        }

        let t = &self.stats.phase_times;
        summary.push_str(&format!(
            "\nTimings (ms): count {}, tree {}, lists {}, matrix {}, pairs {}, expand {}, total {}",
            t.counting_ms, t.tree_building_ms, t.item_lists_ms, t.matrix_ms, t.pair_lists_ms, t.expansion_ms, t.total_ms
        ));
        summary
    }
}

/// Result of a run over several sources
#[derive(Debug, Clone)]
pub struct PartitionedResult {
    pub itemsets: Vec<FrequentItemset>,
    /// Union of the locally frequent items, ascending by name; rank is code
    pub ordering: Vec<String>,
    pub transaction_count: usize,
    pub global_threshold: Support,
    /// Candidate itemsets sent back to every source
    pub candidates: usize,
    /// Bytes of every tree and support array exchanged
    pub exchanged_bytes: usize,
    /// Pruned tree with global supports
    pub tree: FpoTree,
}

/// 挖掘Pipeline
pub struct MiningPipeline {
    config: MiningConfig,
    ordering: Option<Vec<String>>,
}

impl MiningPipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    pub fn run_path(&self, path: &Path) -> Result<MiningResult, MiningError> {
        log::info!("Starting local mining of {}", path.display());
        let miner = LocalMiner::from_path(self.config.clone(), path, self.ordering.as_deref())?;
        self.finish(miner)
    }

    pub fn run_text(&self, text: &str) -> Result<MiningResult, MiningError> {
        let miner = LocalMiner::from_text(self.config.clone(), text, self.ordering.as_deref())?;
        self.finish(miner)
    }

    fn finish(&self, mut miner: LocalMiner) -> Result<MiningResult, MiningError> {
        miner.expand()?;
        let (entries, avg) = miner.occurrence_list_stats();
        log::debug!("occurrence lists: {} entries, {:.2} per item", entries, avg);
        Ok(MiningResult {
            itemsets: miner.frequent_itemsets(),
            names: miner.index().names().to_vec(),
            stats: miner.stats().clone(),
        })
    }

    /// Mine every source on its own and combine the local results.
    ///
    /// 1. Locally frequent items of all sources, merged, fix the item codes
    /// 2. Every source mines locally and ships its itemsets as a code-only tree
    /// 3. The merged tree holds every candidate; a globally frequent itemset
    ///    is locally frequent somewhere
    /// 4. Every source fills in its local support of each candidate and ships
    ///    the support array
    /// 5. Summed supports are pruned at the global threshold
    pub fn run_partitioned<S: AsRef<str>>(&self, sources: &[S]) -> Result<PartitionedResult, MiningError> {
        let start = Instant::now();
        let relative = self.config.relative_threshold;
        let partitioner = self.config.partitioner();
        let mut exchanged_bytes = 0;

        let mut transaction_count = 0;
        let mut local_items = Vec::with_capacity(sources.len());
        for source in sources {
            let freqs = count_item_frequencies(source.as_ref().as_bytes())?;
            let threshold = absolute_threshold(relative, freqs.transaction_count)?;
            transaction_count += freqs.transaction_count;
            local_items.push(freqs.frequent_items_by_name(threshold));
        }
        let ordering = merge_sorted_items(local_items);
        let global_threshold = absolute_threshold(relative, transaction_count)?;
        log::info!(
            "Round 1: {} sources, {} transactions, {} candidate items, global threshold {}",
            sources.len(),
            transaction_count,
            ordering.len(),
            global_threshold
        );

        let mut miners = Vec::with_capacity(sources.len());
        let mut local_trees = Vec::with_capacity(sources.len());
        for source in sources {
            let mut miner = LocalMiner::from_text(self.config.clone(), source.as_ref(), Some(&ordering[..]))?;
            miner.expand()?;
            let tree = local_tree(&miner)?;
            if !tree.is_empty() {
                let bytes = tree.to_bytes(false)?;
                exchanged_bytes += bytes.len();
                local_trees.push(FpoTree::from_bytes(&bytes, false)?);
            }
            miners.push(miner);
        }

        let mut candidates = FpoTree::merge_all(local_trees, &partitioner)?;
        let counts = candidates.count_nodes(&partitioner)?;
        log::info!(
            "Round 2: {} candidate itemsets ({} inner, {} leaves)",
            counts.total,
            counts.inner,
            counts.leaves
        );

        if !candidates.is_empty() {
            let bytes = candidates.to_bytes(false)?;
            for miner in &miners {
                exchanged_bytes += bytes.len();
                let mut local = FpoTree::from_bytes(&bytes, false)?;
                local.update_supports(miner)?;
                let mut buf = Vec::new();
                local.write_support_array(&mut buf)?;
                exchanged_bytes += buf.len();
                let supports = FpoTree::read_support_array(&mut buf.as_slice())?;
                candidates.accumulate_supports(&supports)?;
            }
        }
        candidates.prune(global_threshold);

        let mut itemsets = candidates.itemsets();
        itemsets.sort();
        log::info!(
            "Round 3: {} global frequent itemsets, {} bytes exchanged, {}ms",
            itemsets.len(),
            exchanged_bytes,
            start.elapsed().as_millis()
        );

        Ok(PartitionedResult {
            itemsets,
            ordering,
            transaction_count,
            global_threshold,
            candidates: counts.total,
            exchanged_bytes,
            tree: candidates,
        })
    }
}

/// Every local frequent itemset of `miner` as a tree with local supports.
pub fn local_tree(miner: &LocalMiner) -> Result<FpoTree, MiningError> {
    let partitioner = miner.partitioner();
    let mut tree = FpoTree::from_frequent_items(miner.index(), miner.threshold());
    let deeper = FpoTree::from_subsets(&miner.frequent_pairs(), miner.subsets(), false, partitioner)?;
    tree.merge(deeper, partitioner)?;
    Ok(tree)
}

/// Pipeline构建器
pub struct PipelineBuilder {
    config: MiningConfig,
    ordering: Option<Vec<String>>,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            config: MiningConfig::default(),
            ordering: None,
        }
    }

    pub fn with_config(mut self, config: MiningConfig) -> Self {
        self.config = config;
        self
    }

    pub fn relative_threshold(mut self, threshold: f64) -> Self {
        self.config.relative_threshold = threshold;
        self
    }

    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = Some(threads);
        self
    }

    pub fn max_writer_threads(mut self, writers: usize) -> Self {
        self.config.max_writer_threads = writers;
        self
    }

    /// Global item ordering; rank is the item code
    pub fn ordering(mut self, names: Vec<String>) -> Self {
        self.ordering = Some(names);
        self
    }

    pub fn build(self) -> Result<MiningPipeline, MiningError> {
        self.config.validate()?;
        Ok(MiningPipeline {
            config: self.config,
            ordering: self.ordering,
        })
    }
}
