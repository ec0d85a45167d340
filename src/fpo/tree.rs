/**
 * File: /src/fpo/tree.rs
 * Created Date: Saturday, October 10th 2026
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 17th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Explicit stacks for prune and traversals
 * 2026-10-10		Zihan	Created itemset tree
 */

use std::collections::{BTreeMap, VecDeque};
use std::fmt::Write as _;

use crate::item_index::ItemIndex;
use crate::mining::FrequentSubset;
use crate::partitioner::WorkPartitioner;
use crate::types::{FrequentItemset, ItemCode, MiningError, Support, WorkError};

/// Itemset tree node. Children ascending by `item`; a leaf has no children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FpoNode {
    pub item: ItemCode,
    pub support: Support,
    pub(crate) children: Vec<FpoNode>,
}

impl FpoNode {
    pub fn new(item: ItemCode, support: Support) -> Self {
        Self {
            item,
            support,
            children: Vec::new(),
        }
    }

    pub fn children(&self) -> &[FpoNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, item: ItemCode) -> Option<&FpoNode> {
        self.children
            .binary_search_by(|c| c.item.cmp(&item))
            .ok()
            .map(|pos| &self.children[pos])
    }

    /// Walk `codes` (ascending) below this node, creating missing nodes with
    /// support 0. Returns the last node of the path.
    pub fn insert_path(&mut self, codes: &[ItemCode]) -> &mut FpoNode {
        let mut node = self;
        for &code in codes {
            let pos = match node.children.binary_search_by(|c| c.item.cmp(&code)) {
                Ok(pos) => pos,
                Err(pos) => {
                    node.children.insert(pos, FpoNode::new(code, 0));
                    pos
                }
            };
            node = &mut node.children[pos];
        }
        node
    }

    /// (descendants, inner descendants)
    fn subtree_counts(&self) -> (usize, usize) {
        let mut total = 0;
        let mut inner = 0;
        let mut stack: Vec<&FpoNode> = self.children.iter().collect();
        while let Some(node) = stack.pop() {
            total += 1;
            if !node.is_leaf() {
                inner += 1;
                stack.extend(node.children.iter());
            }
        }
        (total, inner)
    }
}

/// Node tallies, root excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeCounts {
    pub total: usize,
    pub inner: usize,
    pub leaves: usize,
}

/// Compressed itemset tree. The root carries no item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FpoTree {
    pub(crate) root: FpoNode,
    counts: TreeCounts,
}

impl FpoTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_root(root: FpoNode, counts: TreeCounts) -> Self {
        Self { root, counts }
    }

    pub fn root(&self) -> &FpoNode {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_leaf()
    }

    /// Insert an ascending itemset; returns its node.
    pub fn insert(&mut self, codes: &[ItemCode]) -> &mut FpoNode {
        self.root.insert_path(codes)
    }

    pub fn insert_with_support(&mut self, codes: &[ItemCode], support: Support) {
        self.insert(codes).support = support;
    }

    pub fn get(&self, codes: &[ItemCode]) -> Option<&FpoNode> {
        let mut node = &self.root;
        for &code in codes {
            node = node.child(code)?;
        }
        Some(node)
    }

    /// Tallies from the last [`count_nodes`](Self::count_nodes). Not kept in
    /// sync by insert, merge or prune.
    pub fn counts(&self) -> TreeCounts {
        self.counts
    }

    /// Recount total/inner/leaf nodes, one unit per inner level-1 node.
    pub fn count_nodes(&mut self, partitioner: &WorkPartitioner) -> Result<TreeCounts, WorkError> {
        let inner_l1: Vec<&FpoNode> = self.root.children.iter().filter(|n| !n.is_leaf()).collect();
        let l1_inner = inner_l1.len();
        let per_subtree = partitioner.run("count nodes", inner_l1, |_, node| node.subtree_counts())?;

        let total = self.root.children.len() + per_subtree.iter().map(|c| c.0).sum::<usize>();
        let inner = l1_inner + per_subtree.iter().map(|c| c.1).sum::<usize>();
        self.counts = TreeCounts {
            total,
            inner,
            leaves: total - inner,
        };
        Ok(self.counts)
    }

    /// Drop every node with support below `threshold`, subtrees included.
    pub fn prune(&mut self, threshold: Support) {
        let mut stack: Vec<&mut FpoNode> = vec![&mut self.root];
        while let Some(node) = stack.pop() {
            node.children.retain(|c| c.support >= threshold);
            if node.children.is_empty() {
                node.children = Vec::new();
                continue;
            }
            stack.extend(node.children.iter_mut().filter(|c| !c.is_leaf()));
        }
    }

    /// Level-2 itemsets dealt round-robin into `parts` lists.
    pub fn two_itemsets(&self, parts: usize) -> Vec<Vec<[ItemCode; 2]>> {
        let parts = parts.max(1);
        let mut out: Vec<Vec<[ItemCode; 2]>> = vec![Vec::new(); parts];
        let level2 = self
            .root
            .children
            .iter()
            .flat_map(|l1| l1.children.iter().map(move |l2| [l1.item, l2.item]));
        for (i, pair) in level2.enumerate() {
            out[i % parts].push(pair);
        }
        out
    }

    /// Every node as (path, support), pre-order.
    pub fn itemsets(&self) -> Vec<FrequentItemset> {
        let mut out = Vec::new();
        let mut stack: Vec<(&FpoNode, Vec<ItemCode>)> = self
            .root
            .children
            .iter()
            .rev()
            .map(|n| (n, vec![n.item]))
            .collect();
        while let Some((node, path)) = stack.pop() {
            for child in node.children.iter().rev() {
                let mut child_path = path.clone();
                child_path.push(child.item);
                stack.push((child, child_path));
            }
            out.push(FrequentItemset::new(path, node.support));
        }
        out
    }

    /// Nodes below the root in level order.
    pub fn level_order(&self) -> Vec<&FpoNode> {
        let mut out = Vec::new();
        let mut queue: VecDeque<&FpoNode> = self.root.children.iter().collect();
        while let Some(node) = queue.pop_front() {
            queue.extend(node.children.iter());
            out.push(node);
        }
        out
    }

    /// Supports of the nodes below the root, in level order.
    pub(crate) fn supports_level_order_mut(&mut self) -> Vec<&mut Support> {
        let mut out = Vec::new();
        let mut queue: VecDeque<&mut FpoNode> = self.root.children.iter_mut().collect();
        while let Some(node) = queue.pop_front() {
            let FpoNode {
                support, children, ..
            } = node;
            out.push(support);
            queue.extend(children.iter_mut());
        }
        out
    }

    /// Level-1 tree of the items with local frequency at least `threshold`.
    pub fn from_frequent_items(index: &ItemIndex, threshold: Support) -> Self {
        let mut tree = FpoTree::new();
        tree.root.children = index
            .frequent_codes(threshold)
            .into_iter()
            .map(|c| FpoNode::new(c, index.frequency(c)))
            .collect();
        tree
    }

    /// Insert all 2-itemsets, then (unless `just_two_itemsets`) every
    /// subset's k-itemsets below their 2-itemset node, one unit per subset.
    pub fn from_subsets(
        pairs: &[FrequentItemset],
        subsets: &BTreeMap<[ItemCode; 2], FrequentSubset>,
        just_two_itemsets: bool,
        partitioner: &WorkPartitioner,
    ) -> Result<Self, WorkError> {
        let mut tree = FpoTree::new();
        for pair in pairs {
            tree.insert_with_support(&pair.items, pair.support);
        }
        if just_two_itemsets {
            return Ok(tree);
        }

        let units: Vec<(&mut FpoNode, &FrequentSubset)> = tree
            .root
            .children
            .iter_mut()
            .flat_map(|l1| {
                let first = l1.item;
                l1.children.iter_mut().map(move |l2| (first, l2))
            })
            .filter_map(|(first, l2)| subsets.get(&[first, l2.item]).map(|s| (l2, s)))
            .collect();

        partitioner.run("build from k-itemsets", units, |_, (node, subset)| {
            for (suffix, &support) in subset.suffixes() {
                node.insert_path(suffix).support = support;
            }
        })?;
        Ok(tree)
    }

    /// Indented dump, one node per line.
    pub fn render(&self, index: &ItemIndex) -> Result<String, MiningError> {
        let mut out = String::new();
        let mut stack: Vec<(&FpoNode, usize)> = self.root.children.iter().rev().map(|n| (n, 0)).collect();
        while let Some((node, depth)) = stack.pop() {
            let name = index.render(&[node.item])?;
            let _ = writeln!(out, "{}{}:{}", "  ".repeat(depth), name, node.support);
            stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
        }
        Ok(out)
    }
}
