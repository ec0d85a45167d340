/*
 * File: /matrix.rs
 * Created Date: Thursday November 23rd 2023
 * Author: Zihan
 * -----
 * Last Modified: Wednesday, 7th October 2026 3:12:40 pm
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-07		Zihan	Co-occurrence counter over the prefix tree
 */

use std::ops::{Index, IndexMut};

use ndarray::Array2;

use crate::partitioner::WorkPartitioner;
use crate::ppc::{NodeId, PpcTree};
use crate::types::{FrequentItemset, ItemCode, Support, WorkError};

/// Dense pairwise counter. Only `[i][j]` with `i < j` is authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct CooccurrenceMatrix {
    data: Array2<Support>,
    size: usize,
}

impl CooccurrenceMatrix {
    pub fn new(size: usize) -> CooccurrenceMatrix {
        CooccurrenceMatrix {
            data: Array2::zeros((size, size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Support> {
        if row >= self.size || col >= self.size {
            None
        } else {
            Some(&self.data[(row, col)])
        }
    }

    /// Support of the pair `{a, b}`, in either order. 0 when out of range.
    pub fn pair_support(&self, a: ItemCode, b: ItemCode) -> Support {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.get(lo as usize, hi as usize).copied().unwrap_or(0)
    }

    /// Count every (node, ancestor) pair in the subtree rooted at `top`.
    /// Prefix-tree ancestors carry larger codes, so only the upper triangle is written.
    pub fn accumulate(&mut self, tree: &PpcTree, top: NodeId) {
        for id in tree.subtree(top) {
            let node = tree.node(id);
            let row = node.item as usize;
            for ancestor in tree.ancestors(id) {
                self.data[(row, ancestor.item as usize)] += node.count;
            }
        }
    }

    /// Accumulate the whole tree, one unit per root child, each worker into a
    /// private matrix; private matrices are summed afterward.
    pub fn from_tree(
        tree: &PpcTree,
        size: usize,
        partitioner: &WorkPartitioner,
    ) -> Result<CooccurrenceMatrix, WorkError> {
        let tops: Vec<NodeId> = tree.root_children().to_vec();
        let partials = partitioner.fold(
            "co-occurrence matrix",
            tops,
            |_| CooccurrenceMatrix::new(size),
            |m, _, top| m.accumulate(tree, top),
        )?;

        let mut partials = partials.into_iter();
        let mut matrix = partials
            .next()
            .unwrap_or_else(|| CooccurrenceMatrix::new(size));
        for partial in partials {
            matrix.merge_upper(&partial);
        }
        Ok(matrix)
    }

    /// Add `other`'s upper triangle into `self`.
    pub fn merge_upper(&mut self, other: &CooccurrenceMatrix) {
        let n = self.size.min(other.size);
        for i in 0..n {
            for j in (i + 1)..n {
                self.data[(i, j)] += other.data[(i, j)];
            }
        }
    }

    /// Every pair `i < j` with count at least `threshold`, ascending by `(i, j)`.
    pub fn filter_frequent(&self, threshold: Support) -> Vec<FrequentItemset> {
        let mut pairs = Vec::new();
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                let support = self.data[(i, j)];
                if support >= threshold {
                    pairs.push(FrequentItemset::new(vec![i as ItemCode, j as ItemCode], support));
                }
            }
        }
        pairs
    }
}

impl Index<(usize, usize)> for CooccurrenceMatrix {
    type Output = Support;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<(usize, usize)> for CooccurrenceMatrix {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.data[index]
    }
}
