/**
 * File: /src/fpo/merge.rs
 * Created Date: Sunday, October 11th 2026
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 17th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Sequential subtree merge without recursion
 * 2026-10-11		Zihan	Created tree merge
 */

use std::cmp::Ordering;
use std::time::Instant;

use super::tree::{FpoNode, FpoTree};
use crate::partitioner::WorkPartitioner;
use crate::types::WorkError;
use crate::union_dc::UnionDC;

impl FpoTree {
    /// Union `other` into this tree, summing supports of shared itemsets.
    ///
    /// Level-1 children are merged on the calling thread. Every level-1 pair
    /// whose sides both have children becomes one work unit that merges the
    /// two subtrees sequentially.
    pub fn merge(&mut self, other: FpoTree, partitioner: &WorkPartitioner) -> Result<(), WorkError> {
        let start = Instant::now();
        let deferred = merge_level(&mut self.root, other.root.children);
        let units = pair_deferred(&mut self.root.children, deferred);
        let unit_count = units.len();

        partitioner.run("merge trees", units, |_, (node, incoming)| {
            merge_subtree(node, incoming)
        })?;
        log::debug!(
            "merged trees: {} shared level-1 subtrees in {}ms",
            unit_count,
            start.elapsed().as_millis()
        );
        Ok(())
    }

    /// Merge many trees by pairwise reduction.
    pub fn merge_all(trees: Vec<FpoTree>, partitioner: &WorkPartitioner) -> Result<FpoTree, WorkError> {
        let mut failure: Option<WorkError> = None;
        let merged = UnionDC::reduce(trees, |mut left, right| {
            if failure.is_none() {
                if let Err(e) = left.merge(right, partitioner) {
                    failure = Some(e);
                }
            }
            left
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(merged.unwrap_or_default()),
        }
    }
}

/// Merge the ascending child lists of `node` and `incoming`. Returns, for
/// every matched child with incoming grandchildren, its position in the
/// merged list and those grandchildren.
fn merge_level(node: &mut FpoNode, incoming: Vec<FpoNode>) -> Vec<(usize, Vec<FpoNode>)> {
    if incoming.is_empty() {
        return Vec::new();
    }
    if node.children.is_empty() {
        node.children = incoming;
        return Vec::new();
    }

    let ours = std::mem::take(&mut node.children);
    let mut merged = Vec::with_capacity(ours.len().max(incoming.len()));
    let mut deferred = Vec::new();
    let mut a = ours.into_iter().peekable();
    let mut b = incoming.into_iter().peekable();

    loop {
        let order = match (a.peek(), b.peek()) {
            (Some(x), Some(y)) => x.item.cmp(&y.item),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => break,
        };
        match order {
            Ordering::Less => merged.extend(a.next()),
            Ordering::Greater => merged.extend(b.next()),
            Ordering::Equal => {
                if let (Some(mut mine), Some(theirs)) = (a.next(), b.next()) {
                    mine.support += theirs.support;
                    if !theirs.children.is_empty() {
                        deferred.push((merged.len(), theirs.children));
                    }
                    merged.push(mine);
                }
            }
        }
    }
    node.children = merged;
    deferred
}

/// Attach each deferred child list to its (disjoint) target node.
fn pair_deferred(
    children: &mut [FpoNode],
    deferred: Vec<(usize, Vec<FpoNode>)>,
) -> Vec<(&mut FpoNode, Vec<FpoNode>)> {
    let mut deferred = deferred.into_iter().peekable();
    let mut out = Vec::with_capacity(deferred.len());
    for (pos, child) in children.iter_mut().enumerate() {
        if deferred.peek().map_or(false, |(p, _)| *p == pos) {
            if let Some((_, incoming)) = deferred.next() {
                out.push((child, incoming));
            }
        }
    }
    out
}

fn merge_subtree(node: &mut FpoNode, incoming: Vec<FpoNode>) {
    let mut stack: Vec<(&mut FpoNode, Vec<FpoNode>)> = vec![(node, incoming)];
    while let Some((node, incoming)) = stack.pop() {
        let deferred = merge_level(node, incoming);
        stack.extend(pair_deferred(&mut node.children, deferred));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemCode, Support};

    fn tree_of(itemsets: &[(&[ItemCode], Support)]) -> FpoTree {
        let mut tree = FpoTree::new();
        for (codes, support) in itemsets {
            tree.insert_with_support(codes, *support);
        }
        tree
    }

    fn lines(tree: &FpoTree) -> Vec<String> {
        tree.itemsets().iter().map(|f| f.to_line()).collect()
    }

    #[test]
    fn test_merge_disjoint_second_level() {
        let mut left = tree_of(&[(&[0], 1), (&[0, 1], 1)]);
        let right = tree_of(&[(&[0], 1), (&[0, 2], 1)]);
        let partitioner = WorkPartitioner::new(2);
        left.merge(right, &partitioner).unwrap();

        assert_eq!(lines(&left), vec!["0:2", "0 1:1", "0 2:1"]);
        let counts = left.count_nodes(&partitioner).unwrap();
        assert_eq!((counts.total, counts.inner, counts.leaves), (3, 1, 2));
    }

    #[test]
    fn test_merge_sums_deep_supports() {
        let mut left = tree_of(&[(&[0, 1, 2, 3], 2), (&[0, 1, 4], 1), (&[5], 3)]);
        let right = tree_of(&[(&[0, 1, 2, 3], 5), (&[0, 1, 2, 6], 1), (&[4], 1)]);
        left.merge(right, &WorkPartitioner::new(3)).unwrap();

        assert_eq!(left.get(&[0, 1, 2, 3]).unwrap().support, 7);
        assert_eq!(left.get(&[0, 1, 2, 6]).unwrap().support, 1);
        assert_eq!(left.get(&[0, 1, 4]).unwrap().support, 1);
        let roots: Vec<ItemCode> = left.root().children().iter().map(|n| n.item).collect();
        assert_eq!(roots, vec![0, 4, 5]);
    }

    #[test]
    fn test_merge_commutes() {
        let a = tree_of(&[(&[0, 1], 1), (&[0, 3, 4], 2), (&[2], 1)]);
        let b = tree_of(&[(&[0, 3], 4), (&[1, 2], 1), (&[2, 5, 6], 3)]);
        let partitioner = WorkPartitioner::new(2);

        let mut ab = a.clone();
        ab.merge(b.clone(), &partitioner).unwrap();
        let mut ba = b;
        ba.merge(a, &partitioner).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_merge_with_empty() {
        let partitioner = WorkPartitioner::new(1);
        let filled = tree_of(&[(&[0, 1], 1)]);

        let mut empty = FpoTree::new();
        empty.merge(filled.clone(), &partitioner).unwrap();
        assert_eq!(lines(&empty), lines(&filled));

        let mut kept = filled.clone();
        kept.merge(FpoTree::new(), &partitioner).unwrap();
        assert_eq!(kept, filled);
    }

    #[test]
    fn test_merge_all() {
        let trees: Vec<FpoTree> = (0..5).map(|i| tree_of(&[(&[0, 1], 1), (&[i + 2], 1)])).collect();
        let merged = FpoTree::merge_all(trees, &WorkPartitioner::new(2)).unwrap();
        assert_eq!(merged.get(&[0, 1]).unwrap().support, 5);
        assert_eq!(merged.root().children().len(), 6);
        assert!(FpoTree::merge_all(Vec::new(), &WorkPartitioner::new(2)).unwrap().is_empty());
    }
}
