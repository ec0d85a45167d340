/**
 * File: /src/fpo/support.rs
 * Created Date: Wednesday, October 14th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-18		Zihan	Reuse the subset record of each 2-itemset
 * 2026-10-14		Zihan	Created local support update
 */

use std::time::Instant;

use super::tree::{FpoNode, FpoTree};
use crate::mining::LocalMiner;
use crate::ppc::ListJoin;
use crate::types::{ItemCode, WorkError};

impl FpoTree {
    /// Overwrite every node's support with its local support from `miner`.
    ///
    /// Level 1 reads item frequencies and level 2 the co-occurrence matrix on
    /// the calling thread. Deeper levels run as one unit per inner level-2
    /// node, preferring the 2-itemset's subset record over list merging.
    /// Nodes whose item does not occur locally keep their support, and so does
    /// their subtree.
    pub fn update_supports<J: ListJoin>(&mut self, miner: &LocalMiner<J>) -> Result<(), WorkError> {
        let start = Instant::now();
        let index = miner.index();

        let mut units: Vec<([ItemCode; 2], &mut FpoNode)> = Vec::new();
        for l1 in self.root.children.iter_mut() {
            if index.frequency(l1.item) == 0 {
                continue;
            }
            l1.support = index.frequency(l1.item);
            let first = l1.item;
            for l2 in l1.children.iter_mut() {
                if index.frequency(l2.item) == 0 {
                    continue;
                }
                l2.support = miner.support_of(&[first, l2.item]);
                if !l2.is_leaf() {
                    units.push(([first, l2.item], l2));
                }
            }
        }

        let unit_count = units.len();
        miner.partitioner().run("update supports", units, |_, (prefix, node)| {
            update_subtree(miner, prefix, node)
        })?;
        log::info!(
            "updated supports under {} level-2 nodes in {}ms",
            unit_count,
            start.elapsed().as_millis()
        );
        Ok(())
    }
}

fn update_subtree<J: ListJoin>(miner: &LocalMiner<J>, prefix: [ItemCode; 2], top: &mut FpoNode) {
    let index = miner.index();
    let subset = miner.subsets().get(&prefix);

    let mut stack: Vec<(&mut FpoNode, Vec<ItemCode>)> = top
        .children
        .iter_mut()
        .map(|c| (c, prefix.to_vec()))
        .collect();
    while let Some((node, mut path)) = stack.pop() {
        if index.frequency(node.item) == 0 {
            continue;
        }
        path.push(node.item);
        node.support = subset
            .and_then(|s| s.support_of(&path))
            .unwrap_or_else(|| miner.support_of(&path));
        stack.extend(node.children.iter_mut().map(|c| (c, path.clone())));
    }
}
