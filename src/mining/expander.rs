//! # Equivalence-Class Expander
//!
//! Grows every frequent 2-itemset into all its frequent supersets whose extra
//! items are larger than the 2-itemset's items.
//!
//! For an itemset `X` and each candidate `c`, the join of the two occurrence
//! lists gives `support(X ∪ {c})`:
//! - equal to `support(X)`: `c` is a perfect extension and joins the
//!   equivalence set; every subset of that set has `support(X)` and needs no
//!   further joins
//! - at least the threshold: `X ∪ {c}` is recorded and extended further
//! - otherwise `c` is dropped
//!
//! Equivalence sets are carried into deeper levels and combined with new
//! ones by Cartesian product.

/**
 * File: /src/mining/expander.rs
 * Created Date: Thursday, October 8th 2026
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 17th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Replaced recursion with an explicit frame stack
 * 2026-10-08		Zihan	Created expander
 */

use std::rc::Rc;

use crate::mining::subsets::{cartesian, power_set, sorted_union, FrequentSubset};
use crate::ppc::{ListJoin, Nodelist};
use crate::types::{ItemCode, Support};

/// Frequent extension of the current itemset, kept with its occurrence list
/// until all its own extensions are done.
#[derive(Debug)]
struct Extension {
    item: ItemCode,
    support: Support,
    list: Nodelist,
}

/// Pending extension of `body + [siblings[head].item]`
struct Frame {
    body: Vec<ItemCode>,
    siblings: Rc<Vec<Extension>>,
    head: usize,
    parent_eq: Rc<Vec<Vec<ItemCode>>>,
}

/// A frequent 2-itemset with its occurrence list.
#[derive(Debug, Clone)]
pub struct PairList {
    pub items: [ItemCode; 2],
    pub support: Support,
    pub list: Nodelist,
}

pub struct EquivalenceExpander<'a, J: ListJoin + ?Sized> {
    join: &'a J,
    threshold: Support,
}

impl<'a, J: ListJoin + ?Sized> EquivalenceExpander<'a, J> {
    pub fn new(join: &'a J, threshold: Support) -> Self {
        Self { join, threshold }
    }

    /// Expand `pair`. `siblings` are the frequent 2-itemsets `(pair[0], j)`
    /// with `j > pair[1]`, ascending by `j`.
    pub fn expand(&self, pair: &PairList, siblings: &[PairList]) -> FrequentSubset {
        let mut subset = FrequentSubset::new(pair.items, pair.support);
        let candidates = siblings.iter().map(|s| (s.items[1], &s.list));
        let (extensions, eq) = self.step(&[], &pair.list, pair.support, candidates, &[], &mut subset);

        let mut stack: Vec<Frame> = Vec::new();
        push_frames(&mut stack, Vec::new(), extensions, eq);

        while let Some(frame) = stack.pop() {
            let x = &frame.siblings[frame.head];
            let mut x_key = frame.body.clone();
            x_key.push(x.item);

            let candidates = frame.siblings[frame.head + 1..]
                .iter()
                .map(|y| (y.item, &y.list));
            let (extensions, eq) = self.step(
                &x_key,
                &x.list,
                x.support,
                candidates,
                &frame.parent_eq,
                &mut subset,
            );
            push_frames(&mut stack, x_key, extensions, eq);
        }
        subset
    }

    /// One level: join `x` with every candidate, record results, and return
    /// the frequent extensions plus the equivalence set passed further down.
    fn step<'l, I>(
        &self,
        x: &[ItemCode],
        x_list: &Nodelist,
        x_support: Support,
        candidates: I,
        parent_eq: &[Vec<ItemCode>],
        out: &mut FrequentSubset,
    ) -> (Vec<Extension>, Vec<Vec<ItemCode>>)
    where
        I: Iterator<Item = (ItemCode, &'l Nodelist)>,
    {
        let mut eq_items: Vec<ItemCode> = Vec::new();
        let mut extensions: Vec<Extension> = Vec::new();

        for (item, y_list) in candidates {
            let mut list = self.join.join(x_list, y_list);
            let support = list.total_support();
            if support == x_support {
                eq_items.push(item);
            } else if support >= self.threshold {
                list.shrink();
                let mut key = x.to_vec();
                key.push(item);
                out.insert(key, support);
                extensions.push(Extension {
                    item,
                    support,
                    list,
                });
            }
        }

        let curr_eq = if eq_items.is_empty() {
            parent_eq.to_vec()
        } else {
            let eq_set = power_set(&eq_items);
            for s in &eq_set {
                out.insert(sorted_union(x, s), x_support);
            }
            if parent_eq.is_empty() {
                eq_set
            } else {
                let mut product = cartesian(&eq_set, parent_eq);
                for s in &product {
                    out.insert(sorted_union(x, s), x_support);
                }
                product.extend(eq_set);
                product.extend_from_slice(parent_eq);
                product
            }
        };

        if !curr_eq.is_empty() {
            for ext in &extensions {
                let mut ext_key = x.to_vec();
                ext_key.push(ext.item);
                for s in &curr_eq {
                    out.insert(sorted_union(&ext_key, s), ext.support);
                }
            }
        }

        (extensions, curr_eq)
    }
}

fn push_frames(
    stack: &mut Vec<Frame>,
    body: Vec<ItemCode>,
    extensions: Vec<Extension>,
    eq: Vec<Vec<ItemCode>>,
) {
    // the last extension has no candidates after it
    if extensions.len() < 2 {
        return;
    }
    let siblings = Rc::new(extensions);
    let parent_eq = Rc::new(eq);
    for head in (0..siblings.len() - 1).rev() {
        stack.push(Frame {
            body: body.clone(),
            siblings: Rc::clone(&siblings),
            head,
            parent_eq: Rc::clone(&parent_eq),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppc::{build_item_lists, itemset_support, MergeJoin, PpcTree};
    use crate::types::FrequentItemset;
    use std::collections::BTreeMap;

    fn pair_lists(transactions: &[Vec<ItemCode>], items: usize, threshold: Support) -> Vec<PairList> {
        let mut tree = PpcTree::new();
        for t in transactions {
            tree.insert(t);
        }
        tree.assign_traversal_codes();
        let lists = build_item_lists(&tree, items);
        let mut pairs = Vec::new();
        for i in 0..items {
            for j in (i + 1)..items {
                let list = Nodelist::merge(&lists[i], &lists[j]);
                let support = list.total_support();
                if support >= threshold {
                    pairs.push(PairList {
                        items: [i as ItemCode, j as ItemCode],
                        support,
                        list,
                    });
                }
            }
        }
        pairs
    }

    fn expand_all(pairs: &[PairList], threshold: Support) -> BTreeMap<Vec<ItemCode>, Support> {
        let join = MergeJoin;
        let expander = EquivalenceExpander::new(&join, threshold);
        let mut found = BTreeMap::new();
        for (p, pair) in pairs.iter().enumerate() {
            let end = pairs[p + 1..]
                .iter()
                .position(|q| q.items[0] != pair.items[0])
                .map_or(pairs.len(), |off| p + 1 + off);
            let subset = expander.expand(pair, &pairs[p + 1..end]);
            for FrequentItemset { items, support } in subset.itemsets() {
                assert!(found.insert(items, support).is_none(), "itemset produced twice");
            }
        }
        found
    }

    fn brute_force(transactions: &[Vec<ItemCode>], items: usize, threshold: Support) -> BTreeMap<Vec<ItemCode>, Support> {
        let mut out = BTreeMap::new();
        for mask in 1u32..(1 << items) {
            let set: Vec<ItemCode> = (0..items as ItemCode).filter(|i| mask & (1 << i) != 0).collect();
            if set.len() < 3 {
                continue;
            }
            let support = transactions
                .iter()
                .filter(|t| set.iter().all(|c| t.contains(c)))
                .count() as Support;
            if support >= threshold {
                out.insert(set, support);
            }
        }
        out
    }

    #[test]
    fn test_no_frequent_triple_in_scenario() {
        let db = vec![vec![0, 1, 2], vec![0, 1], vec![1, 2, 3]];
        let pairs = pair_lists(&db, 4, 2);
        assert_eq!(pairs.len(), 2);
        assert!(expand_all(&pairs, 2).is_empty());
    }

    #[test]
    fn test_matches_brute_force() {
        let db: Vec<Vec<ItemCode>> = vec![
            vec![0, 1, 2, 3, 4],
            vec![0, 1, 2, 3],
            vec![0, 1, 2, 4, 5],
            vec![1, 2, 3, 5],
            vec![0, 2, 3, 4, 5],
            vec![0, 1, 3, 4, 5],
            vec![0, 1, 2, 3, 4, 5],
            vec![2, 3, 4],
        ];
        for threshold in 1..=5 {
            let pairs = pair_lists(&db, 6, threshold);
            assert_eq!(expand_all(&pairs, threshold), brute_force(&db, 6, threshold), "threshold {}", threshold);
        }
    }

    #[test]
    fn test_equivalence_set_carried_down() {
        // 4 always rides with 0 and 1; 2 and 3 split the support below
        let db: Vec<Vec<ItemCode>> = vec![
            vec![0, 1, 2, 3, 4],
            vec![0, 1, 2, 4],
            vec![0, 1, 3, 4],
            vec![0, 1, 2, 3, 4],
        ];
        let pairs = pair_lists(&db, 5, 2);
        let found = expand_all(&pairs, 2);
        assert_eq!(found.get(&vec![0, 1, 4]), Some(&4));
        assert_eq!(found.get(&vec![0, 1, 2, 3]), Some(&2));
        assert_eq!(found.get(&vec![0, 1, 2, 3, 4]), Some(&2));
        assert_eq!(found, brute_force(&db, 5, 2));
    }

    #[test]
    fn test_support_chain_agrees() {
        let db: Vec<Vec<ItemCode>> = vec![vec![0, 1, 2], vec![0, 1, 2], vec![0, 2], vec![1, 2]];
        let mut tree = PpcTree::new();
        for t in &db {
            tree.insert(t);
        }
        tree.assign_traversal_codes();
        let lists = build_item_lists(&tree, 3);
        let pairs = pair_lists(&db, 3, 2);
        let found = expand_all(&pairs, 2);
        assert_eq!(found.get(&vec![0, 1, 2]).copied(), Some(itemset_support(&MergeJoin, &lists, &[0, 1, 2])));
    }
}
