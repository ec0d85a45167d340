/**
 * File: /src/mining/subsets.rs
 * Created Date: Thursday, October 8th 2026
 * Author: Zihan
 * -----
 * Last Modified: Thursday, 8th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 */

use std::collections::HashMap;

use crate::types::{FrequentItemset, ItemCode, Support};

/// Frequent itemsets sharing one 2-itemset prefix. Keys are the suffixes
/// after the prefix, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequentSubset {
    pub prefix: [ItemCode; 2],
    pub support: Support,
    extensions: HashMap<Vec<ItemCode>, Support>,
}

impl FrequentSubset {
    pub fn new(prefix: [ItemCode; 2], support: Support) -> Self {
        Self {
            prefix,
            support,
            extensions: HashMap::new(),
        }
    }

    pub fn insert(&mut self, suffix: Vec<ItemCode>, support: Support) {
        debug_assert!(suffix.windows(2).all(|w| w[0] < w[1]));
        self.extensions.insert(suffix, support);
    }

    pub fn get(&self, suffix: &[ItemCode]) -> Option<Support> {
        self.extensions.get(suffix).copied()
    }

    /// Support of a full itemset if it is recorded here.
    pub fn support_of(&self, itemset: &[ItemCode]) -> Option<Support> {
        match itemset {
            [a, b] if [*a, *b] == self.prefix => Some(self.support),
            [a, b, rest @ ..] if [*a, *b] == self.prefix => self.get(rest),
            _ => None,
        }
    }

    /// Number of recorded k-itemsets, k > 2
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn suffixes(&self) -> impl Iterator<Item = (&Vec<ItemCode>, &Support)> {
        self.extensions.iter()
    }

    /// Recorded k-itemsets as full itemsets, prefix included.
    pub fn itemsets(&self) -> impl Iterator<Item = FrequentItemset> + '_ {
        self.extensions.iter().map(move |(suffix, &support)| {
            let mut items = Vec::with_capacity(suffix.len() + 2);
            items.extend_from_slice(&self.prefix);
            items.extend_from_slice(suffix);
            FrequentItemset::new(items, support)
        })
    }
}

/// All `2^k - 1` non-empty subsets of `items`, each keeping the input order.
pub fn power_set(items: &[ItemCode]) -> Vec<Vec<ItemCode>> {
    let mut subsets: Vec<Vec<ItemCode>> = Vec::with_capacity((1usize << items.len().min(20)) - 1);
    for &item in items {
        let existing = subsets.len();
        for i in 0..existing {
            let mut extended = subsets[i].clone();
            extended.push(item);
            subsets.push(extended);
        }
        subsets.push(vec![item]);
    }
    subsets
}

/// Union of two ascending code lists, ascending, no duplicates.
pub fn sorted_union(a: &[ItemCode], b: &[ItemCode]) -> Vec<ItemCode> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            out.push(a[i]);
            i += 1;
        } else if a[i] > b[j] {
            out.push(b[j]);
            j += 1;
        } else {
            out.push(a[i]);
            i += 1;
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// Every `x ∪ y` for `x` in `left`, `y` in `right`.
pub fn cartesian(left: &[Vec<ItemCode>], right: &[Vec<ItemCode>]) -> Vec<Vec<ItemCode>> {
    let mut out = Vec::with_capacity(left.len() * right.len());
    for x in left {
        for y in right {
            out.push(sorted_union(x, y));
        }
    }
    out
}
