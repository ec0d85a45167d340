//! Occurrence lists ("nodelists") and the ancestor roll-up merge join.

/**
 * File: /src/ppc/nodelist.rs
 * Created Date: Tuesday, October 6th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-18		Zihan	ListJoin seam for instrumented joins
 * 2026-10-06		Zihan	Created nodelist and merge join
 */

use crate::ppc::tree::PpcTree;
use crate::types::{ItemCode, Support};

/// One occurrence of an itemset in the prefix tree: the traversal codes of the
/// node the occurrence is rolled up to, and the transactions it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeCode {
    pub pre: u32,
    pub pos: u32,
    pub count: Support,
}

impl NodeCode {
    pub fn new(pre: u32, pos: u32, count: Support) -> Self {
        Self { pre, pos, count }
    }

    /// `self` lies strictly below `other`
    #[inline]
    pub fn descends_from(&self, other: &NodeCode) -> bool {
        self.pre > other.pre && self.pos < other.pos
    }
}

/// Occurrence list sorted ascending by `pre`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nodelist {
    entries: Vec<NodeCode>,
}

impl Nodelist {
    /// Support-0 list. Holds no allocation.
    pub const EMPTY: Nodelist = Nodelist {
        entries: Vec::new(),
    };

    pub fn new() -> Self {
        Self::EMPTY
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Caller keeps `pre` ascending.
    pub fn push(&mut self, code: NodeCode) {
        debug_assert!(self.entries.last().map_or(true, |last| last.pre < code.pre));
        self.entries.push(code);
    }

    pub fn entries(&self) -> &[NodeCode] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_support(&self) -> Support {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Trim spare capacity to the used length.
    pub fn shrink(&mut self) {
        self.entries.shrink_to_fit();
    }

    /// Occurrence list of `common + i1 + i2` from the lists of `common + i1`
    /// (`a`) and `common + i2` (`b`), `i1 < i2`.
    ///
    /// Occurrences of `a` below an occurrence of `b` are summed into one entry
    /// keyed at that `b` node.
    pub fn merge(a: &Nodelist, b: &Nodelist) -> Nodelist {
        if a.is_empty() || b.is_empty() {
            return Nodelist::EMPTY;
        }
        let (a, b) = (&a.entries, &b.entries);
        let mut out: Vec<NodeCode> = Vec::with_capacity(a.len().min(b.len()));
        let (mut i, mut j) = (0usize, 0usize);

        while i < a.len() && j < b.len() {
            let (x, y) = (&a[i], &b[j]);
            if x.pre > y.pre {
                if x.pos < y.pos {
                    match out.last_mut() {
                        Some(last) if last.pre == y.pre => last.count += x.count,
                        _ => out.push(NodeCode::new(y.pre, y.pos, x.count)),
                    }
                    i += 1;
                } else {
                    // no later entry of `a` can sit below this `b` entry
                    j += 1;
                }
            } else {
                i += 1;
            }
        }

        if out.is_empty() {
            return Nodelist::EMPTY;
        }
        out.shrink_to_fit();
        Nodelist { entries: out }
    }

    /// Merge two itemsets that differ only in their last item, in either
    /// argument order. Returns the ascending union key and its list.
    pub fn merge_keyed(
        x: (&[ItemCode], &Nodelist),
        y: (&[ItemCode], &Nodelist),
    ) -> (Vec<ItemCode>, Nodelist) {
        let (lo, hi) = if x.0.last() <= y.0.last() { (x, y) } else { (y, x) };
        let mut key = lo.0.to_vec();
        if let Some(&last) = hi.0.last() {
            key.push(last);
        }
        (key, Nodelist::merge(lo.1, hi.1))
    }
}

/// Join of two occurrence lists. The miner goes through this seam so joins can
/// be counted or replaced.
pub trait ListJoin: Sync {
    fn join(&self, a: &Nodelist, b: &Nodelist) -> Nodelist;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MergeJoin;

impl ListJoin for MergeJoin {
    fn join(&self, a: &Nodelist, b: &Nodelist) -> Nodelist {
        Nodelist::merge(a, b)
    }
}

/// One pre-order pass over `tree` appending every node's codes to the list of
/// its item. `tree` must carry traversal codes.
pub fn build_item_lists(tree: &PpcTree, item_count: usize) -> Vec<Nodelist> {
    debug_assert!(tree.is_coded());
    let mut lists = vec![Nodelist::EMPTY; item_count];
    for id in tree.preorder() {
        let node = tree.node(id);
        if let Some(list) = lists.get_mut(node.item as usize) {
            list.entries.push(NodeCode::new(node.pre, node.pos, node.count));
        }
    }
    for list in lists.iter_mut() {
        list.shrink();
    }
    lists
}

/// Support of an arbitrary ascending itemset from per-item lists, by merging
/// the lists level by level:
///
/// ```text
/// c0    c1     c2     c3
///       c0c1   c0c2   c0c3
///              c0c1c2 c0c1c3
///                     c0c1c2c3
/// ```
pub fn itemset_support<J: ListJoin + ?Sized>(
    join: &J,
    item_lists: &[Nodelist],
    codes: &[ItemCode],
) -> Support {
    let mut level: Vec<Nodelist> = Vec::with_capacity(codes.len());
    for &c in codes {
        match item_lists.get(c as usize) {
            Some(list) if !list.is_empty() => level.push(list.clone()),
            _ => return 0,
        }
    }
    if level.is_empty() {
        return 0;
    }

    while level.len() > 1 {
        let head = level.remove(0);
        let mut next = Vec::with_capacity(level.len());
        for tail in &level {
            let merged = join.join(&head, tail);
            if merged.is_empty() {
                return 0;
            }
            next.push(merged);
        }
        level = next;
    }
    level[0].total_support()
}
