use std::cmp::Ordering;

use crate::union_dc::UnionDC;

/// Union of two ascending name lists, duplicates collapsed.
pub fn merge_two(left: Vec<String>, right: Vec<String>) -> Vec<String> {
    let mut merged = Vec::with_capacity(left.len().max(right.len()));
    let mut a = left.into_iter().peekable();
    let mut b = right.into_iter().peekable();

    loop {
        let order = match (a.peek(), b.peek()) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => break,
        };
        match order {
            Ordering::Less => merged.extend(a.next()),
            Ordering::Greater => merged.extend(b.next()),
            Ordering::Equal => {
                merged.extend(a.next());
                b.next();
            }
        }
    }
    merged
}

/// Union of many ascending local frequent-item lists, reduced pairwise.
pub fn merge_sorted_items(lists: Vec<Vec<String>>) -> Vec<String> {
    let count = lists.len();
    let merged = UnionDC::reduce(lists, merge_two).unwrap_or_default();
    log::debug!("merged {} item lists into {} items", count, merged.len());
    merged
}
