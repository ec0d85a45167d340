/*
 * File: /union_dc.rs
 * Created Date: Wednesday November 22nd 2023
 * Author: Zihan
 * -----
 * Last Modified: Tuesday, 13th October 2026 9:12:40 pm
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-13		Zihan	Stop when fewer than two elements remain, add reduce
 */

use std::collections::VecDeque;

/// Pairwise divide-and-conquer reduction over a queue: pop two, push their
/// union to the back.
pub struct UnionDC {}

impl UnionDC {
    /// Reduce until `end_condition` holds or fewer than two elements remain.
    pub fn union_dc<T, F>(
        queue: &mut VecDeque<T>,
        mut func: F,
        end_condition: impl Fn(&VecDeque<T>) -> bool,
    ) where
        F: FnMut(T, T) -> T,
    {
        while queue.len() >= 2 && !end_condition(queue) {
            if let (Some(a), Some(b)) = (queue.pop_front(), queue.pop_front()) {
                queue.push_back(func(a, b));
            }
        }
    }

    /// Reduce everything to one element; `None` for no input.
    pub fn reduce<T, F>(items: impl IntoIterator<Item = T>, func: F) -> Option<T>
    where
        F: FnMut(T, T) -> T,
    {
        let mut queue: VecDeque<T> = items.into_iter().collect();
        Self::union_dc(&mut queue, func, |q| q.len() <= 1);
        queue.pop_front()
    }
}
