//! # Work Partitioner
//!
//! Fork-join fan-out used by every parallel phase. Units sit behind one
//! mutex-guarded cursor; each worker of a freshly built pool claims the next
//! unit, runs it to completion and loops until the cursor is exhausted.
//! Pools are not reused across phases.

/**
 * File: /src/partitioner.rs
 * Created Date: Monday, October 5th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-12		Zihan	Propagate unit panics through the join barrier
 * 2026-10-05		Zihan	Replaced block partitioner with cursor work partitioner
 */

use crate::types::WorkError;
use std::any::Any;
use std::iter::Enumerate;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use std::vec::IntoIter;

/// max(1, half of the available hardware parallelism)
pub fn default_worker_count() -> usize {
    (num_cpus::get() / 2).max(1)
}

#[derive(Debug, Clone)]
pub struct WorkPartitioner {
    num_workers: usize,
}

impl Default for WorkPartitioner {
    fn default() -> Self {
        Self::new(default_worker_count())
    }
}

impl WorkPartitioner {
    pub fn new(num_workers: usize) -> Self {
        Self {
            num_workers: num_workers.max(1),
        }
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Run `work` over every unit; output `i` belongs to unit `i`.
    pub fn run<T, R, F>(&self, phase: &str, units: Vec<T>, work: F) -> Result<Vec<R>, WorkError>
    where
        T: Send,
        R: Send,
        F: Fn(usize, T) -> R + Sync,
    {
        let n = units.len();
        let per_worker = self.fold(phase, units, |_| Vec::new(), |out, idx, unit| {
            out.push((idx, work(idx, unit)));
        })?;

        let mut slots: Vec<Option<R>> = (0..n).map(|_| None).collect();
        for (idx, result) in per_worker.into_iter().flatten() {
            slots[idx] = Some(result);
        }
        Ok(slots.into_iter().flatten().collect())
    }

    /// Like [`run`](Self::run) but every worker folds its claimed units into a
    /// private state built by `init(worker_index)`. Returns one state per worker.
    pub fn fold<T, S, I, F>(
        &self,
        phase: &str,
        units: Vec<T>,
        init: I,
        work: F,
    ) -> Result<Vec<S>, WorkError>
    where
        T: Send,
        S: Send,
        I: Fn(usize) -> S + Sync,
        F: Fn(&mut S, usize, T) + Sync,
    {
        if units.is_empty() {
            return Ok(Vec::new());
        }
        let unit_total = units.len();
        let workers = self.num_workers.min(unit_total);
        log::debug!(
            "{}: {} units on {} workers",
            phase,
            units.len(),
            workers
        );
        let start = Instant::now();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| WorkError::PoolBuild(e.to_string()))?;

        let cursor = WorkCursor::new(units);
        let outcomes: Vec<(S, Option<WorkError>)> = pool.broadcast(|ctx| {
            let mut state = init(ctx.index());
            while let Some((idx, unit)) = cursor.claim() {
                let result = panic::catch_unwind(AssertUnwindSafe(|| work(&mut state, idx, unit)));
                if let Err(payload) = result {
                    let message = panic_message(payload.as_ref());
                    log::error!("{}: worker {} failed on unit {}: {}", phase, ctx.index(), idx, message);
                    return (state, Some(WorkError::UnitPanicked { unit: idx, message }));
                }
            }
            (state, None)
        });

        let mut states = Vec::with_capacity(outcomes.len());
        let mut failure: Option<WorkError> = None;
        for (state, err) in outcomes {
            states.push(state);
            if let Some(e) = err {
                failure = Some(match failure {
                    Some(prev) if unit_of(&prev) <= unit_of(&e) => prev,
                    _ => e,
                });
            }
        }
        if let Some(e) = failure {
            return Err(e);
        }

        log::info!(
            "{}: {} units done in {}ms",
            phase,
            unit_total,
            start.elapsed().as_millis()
        );
        Ok(states)
    }
}

/// Units plus the shared claim cursor. The lock is held only for the
/// read-test-increment.
struct WorkCursor<T> {
    inner: Mutex<Enumerate<IntoIter<T>>>,
}

impl<T> WorkCursor<T> {
    fn new(units: Vec<T>) -> Self {
        Self {
            inner: Mutex::new(units.into_iter().enumerate()),
        }
    }

    fn claim(&self) -> Option<(usize, T)> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next()
    }
}

fn unit_of(e: &WorkError) -> usize {
    match e {
        WorkError::UnitPanicked { unit, .. } => *unit,
        WorkError::PoolBuild(_) => 0,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_default_worker_count() {
        assert!(default_worker_count() >= 1);
        assert_eq!(WorkPartitioner::new(0).num_workers(), 1);
    }

    #[test]
    fn test_run_preserves_unit_order() {
        let partitioner = WorkPartitioner::new(4);
        let units: Vec<usize> = (0..100).collect();
        let out = partitioner.run("square", units, |_, x| x * x).unwrap();
        assert_eq!(out.len(), 100);
        for (i, v) in out.iter().enumerate() {
            assert_eq!(*v, i * i);
        }
    }

    #[test]
    fn test_every_unit_claimed_once() {
        let partitioner = WorkPartitioner::new(3);
        let calls = AtomicUsize::new(0);
        let states = partitioner
            .fold(
                "collect",
                (0..57).collect::<Vec<usize>>(),
                |_| Vec::new(),
                |seen: &mut Vec<usize>, idx, unit| {
                    assert_eq!(idx, unit);
                    calls.fetch_add(1, Ordering::SeqCst);
                    seen.push(unit);
                },
            )
            .unwrap();
        assert!(states.len() <= 3);
        let all: Vec<usize> = states.into_iter().flatten().collect();
        let distinct: HashSet<usize> = all.iter().copied().collect();
        assert_eq!(all.len(), 57);
        assert_eq!(distinct.len(), 57);
        assert_eq!(calls.load(Ordering::SeqCst), 57);
    }

    #[test]
    fn test_mutable_borrow_units() {
        let mut data = vec![vec![1u32, 2], vec![3], vec![], vec![4, 5, 6]];
        let units: Vec<&mut Vec<u32>> = data.iter_mut().collect();
        WorkPartitioner::new(2)
            .run("double", units, |_, v| v.iter_mut().for_each(|x| *x *= 2))
            .unwrap();
        assert_eq!(data, vec![vec![2, 4], vec![6], vec![], vec![8, 10, 12]]);
    }

    #[test]
    fn test_empty_units() {
        let out: Vec<u8> = WorkPartitioner::new(4)
            .run("empty", Vec::<u8>::new(), |_, x| x)
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_panic_propagates_through_join() {
        let result = WorkPartitioner::new(2).run("faulty", (0..10).collect::<Vec<u32>>(), |_, x| {
            if x == 7 {
                panic!("unit seven is broken");
            }
            x
        });
        match result {
            Err(WorkError::UnitPanicked { unit, message }) => {
                assert_eq!(unit, 7);
                assert!(message.contains("seven"));
            }
            other => panic!("expected UnitPanicked, got {:?}", other.map(|v| v.len())),
        }
    }
}
