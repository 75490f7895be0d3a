//! Per-delivery fan-out/fan-in.
//!
//! One delivery (one `feed` call) may carry many blocks or frames. They are
//! independent, so workers process them in any order; the collector puts each
//! result back in its original slot before anything is returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam::channel::{bounded, unbounded};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Parallelism configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelismProfile {
    /// Upper bound on worker threads per delivery.
    pub worker_count: usize,
    /// Batches smaller than this run on the calling thread.
    pub min_parallel_items: usize,
}

impl Default for ParallelismProfile {
    fn default() -> Self {
        Self::dynamic()
    }
}

impl ParallelismProfile {
    pub fn single_threaded() -> Self {
        Self {
            worker_count: 1,
            min_parallel_items: usize::MAX,
        }
    }

    /// One worker per core, leaving one core free.
    pub fn dynamic() -> Self {
        Self {
            worker_count: num_cpus::get().saturating_sub(1).max(1),
            min_parallel_items: 2,
        }
    }

    pub fn with_workers(worker_count: usize) -> Self {
        Self {
            worker_count: worker_count.max(1),
            min_parallel_items: 2,
        }
    }

    fn runs_parallel(&self, items: usize) -> bool {
        self.worker_count > 1 && items >= self.min_parallel_items.max(2)
    }
}

/// Apply `f` to every item and return the results in input order.
///
/// - Results are slotted by index, so completion order never leaks out.
/// - On failure, items not yet picked up are skipped and the error of the
///   lowest failing index is returned. Jobs are handed out in index order and
///   every job taken from the queue runs, so no item below a failing one is
///   ever skipped.
pub fn map_ordered<T, R, E, F>(items: &[T], profile: &ParallelismProfile, f: F) -> Result<Vec<R>, E>
where
    T: Sync,
    R: Send,
    E: Send,
    F: Fn(&T) -> Result<R, E> + Sync,
{
    if !profile.runs_parallel(items.len()) {
        return items.iter().map(&f).collect();
    }

    let workers = profile.worker_count.min(items.len());
    let cancelled = AtomicBool::new(false);

    let (job_tx, job_rx) = bounded::<usize>(items.len());
    let (out_tx, out_rx) = unbounded::<(usize, Result<R, E>)>();

    for index in 0..items.len() {
        // Capacity equals the item count, so this never blocks or fails.
        let _ = job_tx.send(index);
    }
    drop(job_tx);

    thread::scope(|scope| {
        for worker in 0..workers {
            let rx = job_rx.clone();
            let tx = out_tx.clone();
            let (f, cancelled) = (&f, &cancelled);
            scope.spawn(move || {
                // A job once taken always runs.
                while !cancelled.load(Ordering::Acquire) {
                    let Ok(index) = rx.recv() else { break };
                    let res = f(&items[index]);
                    if res.is_err() {
                        cancelled.store(true, Ordering::Release);
                    }
                    if tx.send((index, res)).is_err() {
                        break;
                    }
                }
                trace!(worker = worker, "ordered map worker finished");
            });
        }
    });
    drop(out_tx);

    let mut slots: Vec<Option<R>> = Vec::with_capacity(items.len());
    slots.resize_with(items.len(), || None);
    let mut first_err: Option<(usize, E)> = None;

    for (index, res) in out_rx.iter() {
        match res {
            Ok(value) => slots[index] = Some(value),
            Err(e) => {
                if first_err.as_ref().map_or(true, |(at, _)| index < *at) {
                    first_err = Some((index, e));
                }
            }
        }
    }

    if let Some((_, e)) = first_err {
        return Err(e);
    }

    // Without a failure nothing is cancelled, so every slot is filled.
    Ok(slots.into_iter().flatten().collect())
}
