//! Worker strategies for the coarse-to-fine search.
//!
//! `Partitioned` splits the jobs into contiguous chunks and gives each chunk a
//! scoped thread; results come back in submission order. `Queue` feeds a
//! bounded job channel drained by a fixed set of workers; results come back in
//! completion order and callers must re-sort.

use crossbeam_channel::{bounded, unbounded};
use serde::{Deserialize, Serialize};
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkerStrategy {
    /// `workers = 0` sizes the pool to the available cores.
    Partitioned {
        #[serde(default)]
        workers: usize,
    },
    Queue { workers: usize },
}

impl Default for WorkerStrategy {
    fn default() -> Self {
        WorkerStrategy::Partitioned { workers: 0 }
    }
}

fn available_cores() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

impl WorkerStrategy {
    /// Thread count this strategy will use.
    pub fn workers(&self) -> usize {
        match *self {
            WorkerStrategy::Partitioned { workers: 0 } => available_cores(),
            WorkerStrategy::Partitioned { workers } | WorkerStrategy::Queue { workers } => workers.max(1),
        }
    }

    /// Apply `f` to every job.
    pub fn run<T, R, F>(&self, jobs: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync,
    {
        if jobs.is_empty() {
            return Vec::new();
        }
        let workers = self.workers().min(jobs.len());
        match self {
            WorkerStrategy::Partitioned { .. } => run_partitioned(jobs, workers, &f),
            WorkerStrategy::Queue { .. } => run_queue(jobs, workers, &f),
        }
    }
}

fn run_partitioned<T, R, F>(jobs: Vec<T>, workers: usize, f: &F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync,
{
    let total = jobs.len();
    let chunk_len = total.div_ceil(workers);
    let mut chunks: Vec<Vec<T>> = Vec::with_capacity(workers);
    let mut iter = jobs.into_iter();
    loop {
        let chunk: Vec<T> = iter.by_ref().take(chunk_len).collect();
        if chunk.is_empty() {
            break;
        }
        chunks.push(chunk);
    }

    thread::scope(|s| {
        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| s.spawn(move || chunk.into_iter().map(f).collect::<Vec<R>>()))
            .collect();
        let mut out = Vec::with_capacity(total);
        for handle in handles {
            match handle.join() {
                Ok(results) => out.extend(results),
                Err(_) => log::error!("Partition worker panicked; its chunk is dropped"),
            }
        }
        out
    })
}

fn run_queue<T, R, F>(jobs: Vec<T>, workers: usize, f: &F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync,
{
    let total = jobs.len();
    let (job_tx, job_rx) = bounded::<T>(workers * 2);
    let (result_tx, result_rx) = unbounded::<R>();

    thread::scope(|s| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            s.spawn(move || {
                while let Ok(job) = job_rx.recv() {
                    if result_tx.send(f(job)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(job_rx);
        drop(result_tx);

        for job in jobs {
            if job_tx.send(job).is_err() {
                log::error!("Queue workers exited early; remaining jobs dropped");
                break;
            }
        }
        drop(job_tx);

        let results: Vec<R> = result_rx.iter().collect();
        if results.len() != total {
            log::error!("Queue returned {} of {} results", results.len(), total);
        }
        results
    })
}
