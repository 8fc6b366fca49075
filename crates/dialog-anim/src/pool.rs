//! Worker pool
//!
//! A fixed number of blocking workers, created once, each rendering its
//! index-modulo share of the frames. No worker starts until the whole pool
//! exists, and the coordinator waits for every worker before returning,
//! whether the run succeeds, fails or is interrupted.

use crate::error::{AnimError, AnimResult};
use crate::scheduler::worker_indices;
use std::future::Future;
use std::sync::Arc;
use std::thread;
use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Frames rendered by each worker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PoolReport {
    pub per_worker: Vec<usize>,
}

impl PoolReport {
    pub fn frames_rendered(&self) -> usize {
        self.per_worker.iter().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Pool with `workers` workers (at least one).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// One worker per available core.
    pub fn with_available_parallelism() -> Self {
        Self::new(thread::available_parallelism().map_or(1, |n| n.get()))
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `job(worker, frame)` for every frame index below `frame_count`.
    ///
    /// Workers are held at a start gate until all of them have been spawned,
    /// and `shutdown` is only polled after the gate opens, so an interrupt
    /// raised while the pool is being created takes effect on the complete
    /// pool. When `shutdown` resolves, or when any job fails, all workers are
    /// cancelled and joined before the error is returned. A failure takes
    /// precedence over an interrupt.
    pub async fn run<J, S>(&self, frame_count: usize, job: J, shutdown: S) -> AnimResult<PoolReport>
    where
        J: Fn(usize, usize) -> AnimResult<()> + Send + Sync + 'static,
        S: Future<Output = ()>,
    {
        let job = Arc::new(job);
        let cancel = CancellationToken::new();
        let mut tasks = JoinSet::new();

        let mut gates = Vec::with_capacity(self.workers);
        for worker in 0..self.workers {
            let (open, gate) = oneshot::channel::<()>();
            gates.push(open);
            let job = Arc::clone(&job);
            let cancel = cancel.clone();
            let workers = self.workers;
            tasks.spawn_blocking(move || {
                if gate.blocking_recv().is_err() {
                    return (worker, Err(AnimError::Interrupted));
                }
                (worker, run_worker(worker, workers, frame_count, &*job, &cancel))
            });
        }
        for (worker, open) in gates.into_iter().enumerate() {
            if open.send(()).is_err() {
                warn!("[WorkerPool] worker {worker} exited before the pool started");
            }
        }
        info!(
            "[WorkerPool] {} workers started for {frame_count} frames",
            self.workers
        );

        tokio::pin!(shutdown);
        let mut per_worker = vec![0; self.workers];
        let mut failure: Option<AnimError> = None;
        let mut interrupted = false;

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown, if !interrupted => {
                    warn!("[WorkerPool] Interrupt received, stopping workers");
                    interrupted = true;
                    cancel.cancel();
                }
                joined = tasks.join_next() => {
                    let Some(joined) = joined else { break };
                    match joined {
                        Ok((worker, Ok(count))) => {
                            debug!("[WorkerPool] worker {worker} finished {count} frames");
                            per_worker[worker] = count;
                        }
                        Ok((worker, Err(AnimError::Interrupted))) => {
                            debug!("[WorkerPool] worker {worker} stopped");
                        }
                        Ok((worker, Err(e))) => {
                            error!("[WorkerPool] worker {worker} failed: {e}");
                            failure.get_or_insert(e);
                            cancel.cancel();
                        }
                        Err(e) => {
                            error!("[WorkerPool] worker task died: {e}");
                            failure.get_or_insert(AnimError::WorkerPanicked(e.to_string()));
                            cancel.cancel();
                        }
                    }
                }
            }
        }

        if let Some(failure) = failure {
            return Err(failure);
        }
        if interrupted {
            return Err(AnimError::Interrupted);
        }

        let report = PoolReport { per_worker };
        info!(
            "[WorkerPool] {} frames rendered",
            report.frames_rendered()
        );
        Ok(report)
    }
}

fn run_worker<J>(
    worker: usize,
    workers: usize,
    frame_count: usize,
    job: &J,
    cancel: &CancellationToken,
) -> AnimResult<usize>
where
    J: Fn(usize, usize) -> AnimResult<()>,
{
    let mut done = 0;
    for frame in worker_indices(worker, workers, frame_count) {
        if cancel.is_cancelled() {
            return Err(AnimError::Interrupted);
        }
        job(worker, frame).map_err(|e| AnimError::worker_failed(worker, frame, e))?;
        done += 1;
        debug!("[WorkerPool] worker {worker}: frame {}/{frame_count}", frame + 1);
    }
    Ok(done)
}
