//! Fixed-size thread pool that drains a shared job queue

use crate::batch::{BatchJob, BatchProgress, JobResult};
use crate::error::GrainError;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Instant;
use tracing::{debug, warn};

/// State every worker shares for one run
#[derive(Debug, Clone)]
pub struct RunContext {
    pub progress: Arc<BatchProgress>,
    /// Once set, queued jobs are skipped instead of run
    pub cancelled: Arc<AtomicBool>,
    pub stop_on_error: bool,
}

impl RunContext {
    pub fn new(stop_on_error: bool) -> Self {
        Self {
            progress: Arc::new(BatchProgress::new()),
            cancelled: Arc::new(AtomicBool::new(false)),
            stop_on_error,
        }
    }

    fn run(&self, job: BatchJob) -> JobResult {
        let name = job.display_name();
        if self.cancelled.load(Ordering::SeqCst) {
            return JobResult::skipped(name);
        }

        self.progress.begin();
        let start = Instant::now();
        // a panicking job counts as a failure and the worker keeps going
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| job.execute()))
            .unwrap_or_else(|payload| Err(GrainError::job_panicked(payload)));
        let elapsed = start.elapsed();
        self.progress.finish(outcome.is_ok());

        match outcome {
            Ok(outputs) => {
                debug!(job = %name, ?elapsed, "job done");
                JobResult::done(name, elapsed, outputs)
            }
            Err(e) => {
                warn!(job = %name, error = %e, "job failed");
                if self.stop_on_error {
                    self.cancelled.store(true, Ordering::SeqCst);
                }
                JobResult::failed(name, elapsed, e.to_string())
            }
        }
    }
}

type Queue = Arc<Mutex<mpsc::Receiver<(usize, BatchJob)>>>;

pub struct WorkerPool {
    size: usize,
}

impl WorkerPool {
    /// A pool of `size` threads, at least one
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs every job and returns one result per job, in submission order.
    /// Threads are spawned for this call and joined before it returns.
    pub fn run(&self, jobs: Vec<BatchJob>, ctx: &RunContext) -> Vec<JobResult> {
        let total = jobs.len();
        let (job_tx, job_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        for entry in jobs.into_iter().enumerate() {
            // the receiver is alive until the workers start, so this cannot fail
            let _ = job_tx.send(entry);
        }
        drop(job_tx);

        let queue: Queue = Arc::new(Mutex::new(job_rx));
        let handles: Vec<_> = (0..self.size.min(total.max(1)))
            .map(|id| {
                let queue = Arc::clone(&queue);
                let results = result_tx.clone();
                let ctx = ctx.clone();
                thread::spawn(move || drain(id, &queue, &ctx, &results))
            })
            .collect();
        drop(result_tx);

        for (id, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                warn!(worker = id, "worker thread panicked");
            }
        }

        let mut slots: Vec<Option<JobResult>> = vec![None; total];
        for (idx, result) in result_rx {
            slots[idx] = Some(result);
        }
        slots.into_iter().flatten().collect()
    }
}

fn drain(id: usize, queue: &Queue, ctx: &RunContext, results: &mpsc::Sender<(usize, JobResult)>) {
    loop {
        let next = match queue.lock() {
            Ok(rx) => rx.recv(),
            Err(poisoned) => poisoned.into_inner().recv(),
        };
        let Ok((idx, job)) = next else {
            debug!(worker = id, "queue drained");
            return;
        };
        if results.send((idx, ctx.run(job))).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(name: &str, ok: bool) -> BatchJob {
        BatchJob::Custom {
            name: name.to_string(),
            operation: Box::new(move || {
                if ok {
                    Ok(())
                } else {
                    Err(GrainError::InvalidBounds("Test error".to_string()))
                }
            }),
        }
    }

    fn enqueued(ctx: &RunContext, jobs: Vec<BatchJob>) -> Vec<BatchJob> {
        for _ in &jobs {
            ctx.progress.enqueue();
        }
        jobs
    }

    #[test]
    fn test_pool_has_at_least_one_worker() {
        assert_eq!(WorkerPool::new(0).size(), 1);
        assert_eq!(WorkerPool::new(3).size(), 3);
    }

    #[test]
    fn test_empty_run() {
        let results = WorkerPool::new(2).run(vec![], &RunContext::new(false));
        assert!(results.is_empty());
    }

    #[test]
    fn test_results_keep_submission_order() {
        let ctx = RunContext::new(false);
        let jobs = enqueued(
            &ctx,
            (0..16).map(|i| custom(&format!("job {i}"), true)).collect(),
        );

        let results = WorkerPool::new(4).run(jobs, &ctx);

        assert_eq!(results.len(), 16);
        for (i, result) in results.iter().enumerate() {
            assert!(result.is_success());
            assert_eq!(result.name, format!("job {i}"));
        }
        assert!(ctx.progress.snapshot().is_complete());
    }

    #[test]
    fn test_failures_are_counted() {
        let ctx = RunContext::new(false);
        let jobs = enqueued(&ctx, vec![custom("good", true), custom("bad", false)]);

        let results = WorkerPool::new(1).run(jobs, &ctx);

        assert!(results[0].is_success());
        assert_eq!(results[1].error(), Some("Invalid bounds: Test error"));

        let info = ctx.progress.snapshot();
        assert_eq!((info.rendered, info.failed, info.in_flight), (1, 1, 0));
    }

    #[test]
    fn test_panicking_job_is_recorded_as_failure() {
        let ctx = RunContext::new(false);
        let exploding = BatchJob::Custom {
            name: "exploding".to_string(),
            operation: Box::new(|| panic!("bad frame data")),
        };
        let jobs = enqueued(
            &ctx,
            vec![custom("before", true), exploding, custom("after", true)],
        );

        // a single worker must survive the panic to reach the last job
        let results = WorkerPool::new(1).run(jobs, &ctx);

        assert_eq!(results.len(), 3);
        assert!(results[0].is_success());
        assert!(results[1].is_failed());
        assert_eq!(results[1].error(), Some("Job panicked: bad frame data"));
        assert!(results[2].is_success());

        let info = ctx.progress.snapshot();
        assert_eq!((info.rendered, info.failed, info.in_flight), (2, 1, 0));
    }

    #[test]
    fn test_stop_on_error_skips_the_rest() {
        let ctx = RunContext::new(true);
        // one worker takes jobs in order, so everything after the failure
        // is skipped
        let jobs = vec![
            custom("first", true),
            custom("broken", false),
            custom("third", true),
            custom("fourth", true),
        ];

        let results = WorkerPool::new(1).run(jobs, &ctx);

        assert!(results[0].is_success());
        assert!(results[1].is_failed());
        assert!(results[2].is_skipped());
        assert!(results[3].is_skipped());
        assert!(ctx.cancelled.load(Ordering::SeqCst));
    }

    #[test]
    fn test_cancelled_before_start() {
        let ctx = RunContext::new(false);
        ctx.cancelled.store(true, Ordering::SeqCst);

        let results = WorkerPool::new(2).run(vec![custom("never", true)], &ctx);

        assert_eq!(results.len(), 1);
        assert!(results[0].is_skipped());
    }
}
