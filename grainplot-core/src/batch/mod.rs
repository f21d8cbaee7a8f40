//! Batch rendering of frame directories
//!
//! Frames are independent, so a directory of `.xy` snapshots is rendered on
//! a pool of worker threads. A failing frame is recorded in the summary and
//! the rest of the batch keeps going unless `stop_on_error` is set.
//!
//! # Example
//!
//! ```rust,no_run
//! use grainplot::batch::{render_directory, BatchOptions};
//! use grainplot::{Bounds, RenderOptions};
//!
//! # fn main() -> grainplot::Result<()> {
//! let render = RenderOptions::new(Bounds::new(-10.0, 10.0, -5.0, 30.0)?);
//! let batch = BatchOptions::default()
//!     .with_workers(8)
//!     .with_progress(|progress| eprintln!("{progress}"));
//!
//! let summary = render_directory("./frames", render, batch)?;
//! print!("{summary}");
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use crate::render::RenderOptions;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

pub mod job;
pub mod progress;
pub mod result;
pub mod worker;

pub use job::BatchJob;
pub use progress::{BatchProgress, ProgressCallback, ProgressInfo};
pub use result::{BatchSummary, JobResult, Outcome};
pub use worker::{RunContext, WorkerPool};

/// Extension of frame files picked up by [`collect_frames`]
pub const FRAME_EXTENSION: &str = "xy";

/// Worker count used when the requested count is not positive and the CPU
/// count is unknown
pub const FALLBACK_PARALLELISM: usize = 2;

/// Turns a requested thread count into a usable one: positive values are
/// kept, anything else means one worker per logical CPU.
pub fn resolve_parallelism(requested: i64) -> usize {
    if requested > 0 {
        return requested as usize;
    }
    match num_cpus::get() {
        0 => FALLBACK_PARALLELISM,
        n => n,
    }
}

#[derive(Clone)]
pub struct BatchOptions {
    pub workers: usize,
    /// How often the progress callback fires while jobs run
    pub progress_interval: Duration,
    /// Skip the remaining jobs after the first failure
    pub stop_on_error: bool,
    pub on_progress: Option<Arc<dyn ProgressCallback>>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: resolve_parallelism(0),
            progress_interval: Duration::from_millis(250),
            stop_on_error: false,
            on_progress: None,
        }
    }
}

impl BatchOptions {
    /// Sets the worker count; zero is raised to one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Registers a callback that receives periodic snapshots and a final one
    /// once every job has finished.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ProgressInfo) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn stop_on_error(mut self, stop: bool) -> Self {
        self.stop_on_error = stop;
        self
    }
}

/// Queue of jobs run together on one [`WorkerPool`]
pub struct BatchProcessor {
    options: BatchOptions,
    jobs: Vec<BatchJob>,
    ctx: RunContext,
}

impl BatchProcessor {
    pub fn new(options: BatchOptions) -> Self {
        let ctx = RunContext::new(options.stop_on_error);
        Self {
            options,
            jobs: Vec::new(),
            ctx,
        }
    }

    pub fn add_job(&mut self, job: BatchJob) {
        self.ctx.progress.enqueue();
        self.jobs.push(job);
    }

    pub fn add_jobs(&mut self, jobs: impl IntoIterator<Item = BatchJob>) {
        for job in jobs {
            self.add_job(job);
        }
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Flag shared with the workers. Setting it lets running jobs finish and
    /// skips everything still queued.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.ctx.cancelled)
    }

    pub fn cancel(&self) {
        self.ctx.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.ctx.cancelled.load(Ordering::SeqCst)
    }

    pub fn progress(&self) -> ProgressInfo {
        self.ctx.progress.snapshot()
    }

    /// Runs every queued job and blocks until all have finished or been
    /// skipped.
    pub fn execute(self) -> BatchSummary {
        let started = Instant::now();
        let BatchProcessor { options, jobs, ctx } = self;
        if jobs.is_empty() {
            return BatchSummary::empty();
        }

        let pool = WorkerPool::new(options.workers.min(jobs.len()));
        info!(jobs = jobs.len(), workers = pool.size(), "starting batch");

        let finished = AtomicBool::new(false);
        let results = thread::scope(|scope| {
            if let Some(callback) = &options.on_progress {
                let (ctx, finished) = (&ctx, &finished);
                let interval = options.progress_interval;
                scope.spawn(move || {
                    while !finished.load(Ordering::SeqCst) && !ctx.cancelled.load(Ordering::SeqCst) {
                        let info = ctx.progress.snapshot();
                        if info.is_complete() {
                            break;
                        }
                        callback.on_progress(&info);
                        thread::sleep(interval);
                    }
                });
            }

            let results = pool.run(jobs, &ctx);
            finished.store(true, Ordering::SeqCst);
            results
        });

        if let Some(callback) = &options.on_progress {
            callback.on_progress(&ctx.progress.snapshot());
        }

        let summary = BatchSummary::from_results(
            results,
            ctx.cancelled.load(Ordering::SeqCst),
            started.elapsed(),
        );
        info!(
            rendered = summary.rendered,
            failed = summary.failed,
            skipped = summary.skipped,
            elapsed = ?summary.duration,
            "batch finished"
        );
        summary
    }
}

/// Lists the `.xy` files directly inside `dir`, sorted by path.
pub fn collect_frames<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut frames = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == FRAME_EXTENSION) {
            frames.push(path);
        }
    }
    frames.sort();
    Ok(frames)
}

/// Renders every frame in `dir` to a PNG beside it.
pub fn render_directory<P: AsRef<Path>>(
    dir: P,
    render: RenderOptions,
    options: BatchOptions,
) -> Result<BatchSummary> {
    let dir = dir.as_ref();
    let frames = collect_frames(dir)?;
    info!(dir = %dir.display(), frames = frames.len(), "collected frames");

    let render = Arc::new(render);
    let mut processor = BatchProcessor::new(options);
    processor.add_jobs(
        frames
            .iter()
            .map(|frame| BatchJob::render(frame, Arc::clone(&render))),
    );

    Ok(processor.execute())
}

/// Runs `operation` once per file on the worker pool.
pub fn batch_process_files<P, F>(files: Vec<P>, operation: F, options: BatchOptions) -> BatchSummary
where
    P: AsRef<Path>,
    F: Fn(&Path) -> Result<()> + Clone + Send + 'static,
{
    let mut processor = BatchProcessor::new(options);
    processor.add_jobs(files.into_iter().map(|file| {
        let path = file.as_ref().to_path_buf();
        let operation = operation.clone();
        BatchJob::Custom {
            name: format!("Process {}", path.display()),
            operation: Box::new(move || operation(&path)),
        }
    }));
    processor.execute()
}
