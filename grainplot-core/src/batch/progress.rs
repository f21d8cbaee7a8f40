//! Frame counters shared by the workers, and the snapshots handed to
//! progress callbacks.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Point-in-time view of a running batch
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressInfo {
    pub total: usize,
    pub rendered: usize,
    pub failed: usize,
    /// Frames a worker has picked up but not finished
    pub in_flight: usize,
    pub elapsed: Duration,
}

impl ProgressInfo {
    /// Frames finished either way
    pub fn processed(&self) -> usize {
        self.rendered + self.failed
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.processed())
    }

    /// 0.0 - 100.0; an empty batch counts as done.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.processed() as f64 * 100.0 / self.total as f64
    }

    pub fn is_complete(&self) -> bool {
        self.processed() >= self.total
    }

    pub fn frames_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.processed() as f64 / secs
        } else {
            0.0
        }
    }

    /// Time left at the current rate. `None` until a frame has finished.
    pub fn eta(&self) -> Option<Duration> {
        let rate = self.frames_per_second();
        (self.processed() > 0 && rate > 0.0)
            .then(|| Duration::from_secs_f64(self.remaining() as f64 / rate))
    }
}

impl fmt::Display for ProgressInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} frames ({:.1}%)",
            self.processed(),
            self.total,
            self.percentage()
        )?;
        if self.in_flight > 0 {
            write!(f, ", {} in flight", self.in_flight)?;
        }
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        Ok(())
    }
}

/// Lock-free frame counters
#[derive(Debug)]
pub struct BatchProgress {
    total: AtomicUsize,
    rendered: AtomicUsize,
    failed: AtomicUsize,
    in_flight: AtomicUsize,
    started: Instant,
}

impl Default for BatchProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProgress {
    pub fn new() -> Self {
        Self {
            total: AtomicUsize::new(0),
            rendered: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }

    pub fn enqueue(&self) {
        self.total.fetch_add(1, Ordering::SeqCst);
    }

    pub fn begin(&self) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
    }

    /// Moves one in-flight frame to rendered or failed.
    pub fn finish(&self, success: bool) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let counter = if success { &self.rendered } else { &self.failed };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ProgressInfo {
        ProgressInfo {
            total: self.total.load(Ordering::SeqCst),
            rendered: self.rendered.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            in_flight: self.in_flight.load(Ordering::SeqCst),
            elapsed: self.started.elapsed(),
        }
    }
}

/// Receives progress snapshots while a batch runs
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, info: &ProgressInfo);
}

impl<F> ProgressCallback for F
where
    F: Fn(&ProgressInfo) + Send + Sync,
{
    fn on_progress(&self, info: &ProgressInfo) {
        self(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn info(total: usize, rendered: usize, failed: usize, secs: u64) -> ProgressInfo {
        ProgressInfo {
            total,
            rendered,
            failed,
            in_flight: 2,
            elapsed: Duration::from_secs(secs),
        }
    }

    #[test]
    fn test_percentage_and_display() {
        let info = info(100, 25, 5, 12);

        assert_eq!(info.processed(), 30);
        assert_eq!(info.remaining(), 70);
        assert_eq!(info.percentage(), 30.0);
        assert!(!info.is_complete());
        assert_eq!(
            info.to_string(),
            "30/100 frames (30.0%), 2 in flight, 5 failed"
        );
    }

    #[test]
    fn test_display_omits_zero_counts() {
        let info = ProgressInfo {
            in_flight: 0,
            ..info(4, 4, 0, 1)
        };
        assert_eq!(info.to_string(), "4/4 frames (100.0%)");
    }

    #[test]
    fn test_eta() {
        // 50 frames in 20s is 2.5 fps; 50 left takes another 20s
        let info = info(100, 40, 10, 20);
        assert_eq!(info.frames_per_second(), 2.5);
        assert_eq!(info.eta(), Some(Duration::from_secs(20)));

        assert_eq!(self::info(100, 0, 0, 20).eta(), None);
        assert_eq!(self::info(100, 5, 0, 0).eta(), None);
    }

    #[test]
    fn test_empty_batch_is_complete() {
        let info = info(0, 0, 0, 0);
        assert_eq!(info.percentage(), 100.0);
        assert!(info.is_complete());
    }

    #[test]
    fn test_counters() {
        let progress = BatchProgress::new();
        for _ in 0..3 {
            progress.enqueue();
        }

        progress.begin();
        progress.begin();
        progress.finish(true);
        progress.finish(false);
        progress.begin();

        let info = progress.snapshot();
        assert_eq!(
            (info.total, info.rendered, info.failed, info.in_flight),
            (3, 1, 1, 1)
        );
        assert!(!info.is_complete());
    }

    #[test]
    fn test_closure_callback() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);
        let callback = move |info: &ProgressInfo| {
            seen_clone.store(info.total, Ordering::SeqCst);
        };

        callback.on_progress(&info(7, 0, 0, 0));
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }
}
