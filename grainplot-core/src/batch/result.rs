//! Per-frame outcomes and the batch report

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Done {
        elapsed: Duration,
        outputs: Vec<PathBuf>,
    },
    Failed {
        elapsed: Duration,
        error: String,
    },
    /// Never started because the batch was cancelled first
    Skipped,
}

/// What happened to one job
#[derive(Debug, Clone, PartialEq)]
pub struct JobResult {
    pub name: String,
    pub outcome: Outcome,
}

impl JobResult {
    pub fn done(name: impl Into<String>, elapsed: Duration, outputs: Vec<PathBuf>) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Done { elapsed, outputs },
        }
    }

    pub fn failed(name: impl Into<String>, elapsed: Duration, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Failed {
                elapsed,
                error: error.into(),
            },
        }
    }

    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Skipped,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Done { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        self.outcome == Outcome::Skipped
    }

    /// Wall time of the job, if it ran
    pub fn elapsed(&self) -> Option<Duration> {
        match self.outcome {
            Outcome::Done { elapsed, .. } | Outcome::Failed { elapsed, .. } => Some(elapsed),
            Outcome::Skipped => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn outputs(&self) -> &[PathBuf] {
        match &self.outcome {
            Outcome::Done { outputs, .. } => outputs,
            _ => &[],
        }
    }
}

impl fmt::Display for JobResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Done { elapsed, .. } => {
                write!(f, "{}: done in {:.2}s", self.name, elapsed.as_secs_f64())
            }
            Outcome::Failed { elapsed, error } => write!(
                f,
                "{}: failed after {:.2}s: {error}",
                self.name,
                elapsed.as_secs_f64()
            ),
            Outcome::Skipped => write!(f, "{}: skipped", self.name),
        }
    }
}

/// Counts and per-job results of a finished batch. `Display` renders the
/// report printed by the CLI.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub total: usize,
    pub rendered: usize,
    pub failed: usize,
    pub skipped: usize,
    pub cancelled: bool,
    pub duration: Duration,
    /// In submission order
    pub results: Vec<JobResult>,
}

impl BatchSummary {
    pub fn from_results(results: Vec<JobResult>, cancelled: bool, duration: Duration) -> Self {
        let count = |pred: fn(&JobResult) -> bool| results.iter().filter(|r| pred(r)).count();
        Self {
            total: results.len(),
            rendered: count(JobResult::is_success),
            failed: count(JobResult::is_failed),
            skipped: count(JobResult::is_skipped),
            cancelled,
            duration,
            results,
        }
    }

    pub fn empty() -> Self {
        Self::from_results(Vec::new(), false, Duration::ZERO)
    }

    /// Share of jobs that succeeded, 0.0 - 100.0
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.rendered as f64 * 100.0 / self.total as f64
    }

    pub fn all_successful(&self) -> bool {
        self.rendered == self.total
    }

    /// Mean wall time over the jobs that ran
    pub fn average_duration(&self) -> Option<Duration> {
        let ran: Vec<Duration> = self.results.iter().filter_map(JobResult::elapsed).collect();
        if ran.is_empty() {
            return None;
        }
        Some(ran.iter().sum::<Duration>() / ran.len() as u32)
    }

    pub fn output_files(&self) -> Vec<&PathBuf> {
        self.results.iter().flat_map(JobResult::outputs).collect()
    }

    /// `(job name, error)` for every failure
    pub fn errors(&self) -> Vec<(&str, &str)> {
        self.results
            .iter()
            .filter_map(|r| r.error().map(|e| (r.name.as_str(), e)))
            .collect()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rendered {}/{} frames ({:.1}%) in {:.2}s",
            self.rendered,
            self.total,
            self.success_rate(),
            self.duration.as_secs_f64()
        )?;
        if let Some(avg) = self.average_duration() {
            write!(f, ", {:.3}s per frame", avg.as_secs_f64())?;
        }
        writeln!(f)?;

        let errors = self.errors();
        if !errors.is_empty() {
            writeln!(f, "Failed {}:", errors.len())?;
            for (name, error) in errors {
                writeln!(f, "  {name}: {error}")?;
            }
        }

        if self.cancelled {
            writeln!(f, "Cancelled, {} skipped", self.skipped)?;
        }
        Ok(())
    }
}
