//! Outcome aggregation.
//!
//! Worker tasks never share mutable state; each sends exactly one
//! [`TaskOutcome`] per source object over a channel, and a single collector
//! task owns the accumulating report. The report is final only after the
//! engine's join barrier.

use tokio::sync::mpsc::Receiver;

use crate::model::DiffOutcome;

/// What one worker task concluded about one source object.
#[derive(Debug)]
pub(crate) enum TaskOutcome {
    /// The object is missing from the target or its definition differs.
    Differs(DiffOutcome),
    /// Definitions matched after normalization; excluded from the output.
    Identical,
    /// A fetch failed; the object was reported and excluded.
    Skipped,
}

/// Aggregated result of one comparison run.
///
/// `outcomes.len() + identical + skipped == source_total`: every listed
/// source object is accounted for exactly once.
#[derive(Debug, Default)]
pub struct DiffReport {
    /// Differing objects, sorted by identity key.
    pub outcomes: Vec<DiffOutcome>,
    /// Number of objects listed in the source database.
    pub source_total: usize,
    /// Objects whose normalized definitions matched.
    pub identical: usize,
    /// Objects excluded because a fetch failed or timed out.
    pub skipped: usize,
}

impl DiffReport {
    /// Number of objects with differences.
    pub fn differing(&self) -> usize {
        self.outcomes.len()
    }
}

/// Drain the outcome channel until every worker has hung up, then sort for
/// deterministic output regardless of task completion order.
pub(crate) async fn collect(mut outcomes: Receiver<TaskOutcome>, source_total: usize) -> DiffReport {
    let mut report = DiffReport {
        source_total,
        ..DiffReport::default()
    };

    while let Some(outcome) = outcomes.recv().await {
        match outcome {
            TaskOutcome::Differs(outcome) => report.outcomes.push(outcome),
            TaskOutcome::Identical => report.identical += 1,
            TaskOutcome::Skipped => report.skipped += 1,
        }
    }

    report
        .outcomes
        .sort_by(|a, b| a.object.identity().cmp(&b.object.identity()));

    report
}
