use serde::Serialize;
use std::fmt;

use crate::model::AuditReport;

/// Pass rate over applicable tests, as a percentage rounded to two decimals.
///
/// Always derived from a report on demand; never stored alongside it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// `passes / (tests_run - inapplicable) * 100`.
///
/// When no test applied (`tests_run <= inapplicable`) the score is 0.
pub fn calculate(passes: usize, tests_run: usize, inapplicable: usize) -> Score {
    let applicable = tests_run.saturating_sub(inapplicable);
    if applicable == 0 {
        return Score(0.0);
    }

    let pct = passes as f64 / applicable as f64 * 100.0;
    let pct = pct.clamp(0.0, 100.0);
    Score((pct * 100.0).round() / 100.0)
}

pub fn score_report(report: &AuditReport) -> Score {
    calculate(
        report.passes.len(),
        report.tests_run.len(),
        report.inapplicable.len(),
    )
}
