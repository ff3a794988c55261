use std::path::PathBuf;

use pitwall_model::RunReport;

/// Outcome of `pitwall features`, for the summary printout.
#[derive(Debug, Clone)]
pub struct FeaturesResult {
    pub report: RunReport,
    pub window: usize,
    pub normalized: bool,
    pub written: Vec<PathBuf>,
}

impl FeaturesResult {
    pub fn has_issues(&self) -> bool {
        self.report.has_issues()
    }
}
