use stack_aggregator::prelude::*;
use std::sync::{Arc, Mutex};

/// Mock ReportRepository keeping persisted reports in memory
#[derive(Default, Clone)]
pub struct MockReportRepository {
    pub reports: Arc<Mutex<Vec<StackReport>>>,
}

impl MockReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn persisted(&self) -> Vec<StackReport> {
        self.reports.lock().unwrap().clone()
    }
}

impl ReportRepository for MockReportRepository {
    fn persist(&self, report: &StackReport) -> Result<()> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}
