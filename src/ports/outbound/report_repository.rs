use crate::shared::Result;
use crate::stack_analysis::domain::StackReport;

/// ReportRepository port for persisting finished stack reports
///
/// This port abstracts where reports end up (file, stdout, database).
pub trait ReportRepository {
    /// Persists a finished report
    ///
    /// # Arguments
    /// * `report` - The report, audit block included
    ///
    /// # Errors
    /// Returns an error if the report cannot be serialized or written
    fn persist(&self, report: &StackReport) -> Result<()>;
}

impl<T: ReportRepository + ?Sized> ReportRepository for Box<T> {
    fn persist(&self, report: &StackReport) -> Result<()> {
        (**self).persist(report)
    }
}
