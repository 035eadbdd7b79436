/// ProgressReporter port for user feedback during an aggregation
///
/// Structured diagnostics go through `tracing`; this port only drives the
/// interactive feedback (stage messages and the batch progress bar).
pub trait ProgressReporter {
    /// Reports a stage message
    fn report(&self, message: &str);

    /// Reports progress over a known number of steps
    ///
    /// # Arguments
    /// * `current` - Steps completed so far
    /// * `total` - Total expected steps
    /// * `message` - Optional label shown next to the bar
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a recoverable problem
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
