/// AggregationOptions - Side effects to run after the report is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationOptions {
    /// Hand the finished report to the report repository
    pub persist: bool,
    /// Submit unknown packages for ingestion
    pub ingest_unknown: bool,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            persist: true,
            ingest_unknown: true,
        }
    }
}
