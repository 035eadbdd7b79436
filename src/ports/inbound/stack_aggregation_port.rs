use crate::application::dto::{AggregationOptions, StackAggregatorRequest};
use crate::shared::Result;
use crate::stack_analysis::domain::StackReport;
use async_trait::async_trait;

/// StackAggregationPort - Inbound port for the stack aggregation use case
///
/// This port defines the interface that external adapters (CLI, workers)
/// use to trigger an aggregation. It represents the application's public API.
#[async_trait(?Send)]
pub trait StackAggregationPort {
    /// Builds the report for a request without side effects beyond the
    /// backing-service queries
    ///
    /// # Errors
    /// Returns an error if enrichment fails under the propagate policy or a
    /// graph record is malformed
    async fn process_request(&self, request: StackAggregatorRequest) -> Result<StackReport>;

    /// Builds the report, stamps the audit block, then persists the report
    /// and ingests unknown packages as requested by `options`
    ///
    /// # Errors
    /// Returns an error if `process_request` fails or persisting fails.
    /// Ingestion failures are logged and never returned.
    async fn execute(
        &self,
        request: StackAggregatorRequest,
        options: AggregationOptions,
    ) -> Result<StackReport>;
}
