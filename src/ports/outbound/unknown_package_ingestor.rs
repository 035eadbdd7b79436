use crate::shared::Result;
use crate::stack_analysis::domain::{Ecosystem, Package};
use async_trait::async_trait;

/// UnknownPackageIngestor port for scheduling analysis of unseen packages
///
/// Packages the graph has no data for are handed to an ingestion pipeline
/// so they are known on later requests. Ingestion is fire-and-forget from
/// the aggregator's point of view: a failure never affects the report.
#[async_trait]
pub trait UnknownPackageIngestor: Send + Sync {
    /// Requests ingestion of a single package
    ///
    /// # Arguments
    /// * `ecosystem` - Ecosystem of the package
    /// * `package` - The unknown package
    ///
    /// # Errors
    /// Returns an error if the ingestion request could not be submitted
    async fn ingest(&self, ecosystem: Ecosystem, package: &Package) -> Result<()>;
}
