use crate::ports::outbound::UnknownPackageIngestor;
use crate::shared::error::AggregatorError;
use crate::stack_analysis::domain::{Ecosystem, Package};
use futures::stream::{self, StreamExt};
use tracing::{error, info, instrument};

/// Maximum number of ingestion requests in flight
const MAX_CONCURRENT_INGESTIONS: usize = 4;

/// Outcome of one ingestion round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionSummary {
    pub submitted: usize,
    pub failed: usize,
}

/// IngestUnknownPackagesUseCase - Schedules analysis of unseen packages
///
/// Every package is submitted independently: one failure is logged and the
/// remaining packages are still submitted. Nothing here can fail the
/// aggregation.
///
/// # Type Parameters
/// * `I` - UnknownPackageIngestor implementation
pub struct IngestUnknownPackagesUseCase<'a, I> {
    ingestor: &'a I,
}

impl<'a, I: UnknownPackageIngestor> IngestUnknownPackagesUseCase<'a, I> {
    pub fn new(ingestor: &'a I) -> Self {
        Self { ingestor }
    }

    #[instrument(name = "ingest_unknown_packages", skip_all, fields(ecosystem = %ecosystem, packages = packages.len()))]
    pub async fn ingest(&self, ecosystem: Ecosystem, packages: &[Package]) -> IngestionSummary {
        let ingestor = self.ingestor;
        let outcomes: Vec<bool> = stream::iter(packages)
            .map(|package| async move {
                match ingestor.ingest(ecosystem, package).await {
                    Ok(()) => true,
                    Err(e) => {
                        let failure = AggregatorError::Ingestion {
                            ecosystem: ecosystem.to_string(),
                            name: package.name().to_string(),
                            version: package.version().to_string(),
                            details: format!("{:#}", e),
                        };
                        error!(error = %failure, "ingestion failed");
                        false
                    }
                }
            })
            .buffer_unordered(MAX_CONCURRENT_INGESTIONS)
            .collect()
            .await;

        let failed = outcomes.iter().filter(|ok| !**ok).count();
        let summary = IngestionSummary {
            submitted: outcomes.len() - failed,
            failed,
        };
        info!(submitted = summary.submitted, failed = summary.failed, "unknown package ingestion finished");
        summary
    }
}
