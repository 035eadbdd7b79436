mod package_details_builder;

pub use package_details_builder::PackageDetailsBuilder;

use crate::application::dto::{AggregationSettings, EnrichmentFailurePolicy};
use crate::ports::outbound::{GraphRepository, ProgressReporter};
use crate::shared::error::AggregatorError;
use crate::shared::Result;
use crate::stack_analysis::domain::{NormalizedPackages, Package, PackageDetails};
use crate::stack_analysis::services::BatchPlanner;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// EnrichPackagesUseCase - Fetches details for every package of a stack
///
/// Splits the normalized packages into batches, queries the graph service
/// with up to `max_concurrent_batches` batches in flight and merges every
/// returned record into one lookup keyed by package identity. The merge
/// does not depend on the order in which batches complete.
///
/// # Type Parameters
/// * `G` - GraphRepository implementation
/// * `P` - ProgressReporter implementation
pub struct EnrichPackagesUseCase<'a, G, P> {
    graph_repository: &'a G,
    progress_reporter: &'a P,
    settings: &'a AggregationSettings,
}

impl<'a, G, P> EnrichPackagesUseCase<'a, G, P>
where
    G: GraphRepository,
    P: ProgressReporter,
{
    pub fn new(
        graph_repository: &'a G,
        progress_reporter: &'a P,
        settings: &'a AggregationSettings,
    ) -> Self {
        Self {
            graph_repository,
            progress_reporter,
            settings,
        }
    }

    /// Builds the details lookup for all packages of the stack
    ///
    /// Packages the graph does not know are absent from the lookup.
    ///
    /// # Errors
    /// Returns `GraphService` for a failed batch under the propagate policy
    /// (remaining in-flight batches are dropped), and `MalformedRecord` for a
    /// record that cannot be shaped into details.
    #[instrument(
        name = "enrich_packages",
        skip_all,
        fields(ecosystem = %packages.ecosystem(), packages = packages.all_dependencies().len())
    )]
    pub async fn enrich(
        &self,
        packages: &NormalizedPackages,
    ) -> Result<HashMap<Package, PackageDetails>> {
        let all = packages.all_dependencies();
        let mut details = HashMap::new();
        if all.is_empty() {
            return Ok(details);
        }

        let ecosystem = packages.ecosystem();
        let total_batches = BatchPlanner::batch_count(all.len(), self.settings.batch_size);
        let batches = BatchPlanner::partition(all, self.settings.batch_size)?;

        self.progress_reporter.report(&format!(
            "🔍 Fetching details for {} package(s) in {} batch(es)...",
            all.len(),
            total_batches
        ));

        let started = Instant::now();
        let graph_repository = self.graph_repository;
        let mut responses = stream::iter(batches.enumerate())
            .map(|(index, batch)| async move {
                let batch_started = Instant::now();
                let outcome = graph_repository
                    .fetch_package_records(ecosystem, batch)
                    .await;
                (index + 1, batch.len(), batch_started.elapsed(), outcome)
            })
            .buffer_unordered(self.settings.max_concurrent_batches.max(1));

        let builder = PackageDetailsBuilder::new(self.graph_repository, &self.settings.package_url);
        let mut completed = 0;

        while let Some((batch, batch_len, elapsed, outcome)) = responses.next().await {
            completed += 1;
            self.progress_reporter
                .report_progress(completed, total_batches, Some("graph batches"));

            let records = match outcome {
                Ok(records) => {
                    debug!(
                        batch,
                        packages = batch_len,
                        records = records.len(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        "graph batch completed"
                    );
                    records
                }
                Err(e) => {
                    let error = AggregatorError::GraphService {
                        batch,
                        details: format!("{:#}", e),
                    };
                    match self.settings.failure_policy {
                        EnrichmentFailurePolicy::Propagate => return Err(error.into()),
                        EnrichmentFailurePolicy::Degrade => {
                            warn!(
                                batch,
                                packages = batch_len,
                                error = %format!("{:#}", e),
                                "graph batch failed, its packages will be reported as unknown"
                            );
                            self.progress_reporter.report_error(&format!(
                                "⚠️  Warning: graph batch {} failed; {} package(s) treated as unknown",
                                batch, batch_len
                            ));
                            continue;
                        }
                    }
                }
            };

            for record in records {
                let (package, package_details) = builder.build(ecosystem, record).await?;
                details.insert(package, package_details);
            }
        }

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            total_results = details.len(),
            "package details fetched"
        );
        self.progress_reporter.report_completion(&format!(
            "✅ Found details for {} of {} package(s)",
            details.len(),
            all.len()
        ));

        Ok(details)
    }
}
