use crate::application::dto::{AggregationOptions, AggregationSettings, StackAggregatorRequest};
use crate::application::use_cases::{
    AnalyzeLicensesUseCase, EnrichPackagesUseCase, IngestUnknownPackagesUseCase,
};
use crate::ports::inbound::StackAggregationPort;
use crate::ports::outbound::{
    GraphRepository, LicenseScoringService, ProgressReporter, ReportRepository,
    UnknownPackageIngestor,
};
use crate::shared::Result;
use crate::stack_analysis::domain::{Audit, NormalizedPackages, StackReport};
use crate::stack_analysis::services::Denormalizer;
use async_trait::async_trait;
use std::fmt;
use tracing::{debug, info, instrument};

/// Pipeline stages of one aggregation, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationStage {
    BuildingGraph,
    Enriching,
    Denormalizing,
    AggregatingLicenses,
    Done,
}

impl fmt::Display for AggregationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AggregationStage::BuildingGraph => "building-graph",
            AggregationStage::Enriching => "enriching",
            AggregationStage::Denormalizing => "denormalizing",
            AggregationStage::AggregatingLicenses => "aggregating-licenses",
            AggregationStage::Done => "done",
        };
        f.write_str(label)
    }
}

fn audit_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// AggregateStackUseCase - Core use case for stack aggregation
///
/// Orchestrates normalization, enrichment, denormalization and license
/// aggregation, then runs the side effects selected by
/// `AggregationOptions`. All infrastructure is injected generically.
///
/// # Type Parameters
/// * `G` - GraphRepository implementation
/// * `L` - LicenseScoringService implementation
/// * `I` - UnknownPackageIngestor implementation (optional)
/// * `R` - ReportRepository implementation
/// * `P` - ProgressReporter implementation
pub struct AggregateStackUseCase<G, L, I, R, P> {
    graph_repository: G,
    license_service: L,
    ingestor: Option<I>,
    report_repository: R,
    progress_reporter: P,
    settings: AggregationSettings,
}

impl<G, L, I, R, P> AggregateStackUseCase<G, L, I, R, P>
where
    G: GraphRepository,
    L: LicenseScoringService,
    I: UnknownPackageIngestor,
    R: ReportRepository,
    P: ProgressReporter,
{
    /// Creates a new AggregateStackUseCase with injected dependencies
    pub fn new(
        graph_repository: G,
        license_service: L,
        ingestor: Option<I>,
        report_repository: R,
        progress_reporter: P,
        settings: AggregationSettings,
    ) -> Self {
        Self {
            graph_repository,
            license_service,
            ingestor,
            report_repository,
            progress_reporter,
            settings,
        }
    }

    /// Builds the stack report for a request
    ///
    /// # Arguments
    /// * `request` - Validated request envelope
    ///
    /// # Returns
    /// The report without an audit block
    #[instrument(
        skip_all,
        fields(external_request_id = %request.external_request_id, ecosystem = %request.ecosystem)
    )]
    pub async fn process_request(&self, request: StackAggregatorRequest) -> Result<StackReport> {
        request.validate()?;

        self.enter(AggregationStage::BuildingGraph);
        let normalized = NormalizedPackages::new(&request.packages, request.ecosystem);
        self.progress_reporter.report(&format!(
            "📊 Normalized {} direct and {} transitive package(s)",
            normalized.direct_dependencies().len(),
            normalized.transitive_dependencies().len()
        ));

        self.enter(AggregationStage::Enriching);
        let details = EnrichPackagesUseCase::new(
            &self.graph_repository,
            &self.progress_reporter,
            &self.settings,
        )
        .enrich(&normalized)
        .await?;

        self.enter(AggregationStage::Denormalizing);
        let analyzed_dependencies =
            Denormalizer::denormalize(&normalized, &details, request.show_transitive);
        let unknown_dependencies = Denormalizer::unknown_packages(&normalized, &details);

        self.enter(AggregationStage::AggregatingLicenses);
        let license_analysis = AnalyzeLicensesUseCase::new(&self.license_service)
            .analyze(&normalized, &details)
            .await;

        self.enter(AggregationStage::Done);
        info!(
            analyzed = analyzed_dependencies.len(),
            unknown = unknown_dependencies.len(),
            "stack aggregated"
        );

        Ok(StackReport {
            audit: None,
            uuid: request.uuid,
            external_request_id: request.external_request_id,
            registration_status: request.registration_status,
            manifest_file_path: request.manifest_file_path,
            manifest_name: request.manifest_file,
            ecosystem: request.ecosystem,
            analyzed_dependencies,
            unknown_dependencies,
            license_analysis,
            registration_link: self.settings.registration_link.clone(),
        })
    }

    /// Executes the full aggregation workflow
    ///
    /// Builds the report, stamps the audit block, persists the report when
    /// `options.persist` is set, then submits unknown packages for ingestion
    /// when `options.ingest_unknown` is set and an ingestor is configured.
    ///
    /// # Errors
    /// Returns an error if the report cannot be built or persisted.
    /// Ingestion failures are only logged.
    pub async fn execute(
        &self,
        request: StackAggregatorRequest,
        options: AggregationOptions,
    ) -> Result<StackReport> {
        let started_at = audit_timestamp();
        let mut report = self.process_request(request).await?;
        report.audit = Some(Audit::new(started_at, audit_timestamp()));

        if options.persist {
            self.report_repository.persist(&report)?;
            info!(
                external_request_id = %report.external_request_id,
                "aggregation completed, report persisted"
            );
        }

        if options.ingest_unknown && !report.unknown_dependencies.is_empty() {
            match &self.ingestor {
                Some(ingestor) => {
                    let summary = IngestUnknownPackagesUseCase::new(ingestor)
                        .ingest(report.ecosystem, &report.unknown_dependencies)
                        .await;
                    if summary.failed > 0 {
                        self.progress_reporter.report_error(&format!(
                            "⚠️  Warning: ingestion failed for {} unknown package(s)",
                            summary.failed
                        ));
                    }
                }
                None => debug!("no ingestion endpoint configured, skipping unknown packages"),
            }
        }

        self.progress_reporter.report_completion(&format!(
            "✅ Analyzed {} direct dependencies ({} unknown package(s))",
            report.analyzed_dependencies.len(),
            report.unknown_dependencies.len()
        ));

        Ok(report)
    }

    fn enter(&self, stage: AggregationStage) {
        debug!(%stage, "entering stage");
    }
}

#[async_trait(?Send)]
impl<G, L, I, R, P> StackAggregationPort for AggregateStackUseCase<G, L, I, R, P>
where
    G: GraphRepository,
    L: LicenseScoringService,
    I: UnknownPackageIngestor,
    R: ReportRepository,
    P: ProgressReporter,
{
    async fn process_request(&self, request: StackAggregatorRequest) -> Result<StackReport> {
        AggregateStackUseCase::process_request(self, request).await
    }

    async fn execute(
        &self,
        request: StackAggregatorRequest,
        options: AggregationOptions,
    ) -> Result<StackReport> {
        AggregateStackUseCase::execute(self, request, options).await
    }
}
