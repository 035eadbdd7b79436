/// Use cases module containing application business logic orchestration
mod aggregate_stack;
mod analyze_licenses;
mod enrich_packages;
mod ingest_unknown_packages;

pub use aggregate_stack::{AggregateStackUseCase, AggregationStage};
pub use analyze_licenses::AnalyzeLicensesUseCase;
pub use enrich_packages::{EnrichPackagesUseCase, PackageDetailsBuilder};
pub use ingest_unknown_packages::{IngestUnknownPackagesUseCase, IngestionSummary};
