/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to reach external systems (graph service, license service, ingestion
/// pipeline, file system, console).
pub mod graph_repository;
pub mod license_scoring_service;
pub mod progress_reporter;
pub mod report_repository;
pub mod request_reader;
pub mod unknown_package_ingestor;

pub use graph_repository::{
    GraphGitHubRecord, GraphPackageRecord, GraphRepository, GraphVulnerabilityRecord,
};
pub use license_scoring_service::{
    ComponentLicenseAnalysis, ComponentLicenseReport, ComponentLicenseStatus,
    LicenseScoringPackage, LicenseScoringService, OrderedPairs, StackLicenseResponse,
    StackLicenseStatus,
};
pub use progress_reporter::ProgressReporter;
pub use report_repository::ReportRepository;
pub use request_reader::RequestReader;
pub use unknown_package_ingestor::UnknownPackageIngestor;
