/// Mock implementations for testing
mod mock_graph_repository;
mod mock_ingestor;
mod mock_license_service;
mod mock_progress_reporter;
mod mock_report_repository;

pub use mock_graph_repository::MockGraphRepository;
pub use mock_ingestor::MockIngestor;
pub use mock_license_service::MockLicenseService;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_report_repository::MockReportRepository;
