//! stack-aggregator - Stack analysis aggregator
//!
//! This library takes a dependency stack (direct packages with their
//! transitive dependencies), enriches every package with vulnerability,
//! version and repository data from a graph service, asks a license
//! scoring service for a stack license verdict, and produces a single
//! report. It follows hexagonal architecture and Domain-Driven Design
//! principles.
//!
//! # Architecture
//!
//! - **Domain Layer** (`stack_analysis`): Pure domain models and services
//!   (normalization, denormalization, version selection, batching)
//! - **Application Layer** (`application`): Use cases and DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use stack_aggregator::prelude::*;
//! use std::path::Path;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<()> {
//! let timeout = Duration::from_secs(30);
//! let use_case = AggregateStackUseCase::new(
//!     GremlinGraphClient::new("http://localhost:8182", timeout, 3)?,
//!     LicenseScoringClient::new("http://localhost:6162", timeout, 3)?,
//!     None::<IngestionClient>,
//!     StdoutReportWriter::new(),
//!     StderrProgressReporter::new(),
//!     AggregationSettings::default(),
//! );
//!
//! let request = FileSystemReader::new().read_request(Path::new("stack.json"))?;
//! let report = use_case.execute(request, AggregationOptions::default()).await?;
//! println!("{} unknown package(s)", report.unknown_dependencies.len());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod ports;
pub mod shared;
pub mod stack_analysis;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemReportWriter, StdoutReportWriter,
    };
    pub use crate::adapters::outbound::network::{
        CachingGraphRepository, GremlinGraphClient, IngestionClient, LicenseScoringClient,
    };
    pub use crate::application::dto::{
        AggregationOptions, AggregationSettings, EnrichmentFailurePolicy, StackAggregatorRequest,
    };
    pub use crate::application::use_cases::AggregateStackUseCase;
    pub use crate::ports::inbound::StackAggregationPort;
    pub use crate::ports::outbound::{
        GraphRepository, LicenseScoringService, ProgressReporter, ReportRepository,
        RequestReader, UnknownPackageIngestor,
    };
    pub use crate::stack_analysis::domain::{
        Ecosystem, LicenseAnalysis, NormalizedPackages, Package, PackageDetails, StackReport,
    };
    pub use crate::shared::Result;
}
