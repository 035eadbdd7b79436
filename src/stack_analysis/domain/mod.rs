pub mod license_analysis;
pub mod normalized_packages;
pub mod package;
pub mod package_details;
pub mod stack_report;
pub mod vulnerability;

pub use license_analysis::{
    ComponentConflict, ConflictPackages, LicenseAnalysis, LicenseOutlier, LicensePair,
    LicenseServiceStatus, ReallyUnknownLicense, UnknownLicenses,
};
pub use normalized_packages::NormalizedPackages;
pub use package::{Ecosystem, Package, PackageName, Version};
pub use package_details::{ActivityCounts, ActivitySummary, GitHubDetails, PackageDetails, UsedBy};
pub use stack_report::{Audit, RegistrationStatus, StackReport, REPORT_VERSION};
pub use vulnerability::{Severity, Vulnerability};
