use serde::{Deserialize, Serialize};

/// A package whose declared license could not be classified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReallyUnknownLicense {
    pub package: String,
    pub license: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensePair {
    pub license1: String,
    pub license2: String,
}

/// A package that declares mutually incompatible licenses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentConflict {
    pub package: String,
    pub conflict_licenses: Vec<LicensePair>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownLicenses {
    pub really_unknown: Vec<ReallyUnknownLicense>,
    pub component_conflict: Vec<ComponentConflict>,
}

impl UnknownLicenses {
    pub fn is_empty(&self) -> bool {
        self.really_unknown.is_empty() && self.component_conflict.is_empty()
    }
}

/// Two packages whose licenses conflict with each other
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictPackages {
    pub package1: String,
    pub license1: String,
    pub package2: String,
    pub license2: String,
}

/// A package whose license is unusual for the stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseOutlier {
    pub package: String,
    pub license: String,
}

/// Whether the license scoring service contributed to the analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseServiceStatus {
    #[default]
    Available,
    Unavailable,
}

/// License section of the stack report
///
/// `total_licenses` and `distinct_licenses` are computed locally and are
/// always present. Everything else comes from the scoring service and is
/// empty when the service failed or returned nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseAnalysis {
    pub total_licenses: usize,
    pub distinct_licenses: Vec<String>,
    pub stack_license_conflict: bool,
    pub current_stack_license: Option<String>,
    pub unknown_licenses: UnknownLicenses,
    pub conflict_packages: Vec<ConflictPackages>,
    pub outlier_packages: Vec<LicenseOutlier>,
    #[serde(default)]
    pub service_status: LicenseServiceStatus,
}
