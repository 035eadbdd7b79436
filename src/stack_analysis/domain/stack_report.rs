use super::license_analysis::LicenseAnalysis;
use super::package::{Ecosystem, Package};
use super::package_details::PackageDetails;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Report schema version stamped into every audit block
pub const REPORT_VERSION: &str = "v2";

/// Registration tier of the user who submitted the stack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
    #[default]
    Freetier,
}

/// Timing information for one aggregation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub started_at: String,
    pub ended_at: String,
    pub version: String,
}

impl Audit {
    pub fn new(started_at: String, ended_at: String) -> Self {
        Self {
            started_at,
            ended_at,
            version: REPORT_VERSION.to_string(),
        }
    }
}

/// Final result of aggregating one stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackReport {
    #[serde(rename = "_audit", skip_serializing_if = "Option::is_none", default)]
    pub audit: Option<Audit>,
    pub uuid: Option<Uuid>,
    pub external_request_id: String,
    pub registration_status: RegistrationStatus,
    pub manifest_file_path: String,
    pub manifest_name: String,
    pub ecosystem: Ecosystem,
    pub analyzed_dependencies: Vec<PackageDetails>,
    pub unknown_dependencies: Vec<Package>,
    pub license_analysis: LicenseAnalysis,
    pub registration_link: String,
}

impl StackReport {
    /// Direct packages that have at least one vulnerability of their own
    /// or through a transitive
    pub fn vulnerable_direct_count(&self) -> usize {
        self.analyzed_dependencies
            .iter()
            .filter(|d| d.has_vulnerabilities() || !d.vulnerable_dependencies.is_empty())
            .count()
    }

    /// Total vulnerabilities across directs and their vulnerable transitives
    ///
    /// A transitive shared by several directs is counted once per direct.
    pub fn total_vulnerability_count(&self) -> usize {
        self.analyzed_dependencies
            .iter()
            .map(|d| {
                d.vulnerability_count()
                    + d.vulnerable_dependencies
                        .iter()
                        .map(PackageDetails::vulnerability_count)
                        .sum::<usize>()
            })
            .sum()
    }
}
