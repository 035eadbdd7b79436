use crate::shared::Result;
use crate::stack_analysis::domain::{Ecosystem, Package};
use async_trait::async_trait;

/// Raw repository statistics attached to a package node
///
/// Counts are `None` when the graph has no value for them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphGitHubRecord {
    pub dependent_projects: Option<i64>,
    pub dependent_repos: Option<i64>,
    pub total_releases: Option<i64>,
    /// Unix timestamp (seconds) of the latest release
    pub latest_release: Option<f64>,
    pub issues_last_month_opened: Option<i64>,
    pub issues_last_month_closed: Option<i64>,
    pub issues_last_year_opened: Option<i64>,
    pub issues_last_year_closed: Option<i64>,
    pub prs_last_month_opened: Option<i64>,
    pub prs_last_month_closed: Option<i64>,
    pub prs_last_year_opened: Option<i64>,
    pub prs_last_year_closed: Option<i64>,
    pub stargazers: Option<i64>,
    pub forks: Option<i64>,
    pub open_issues_count: Option<i64>,
    pub contributors: Option<i64>,
    pub refreshed_on: Option<String>,
    /// Dependent projects encoded as `name:stars`
    pub used_by: Vec<String>,
}

/// One vulnerability node linked to a package version
#[derive(Debug, Clone, PartialEq)]
pub struct GraphVulnerabilityRecord {
    pub id: String,
    pub cvss: Option<f32>,
    pub cve_ids: Vec<String>,
    pub cvss_v3: Option<String>,
    pub cwes: Vec<String>,
    pub severity: String,
    pub title: String,
    pub url: String,
    /// Discriminator: the vulnerability is known only to registered users
    pub private: bool,
}

/// Typed record for one package version returned by the graph service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphPackageRecord {
    pub name: String,
    pub version: String,
    /// Ecosystem as stored on the version node; `None` when absent
    pub ecosystem: Option<String>,
    pub licenses: Vec<String>,
    pub latest_non_cve_version: Option<String>,
    pub libio_latest_version: Option<String>,
    pub latest_version: Option<String>,
    pub github: GraphGitHubRecord,
    pub vulnerabilities: Vec<GraphVulnerabilityRecord>,
}

/// GraphRepository port for querying the vulnerability graph service
///
/// This port abstracts the graph database holding package, version and
/// vulnerability nodes. Implementations must be `Send + Sync` so batches can
/// be queried concurrently.
#[async_trait]
pub trait GraphRepository: Send + Sync {
    /// Fetches detail records for one batch of packages
    ///
    /// # Arguments
    /// * `ecosystem` - Ecosystem shared by every package in the batch
    /// * `packages` - Packages to look up, identity only
    ///
    /// # Returns
    /// One record per package known to the graph. Unknown packages are
    /// simply absent from the result.
    ///
    /// # Errors
    /// Returns an error if the service is unreachable, answers with a
    /// non-success status, or the response cannot be parsed.
    async fn fetch_package_records(
        &self,
        ecosystem: Ecosystem,
        packages: &[Package],
    ) -> Result<Vec<GraphPackageRecord>>;

    /// Fetches every known version of a package that has no vulnerability
    ///
    /// # Arguments
    /// * `ecosystem` - Ecosystem of the package
    /// * `package_name` - Name of the package
    ///
    /// # Returns
    /// Version strings in the order the graph returns them
    async fn fetch_non_vulnerable_versions(
        &self,
        ecosystem: Ecosystem,
        package_name: &str,
    ) -> Result<Vec<String>>;
}
