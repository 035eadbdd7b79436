use crate::application::dto::PackageUrlTemplate;
use crate::ports::outbound::{
    GraphGitHubRecord, GraphPackageRecord, GraphRepository, GraphVulnerabilityRecord,
};
use crate::shared::error::AggregatorError;
use crate::shared::Result;
use crate::stack_analysis::domain::{
    ActivityCounts, ActivitySummary, Ecosystem, GitHubDetails, Package, PackageDetails, Severity,
    UsedBy, Vulnerability,
};
use crate::stack_analysis::services::VersionSelector;
use chrono::DateTime;
use tracing::{debug, warn};

/// Vulnerabilities split by their private discriminator
type PartitionedVulnerabilities = (Vec<Vulnerability>, Vec<Vulnerability>);

fn malformed(details: String) -> anyhow::Error {
    AggregatorError::MalformedRecord { details }.into()
}

/// PackageDetailsBuilder - Shapes one graph record into report details
///
/// The only side effect is the fallback version lookup issued for
/// vulnerable packages whose record has no latest non-vulnerable version.
pub struct PackageDetailsBuilder<'a, G> {
    graph_repository: &'a G,
    package_url: &'a PackageUrlTemplate,
}

impl<'a, G: GraphRepository> PackageDetailsBuilder<'a, G> {
    pub fn new(graph_repository: &'a G, package_url: &'a PackageUrlTemplate) -> Self {
        Self {
            graph_repository,
            package_url,
        }
    }

    /// Builds the `(Package, PackageDetails)` pair for one record
    ///
    /// # Arguments
    /// * `requested_ecosystem` - Ecosystem of the request, used when the
    ///   record does not carry one
    /// * `record` - Typed record returned by the graph service
    ///
    /// # Errors
    /// Returns `MalformedRecord` when the record has an invalid name,
    /// version, ecosystem or vulnerability
    pub async fn build(
        &self,
        requested_ecosystem: Ecosystem,
        record: GraphPackageRecord,
    ) -> Result<(Package, PackageDetails)> {
        let package = Package::new(record.name.clone(), record.version.clone()).map_err(|e| {
            malformed(format!(
                "invalid package '{}' version '{}': {}",
                record.name, record.version, e
            ))
        })?;
        let ecosystem =
            Self::resolve_ecosystem(requested_ecosystem, record.ecosystem.as_deref(), &package)?;
        let (public_vulnerabilities, private_vulnerabilities) =
            Self::partition_vulnerabilities(&package, record.vulnerabilities)?;

        let recommended_version =
            if public_vulnerabilities.is_empty() && private_vulnerabilities.is_empty() {
                None
            } else {
                self.recommended_version(ecosystem, &package, record.latest_non_cve_version)
                    .await
            };

        let latest_version = VersionSelector::select_latest(
            package.version(),
            &[
                record.libio_latest_version.as_deref().unwrap_or_default(),
                record.latest_version.as_deref().unwrap_or_default(),
            ],
        );

        let mut details = PackageDetails::new(&package, ecosystem);
        details.latest_version = latest_version;
        details.github = Some(Self::github_details(&package, &record.github));
        details.licenses = record.licenses;
        details.url = Some(self.package_url.render(ecosystem, package.name()));
        details.public_vulnerabilities = public_vulnerabilities;
        details.private_vulnerabilities = private_vulnerabilities;
        details.recommended_version = recommended_version;

        Ok((package, details))
    }

    fn resolve_ecosystem(
        requested: Ecosystem,
        recorded: Option<&str>,
        package: &Package,
    ) -> Result<Ecosystem> {
        match recorded.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(requested),
            Some(raw) => raw
                .parse()
                .map_err(|e| malformed(format!("package {}: {}", package, e))),
        }
    }

    /// Splits vulnerabilities into `(public, private)`
    fn partition_vulnerabilities(
        package: &Package,
        records: Vec<GraphVulnerabilityRecord>,
    ) -> Result<PartitionedVulnerabilities> {
        let mut public = Vec::new();
        let mut private = Vec::new();

        for record in records {
            let private_flag = record.private;
            let vulnerability = Self::vulnerability(record)
                .map_err(|e| malformed(format!("package {}: {}", package, e)))?;
            if private_flag {
                private.push(vulnerability);
            } else {
                public.push(vulnerability);
            }
        }

        Ok((public, private))
    }

    fn vulnerability(record: GraphVulnerabilityRecord) -> Result<Vulnerability> {
        let severity: Severity = record.severity.parse()?;
        Ok(Vulnerability::new(
            record.id,
            record.cvss.unwrap_or_default(),
            severity,
            record.title,
            record.url,
        )?
        .with_cve_ids(record.cve_ids)
        .with_cvss_v3(record.cvss_v3.unwrap_or_default())
        .with_cwes(record.cwes))
    }

    /// Uses the record's latest non-vulnerable version, falling back to a
    /// version lookup. A failed or empty lookup leaves the value unset.
    async fn recommended_version(
        &self,
        ecosystem: Ecosystem,
        package: &Package,
        latest_non_cve_version: Option<String>,
    ) -> Option<String> {
        if let Some(version) = latest_non_cve_version.filter(|v| !v.trim().is_empty()) {
            return Some(version);
        }

        warn!(
            %ecosystem,
            package = %package,
            "latest non-vulnerable version missing, falling back to version lookup"
        );

        match self
            .graph_repository
            .fetch_non_vulnerable_versions(ecosystem, package.name())
            .await
        {
            Ok(versions) => VersionSelector::select_recommended(package.version(), &versions),
            Err(e) => {
                warn!(package = %package, error = %format!("{:#}", e), "version lookup failed");
                None
            }
        }
    }

    fn github_details(package: &Package, record: &GraphGitHubRecord) -> GitHubDetails {
        let used_by = record
            .used_by
            .iter()
            .filter_map(|entry| {
                let parsed = entry.split_once(':').and_then(|(name, stars)| {
                    stars.trim().parse::<i64>().ok().map(|stars| UsedBy {
                        name: name.to_string(),
                        stars,
                    })
                });
                if parsed.is_none() {
                    debug!(package = %package, entry = %entry, "skipping malformed used-by entry");
                }
                parsed
            })
            .collect();

        GitHubDetails {
            total_releases: record.total_releases,
            issues: ActivitySummary {
                month: ActivityCounts {
                    opened: record.issues_last_month_opened,
                    closed: record.issues_last_month_closed,
                },
                year: ActivityCounts {
                    opened: record.issues_last_year_opened,
                    closed: record.issues_last_year_closed,
                },
            },
            pull_requests: ActivitySummary {
                month: ActivityCounts {
                    opened: record.prs_last_month_opened,
                    closed: record.prs_last_month_closed,
                },
                year: ActivityCounts {
                    opened: record.prs_last_year_opened,
                    closed: record.prs_last_year_closed,
                },
            },
            dependent_repos: record.dependent_repos,
            open_issues_count: record.open_issues_count,
            latest_release_duration: record.latest_release.and_then(format_release_timestamp),
            forks_count: record.forks,
            contributors: record.contributors,
            stargazers_count: record.stargazers,
            used_by,
            dependent_projects: record.dependent_projects,
            refreshed_on: record.refreshed_on.clone(),
            ..Default::default()
        }
    }
}

fn format_release_timestamp(seconds: f64) -> Option<String> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp(seconds.trunc() as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}
