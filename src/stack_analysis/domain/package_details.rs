use super::package::{Ecosystem, Package, PackageName, Version};
use super::vulnerability::Vulnerability;
use serde::{Deserialize, Serialize};

/// Opened/closed counts over one time window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCounts {
    pub opened: Option<i64>,
    pub closed: Option<i64>,
}

/// Activity over the last month and the last year
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub month: ActivityCounts,
    pub year: ActivityCounts,
}

/// A project that depends on the package, with its star count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedBy {
    pub name: String,
    pub stars: i64,
}

/// Repository statistics gathered by the graph service
///
/// Metrics the graph does not know are `None` and omitted from the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitHubDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watchers: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_releases: Option<i64>,
    pub issues: ActivitySummary,
    pub pull_requests: ActivitySummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependent_repos: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_issues_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_release_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forks_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stargazers_count: Option<i64>,
    #[serde(default)]
    pub used_by: Vec<UsedBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependent_projects: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refreshed_on: Option<String>,
}

/// Enriched view of one package
///
/// Created once per known package by the details builder with empty
/// `dependencies` and `vulnerable_dependencies`. Only the denormalizer fills
/// those two lists, and only on the copies it places in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDetails {
    pub name: PackageName,
    pub version: Version,
    pub ecosystem: Ecosystem,
    pub latest_version: String,
    pub github: Option<GitHubDetails>,
    #[serde(default)]
    pub licenses: Vec<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub public_vulnerabilities: Vec<Vulnerability>,
    #[serde(default)]
    pub private_vulnerabilities: Vec<Vulnerability>,
    pub recommended_version: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<PackageDetails>,
    #[serde(default)]
    pub vulnerable_dependencies: Vec<PackageDetails>,
}

impl PackageDetails {
    pub fn new(package: &Package, ecosystem: Ecosystem) -> Self {
        Self {
            name: package.package_name().clone(),
            version: package.package_version().clone(),
            ecosystem,
            latest_version: String::new(),
            github: None,
            licenses: Vec::new(),
            url: None,
            public_vulnerabilities: Vec::new(),
            private_vulnerabilities: Vec::new(),
            recommended_version: None,
            dependencies: Vec::new(),
            vulnerable_dependencies: Vec::new(),
        }
    }

    /// Identity of the described package, without its dependency list
    pub fn package(&self) -> Package {
        Package::from_parts(self.name.clone(), self.version.clone())
    }

    /// Rebuilds the request-side package, nested dependencies included
    pub fn to_package(&self) -> Package {
        self.package()
            .with_dependencies(self.dependencies.iter().map(|d| d.package()).collect())
    }

    pub fn has_vulnerabilities(&self) -> bool {
        !self.public_vulnerabilities.is_empty() || !self.private_vulnerabilities.is_empty()
    }

    pub fn vulnerability_count(&self) -> usize {
        self.public_vulnerabilities.len() + self.private_vulnerabilities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack_analysis::domain::vulnerability::Severity;

    fn details(name: &str, version: &str) -> PackageDetails {
        let package = Package::new(name.to_string(), version.to_string()).unwrap();
        PackageDetails::new(&package, Ecosystem::Pypi)
    }

    fn vuln(id: &str) -> Vulnerability {
        Vulnerability::new(
            id.to_string(),
            5.0,
            Severity::Medium,
            "title".to_string(),
            "url".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_details_are_empty() {
        let d = details("flask", "0.12");
        assert_eq!(d.name.as_str(), "flask");
        assert!(d.dependencies.is_empty());
        assert!(d.vulnerable_dependencies.is_empty());
        assert!(!d.has_vulnerabilities());
    }

    #[test]
    fn test_has_vulnerabilities_counts_private() {
        let mut d = details("flask", "0.12");
        d.private_vulnerabilities.push(vuln("SNYK-PVT-1"));
        assert!(d.has_vulnerabilities());
        assert_eq!(d.vulnerability_count(), 1);

        d.public_vulnerabilities.push(vuln("SNYK-1"));
        assert_eq!(d.vulnerability_count(), 2);
    }

    #[test]
    fn test_to_package_restores_nested_dependencies() {
        let mut d = details("flask", "0.12");
        d.dependencies.push(details("six", "1.2"));
        d.dependencies.push(details("werkzeug", "0.14"));

        let package = d.to_package();
        assert_eq!(package.name(), "flask");
        assert_eq!(package.dependencies().len(), 2);
        assert_eq!(package.dependencies()[0].name(), "six");
    }

    #[test]
    fn test_github_details_omits_unknown_metrics() {
        let github = GitHubDetails {
            stargazers_count: Some(42),
            ..Default::default()
        };
        let json = serde_json::to_value(&github).unwrap();
        assert_eq!(json["stargazers_count"], 42);
        assert!(json.get("forks_count").is_none());
        assert_eq!(json["issues"]["month"]["opened"], serde_json::Value::Null);
    }
}
