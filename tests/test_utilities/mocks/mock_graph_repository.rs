use async_trait::async_trait;
use stack_aggregator::ports::outbound::{GraphPackageRecord, GraphVulnerabilityRecord};
use stack_aggregator::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Mock GraphRepository serving records keyed by `name@version`
///
/// Batches containing a package marked as failing fail as a whole.
#[derive(Default, Clone)]
pub struct MockGraphRepository {
    records: HashMap<String, GraphPackageRecord>,
    safe_versions: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    pub batches: Arc<Mutex<Vec<Vec<String>>>>,
    pub version_lookups: Arc<Mutex<Vec<String>>>,
}

fn key(name: &str, version: &str) -> String {
    format!("{}@{}", name, version)
}

impl MockGraphRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, ecosystem: &str, name: &str, version: &str, licenses: &[&str]) -> Self {
        self.records.insert(
            key(name, version),
            GraphPackageRecord {
                name: name.to_string(),
                version: version.to_string(),
                ecosystem: Some(ecosystem.to_string()),
                licenses: licenses.iter().map(|l| l.to_string()).collect(),
                latest_version: Some(version.to_string()),
                ..Default::default()
            },
        );
        self
    }

    /// Adds a vulnerability to a package registered with `with_package`
    pub fn with_vulnerability(mut self, name: &str, version: &str, id: &str, severity: &str) -> Self {
        if let Some(record) = self.records.get_mut(&key(name, version)) {
            record.vulnerabilities.push(GraphVulnerabilityRecord {
                id: id.to_string(),
                cvss: Some(7.5),
                cve_ids: vec![format!("CVE-{}", id)],
                cvss_v3: None,
                cwes: Vec::new(),
                severity: severity.to_string(),
                title: format!("{} in {}", id, name),
                url: format!("https://snyk.io/vuln/{}", id),
                private: false,
            });
        }
        self
    }

    pub fn with_latest_non_cve_version(mut self, name: &str, version: &str, safe: &str) -> Self {
        if let Some(record) = self.records.get_mut(&key(name, version)) {
            record.latest_non_cve_version = Some(safe.to_string());
        }
        self
    }

    pub fn with_safe_versions(mut self, name: &str, versions: &[&str]) -> Self {
        self.safe_versions.insert(
            name.to_string(),
            versions.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    pub fn with_failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.batches.lock().unwrap().iter().map(Vec::len).collect();
        sizes.sort_unstable();
        sizes
    }
}

#[async_trait]
impl GraphRepository for MockGraphRepository {
    async fn fetch_package_records(
        &self,
        _ecosystem: Ecosystem,
        packages: &[Package],
    ) -> Result<Vec<GraphPackageRecord>> {
        self.batches
            .lock()
            .unwrap()
            .push(packages.iter().map(|p| p.to_string()).collect());

        if packages.iter().any(|p| self.failing.contains(p.name())) {
            anyhow::bail!("gremlin server returned HTTP 500");
        }

        Ok(packages
            .iter()
            .filter_map(|p| self.records.get(&key(p.name(), p.version())).cloned())
            .collect())
    }

    async fn fetch_non_vulnerable_versions(
        &self,
        _ecosystem: Ecosystem,
        package_name: &str,
    ) -> Result<Vec<String>> {
        self.version_lookups
            .lock()
            .unwrap()
            .push(package_name.to_string());
        Ok(self
            .safe_versions
            .get(package_name)
            .cloned()
            .unwrap_or_default())
    }
}
