use super::http::{build_client, with_retry};
use crate::ports::outbound::{
    GraphGitHubRecord, GraphPackageRecord, GraphRepository, GraphVulnerabilityRecord,
};
use crate::shared::Result;
use crate::stack_analysis::domain::{Ecosystem, Package};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

/// Per-batch traversal selecting the package node, the version node and the
/// vulnerabilities of each requested version
const PACKAGE_DETAILS_QUERY: &str = "epv = [];\n\
packages.each {\n\
    g.V().has('pecosystem', ecosystem).\n\
    has('pname', it.name).\n\
    has('version', it.version).as('version', 'vuln').\n\
    select('version').in('has_version').dedup().as('package').\n\
    select('package', 'version', 'vuln').\n\
    by(valueMap()).\n\
    by(valueMap()).\n\
    by(out('has_snyk_cve').valueMap().fold()).\n\
    fill(epv);\n\
}\n\
epv;";

const NON_VULNERABLE_VERSIONS_QUERY: &str = "g.V().has('ecosystem', ecosystem).has('name', name).\
out('has_version').not(out('has_snyk_cve')).values('version');";

/// Property map of a graph node, every property holding a list of values
type ValueMap = Map<String, Value>;

#[derive(Serialize)]
struct GremlinRequest<'a, B: Serialize> {
    gremlin: &'a str,
    bindings: B,
}

#[derive(Serialize)]
struct PackageDetailsBindings<'a> {
    ecosystem: &'a str,
    packages: Vec<PackageBinding<'a>>,
}

#[derive(Serialize)]
struct PackageBinding<'a> {
    name: &'a str,
    version: &'a str,
}

#[derive(Serialize)]
struct VersionBindings<'a> {
    ecosystem: &'a str,
    name: &'a str,
}

#[derive(Deserialize)]
struct GremlinResponse<T> {
    result: Option<GremlinResult<T>>,
}

#[derive(Deserialize)]
struct GremlinResult<T> {
    data: Option<Vec<T>>,
}

#[derive(Deserialize, Default)]
struct EpvEntry {
    #[serde(default)]
    package: ValueMap,
    #[serde(default)]
    version: ValueMap,
    #[serde(default)]
    vuln: Vec<ValueMap>,
}

/// GremlinGraphClient adapter for the Gremlin HTTP endpoint of the graph
///
/// Each call posts a script with bindings and reads `result.data` from the
/// response. Failed requests are retried with a linear backoff.
pub struct GremlinGraphClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl GremlinGraphClient {
    /// Creates a new client
    ///
    /// # Arguments
    /// * `base_url` - URL of the Gremlin HTTP server
    /// * `timeout` - Per-request timeout
    /// * `max_retries` - Attempts per query before giving up
    pub fn new(base_url: impl Into<String>, timeout: Duration, max_retries: u32) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
            max_retries,
        })
    }

    async fn post_query<B, T>(&self, query: &str, bindings: B) -> Result<Vec<T>>
    where
        B: Serialize,
        T: serde::de::DeserializeOwned,
    {
        let body = GremlinRequest {
            gremlin: query,
            bindings,
        };
        let body = serde_json::to_value(&body)?;
        let (client, url, body) = (&self.client, self.base_url.as_str(), &body);

        with_retry(self.max_retries, || async move {
            let response = client.post(url).json(body).send().await?;
            let status = response.status();
            if !status.is_success() {
                anyhow::bail!("graph service returned HTTP {}", status);
            }
            let payload: GremlinResponse<T> = response.json().await?;
            Ok(payload
                .result
                .and_then(|result| result.data)
                .unwrap_or_default())
        })
        .await
    }
}

#[async_trait]
impl GraphRepository for GremlinGraphClient {
    async fn fetch_package_records(
        &self,
        ecosystem: Ecosystem,
        packages: &[Package],
    ) -> Result<Vec<GraphPackageRecord>> {
        let bindings = PackageDetailsBindings {
            ecosystem: ecosystem.as_str(),
            packages: packages
                .iter()
                .map(|p| PackageBinding {
                    name: p.name(),
                    version: p.version(),
                })
                .collect(),
        };

        let entries: Vec<EpvEntry> = self.post_query(PACKAGE_DETAILS_QUERY, bindings).await?;
        debug!(
            requested = packages.len(),
            returned = entries.len(),
            "package details query answered"
        );
        Ok(entries.into_iter().map(package_record).collect())
    }

    async fn fetch_non_vulnerable_versions(
        &self,
        ecosystem: Ecosystem,
        package_name: &str,
    ) -> Result<Vec<String>> {
        let bindings = VersionBindings {
            ecosystem: ecosystem.as_str(),
            name: package_name,
        };
        let values: Vec<Value> = self
            .post_query(NON_VULNERABLE_VERSIONS_QUERY, bindings)
            .await?;
        Ok(values.iter().filter_map(scalar_string).collect())
    }
}

fn package_record(entry: EpvEntry) -> GraphPackageRecord {
    let package = &entry.package;
    let version = &entry.version;

    GraphPackageRecord {
        name: first_string(version, "pname").unwrap_or_default(),
        version: first_string(version, "version").unwrap_or_default(),
        ecosystem: first_string(version, "pecosystem"),
        licenses: strings(version, "declared_licenses"),
        latest_non_cve_version: first_string(package, "latest_non_cve_version"),
        libio_latest_version: first_string(package, "libio_latest_version"),
        latest_version: first_string(package, "latest_version"),
        github: github_record(package),
        vulnerabilities: entry.vuln.iter().map(vulnerability_record).collect(),
    }
}

fn github_record(package: &ValueMap) -> GraphGitHubRecord {
    GraphGitHubRecord {
        dependent_projects: first_i64(package, "libio_dependents_projects"),
        dependent_repos: first_i64(package, "libio_dependents_repos"),
        total_releases: first_i64(package, "libio_total_releases"),
        latest_release: first_f64(package, "libio_latest_release"),
        issues_last_month_opened: first_i64(package, "gh_issues_last_month_opened"),
        issues_last_month_closed: first_i64(package, "gh_issues_last_month_closed"),
        issues_last_year_opened: first_i64(package, "gh_issues_last_year_opened"),
        issues_last_year_closed: first_i64(package, "gh_issues_last_year_closed"),
        prs_last_month_opened: first_i64(package, "gh_prs_last_month_opened"),
        prs_last_month_closed: first_i64(package, "gh_prs_last_month_closed"),
        prs_last_year_opened: first_i64(package, "gh_prs_last_year_opened"),
        prs_last_year_closed: first_i64(package, "gh_prs_last_year_closed"),
        stargazers: first_i64(package, "gh_stargazers"),
        forks: first_i64(package, "gh_forks"),
        open_issues_count: first_i64(package, "gh_open_issues_count"),
        contributors: first_i64(package, "gh_contributors_count"),
        refreshed_on: first_string(package, "gh_refreshed_on"),
        used_by: strings(package, "libio_usedby"),
    }
}

fn vulnerability_record(vuln: &ValueMap) -> GraphVulnerabilityRecord {
    GraphVulnerabilityRecord {
        id: first_string(vuln, "snyk_vuln_id").unwrap_or_default(),
        cvss: first_f64(vuln, "cvss_scores").map(|score| score as f32),
        cve_ids: strings(vuln, "snyk_cve_ids"),
        cvss_v3: first_string(vuln, "snyk_cvss_v3"),
        cwes: strings(vuln, "snyk_cwes"),
        severity: first_string(vuln, "severity").unwrap_or_default(),
        title: first_string(vuln, "title").unwrap_or_default(),
        url: first_string(vuln, "snyk_url").unwrap_or_default(),
        private: first(vuln, "snyk_pvt_vulnerability").is_some_and(is_truthy),
    }
}

/// First value of a property; plain scalars are accepted as well as lists
fn first<'a>(map: &'a ValueMap, key: &str) -> Option<&'a Value> {
    match map.get(key)? {
        Value::Array(values) => values.first(),
        Value::Null => None,
        other => Some(other),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn first_string(map: &ValueMap, key: &str) -> Option<String> {
    first(map, key).and_then(scalar_string)
}

fn first_f64(map: &ValueMap, key: &str) -> Option<f64> {
    match first(map, key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn first_i64(map: &ValueMap, key: &str) -> Option<i64> {
    match first(map, key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Loose truthiness: null, `false`, zero, `""` and empty containers are false
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(values) => !values.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn strings(map: &ValueMap, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Value::Array(values)) => values.iter().filter_map(scalar_string).collect(),
        Some(other) => scalar_string(other).into_iter().collect(),
        None => Vec::new(),
    }
}
