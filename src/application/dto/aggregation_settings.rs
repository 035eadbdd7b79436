use crate::stack_analysis::domain::Ecosystem;
use crate::stack_analysis::services::DEFAULT_BATCH_SIZE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_MAX_CONCURRENT_BATCHES: usize = 4;
pub const DEFAULT_REGISTRATION_LINK: &str = "https://snyk.io/login";
pub const DEFAULT_PACKAGE_URL_FORMAT: &str = "https://snyk.io/vuln/{ecosystem}:{package}";

/// What to do when one graph batch fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentFailurePolicy {
    /// Abort the request with the batch error
    #[default]
    Propagate,
    /// Log the failure and report the batch's packages as unknown
    Degrade,
}

/// Renders the advisory page link of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUrlTemplate {
    format: String,
    ecosystem_aliases: HashMap<String, String>,
}

impl PackageUrlTemplate {
    pub fn new(format: String, ecosystem_aliases: HashMap<String, String>) -> Self {
        Self {
            format,
            ecosystem_aliases,
        }
    }

    /// Substitutes `{ecosystem}` (after aliasing) and the URL-encoded `{package}`
    pub fn render(&self, ecosystem: Ecosystem, package_name: &str) -> String {
        let ecosystem = self
            .ecosystem_aliases
            .get(ecosystem.as_str())
            .map(String::as_str)
            .unwrap_or(ecosystem.as_str());
        self.format
            .replace("{ecosystem}", ecosystem)
            .replace("{package}", &urlencoding::encode(package_name))
    }
}

impl Default for PackageUrlTemplate {
    fn default() -> Self {
        Self::new(
            DEFAULT_PACKAGE_URL_FORMAT.to_string(),
            HashMap::from([("pypi".to_string(), "pip".to_string())]),
        )
    }
}

/// AggregationSettings - Tunables of the aggregation use case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationSettings {
    pub batch_size: usize,
    pub max_concurrent_batches: usize,
    pub failure_policy: EnrichmentFailurePolicy,
    pub registration_link: String,
    pub package_url: PackageUrlTemplate,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_concurrent_batches: DEFAULT_MAX_CONCURRENT_BATCHES,
            failure_policy: EnrichmentFailurePolicy::default(),
            registration_link: DEFAULT_REGISTRATION_LINK.to_string(),
            package_url: PackageUrlTemplate::default(),
        }
    }
}
