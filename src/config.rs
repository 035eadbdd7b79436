//! Configuration file support for stack-aggregator.
//!
//! Provides YAML-based configuration through `stack-aggregator.config.yml`
//! files: service endpoints, batching and retry tunables, and report links.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::application::dto::{
    AggregationSettings, EnrichmentFailurePolicy, PackageUrlTemplate,
    DEFAULT_MAX_CONCURRENT_BATCHES, DEFAULT_PACKAGE_URL_FORMAT, DEFAULT_REGISTRATION_LINK,
};
use crate::shared::error::AggregatorError;
use crate::shared::security::{validate_input_file, MAX_INPUT_FILE_SIZE};
use crate::shared::Result;
use crate::stack_analysis::services::DEFAULT_BATCH_SIZE;

pub const CONFIG_FILENAME: &str = "stack-aggregator.config.yml";

pub const DEFAULT_GRAPH_URL: &str = "http://bayesian-gremlin-http:8182";
pub const DEFAULT_LICENSE_SERVICE_URL: &str = "http://f8a-license-analysis:6162";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Top-level configuration file schema.
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    pub graph_url: String,
    pub license_service_url: String,
    /// Ingestion of unknown packages is disabled when absent
    pub ingestion_url: Option<String>,
    pub batch_size: usize,
    pub max_concurrent_batches: usize,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub enrichment_failure_policy: EnrichmentFailurePolicy,
    pub registration_link: String,
    pub package_url_format: String,
    pub ecosystem_url_aliases: HashMap<String, String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            graph_url: DEFAULT_GRAPH_URL.to_string(),
            license_service_url: DEFAULT_LICENSE_SERVICE_URL.to_string(),
            ingestion_url: None,
            batch_size: DEFAULT_BATCH_SIZE,
            max_concurrent_batches: DEFAULT_MAX_CONCURRENT_BATCHES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            enrichment_failure_policy: EnrichmentFailurePolicy::default(),
            registration_link: DEFAULT_REGISTRATION_LINK.to_string(),
            package_url_format: DEFAULT_PACKAGE_URL_FORMAT.to_string(),
            ecosystem_url_aliases: HashMap::from([("pypi".to_string(), "pip".to_string())]),
            unknown_fields: HashMap::new(),
        }
    }
}

impl AggregatorConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Settings handed to the aggregation use case
    pub fn to_settings(&self) -> AggregationSettings {
        AggregationSettings {
            batch_size: self.batch_size,
            max_concurrent_batches: self.max_concurrent_batches,
            failure_policy: self.enrichment_failure_policy,
            registration_link: self.registration_link.clone(),
            package_url: PackageUrlTemplate::new(
                self.package_url_format.clone(),
                self.ecosystem_url_aliases.clone(),
            ),
        }
    }

    /// Validate the configuration.
    ///
    /// `path` is only used to label the error; CLI overrides are validated
    /// against the file they were merged into.
    pub fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |details: String| AggregatorError::InvalidConfig {
            path: path.to_path_buf(),
            details,
        };

        if self.batch_size == 0 {
            return Err(invalid("batch_size must be at least 1".to_string()).into());
        }
        if self.max_concurrent_batches == 0 {
            return Err(invalid("max_concurrent_batches must be at least 1".to_string()).into());
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs must be at least 1".to_string()).into());
        }

        let mut urls = vec![
            ("graph_url", self.graph_url.as_str()),
            ("license_service_url", self.license_service_url.as_str()),
        ];
        if let Some(url) = self.ingestion_url.as_deref() {
            urls.push(("ingestion_url", url));
        }
        for (field, url) in urls {
            if !is_http_url(url) {
                return Err(invalid(format!(
                    "{} must be an http:// or https:// URL, got '{}'",
                    field, url
                ))
                .into());
            }
        }

        if !self.package_url_format.contains("{package}") {
            return Err(invalid(
                "package_url_format must contain the {package} placeholder".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    ["http://", "https://"]
        .iter()
        .any(|scheme| url.len() > scheme.len() && url.starts_with(scheme))
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<AggregatorConfig> {
    validate_input_file(path, MAX_INPUT_FILE_SIZE)?;

    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    // An empty file deserializes as null rather than an empty mapping
    let config: AggregatorConfig = if content.trim().is_empty() {
        AggregatorConfig::default()
    } else {
        serde_yaml_ng::from_str(&content).with_context(|| {
            format!(
                "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
                path.display()
            )
        })?
    };

    config.validate(path)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<(PathBuf, AggregatorConfig)>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some((config_path, config)))
}

fn warn_unknown_fields(config: &AggregatorConfig) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        tracing::warn!(field = %key, "unknown config field ignored");
        eprintln!("⚠️  Warning: Unknown config field '{}' will be ignored.", key);
    }
}
