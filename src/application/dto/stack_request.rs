use crate::shared::error::AggregatorError;
use crate::shared::Result;
use crate::stack_analysis::domain::{Ecosystem, Package, RegistrationStatus};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

fn default_show_transitive() -> bool {
    true
}

fn null_as_show_transitive<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_show_transitive))
}

/// StackAggregatorRequest - Request envelope for one aggregation
///
/// Deserialized from the JSON body sent by the manifest analyzer. The
/// ecosystem is accepted case-insensitively and stored lowercase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackAggregatorRequest {
    #[serde(default)]
    pub registration_status: RegistrationStatus,
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub external_request_id: String,
    /// Whether transitive details are nested under each direct
    #[serde(
        default = "default_show_transitive",
        deserialize_with = "null_as_show_transitive"
    )]
    pub show_transitive: bool,
    pub ecosystem: Ecosystem,
    pub manifest_file: String,
    pub manifest_file_path: String,
    pub packages: Vec<Package>,
}

impl StackAggregatorRequest {
    pub fn new(external_request_id: String, ecosystem: Ecosystem, packages: Vec<Package>) -> Self {
        Self {
            registration_status: RegistrationStatus::default(),
            uuid: None,
            external_request_id,
            show_transitive: default_show_transitive(),
            ecosystem,
            manifest_file: String::new(),
            manifest_file_path: String::new(),
            packages,
        }
    }

    pub fn with_manifest(mut self, manifest_file: String, manifest_file_path: String) -> Self {
        self.manifest_file = manifest_file;
        self.manifest_file_path = manifest_file_path;
        self
    }

    pub fn with_show_transitive(mut self, show_transitive: bool) -> Self {
        self.show_transitive = show_transitive;
        self
    }

    /// Checks envelope fields that the type system does not cover
    pub fn validate(&self) -> Result<()> {
        if self.external_request_id.trim().is_empty() {
            return Err(AggregatorError::Validation {
                message: "external_request_id cannot be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
