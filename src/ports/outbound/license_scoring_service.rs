use crate::shared::Result;
use async_trait::async_trait;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One `(name, version, licenses)` entry of a scoring request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicenseScoringPackage {
    pub package: String,
    pub version: String,
    pub licenses: Vec<String>,
}

/// Overall verdict of the scoring service for the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum StackLicenseStatus {
    Successful,
    Unknown,
    ComponentLicenseConflict,
    StackLicenseConflict,
    #[serde(other)]
    Other,
}

/// Verdict for a single component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ComponentLicenseStatus {
    Successful,
    Unknown,
    Conflict,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ComponentLicenseAnalysis {
    #[serde(default)]
    pub status: Option<ComponentLicenseStatus>,
    #[serde(default)]
    pub unknown_licenses: Vec<String>,
    /// Pairs of mutually incompatible licenses declared by the component
    #[serde(default)]
    pub conflict_licenses: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ComponentLicenseReport {
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub license_analysis: ComponentLicenseAnalysis,
}

/// String-to-string JSON object that keeps the key order of the payload
///
/// Conflict pairs are sent as two-key objects where the first key is the
/// first package of the pair, so order must survive deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedPairs(pub Vec<(String, String)>);

impl<'de> Deserialize<'de> for OrderedPairs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedPairsVisitor;

        impl<'de> Visitor<'de> for OrderedPairsVisitor {
            type Value = OrderedPairs;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of package names to license names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, String>()? {
                    entries.push((key, value));
                }
                Ok(OrderedPairs(entries))
            }

            fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(OrderedPairs::default())
            }
        }

        deserializer.deserialize_any(OrderedPairsVisitor)
    }
}

/// Typed response of the stack license scoring service
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StackLicenseResponse {
    #[serde(default)]
    pub status: Option<StackLicenseStatus>,
    #[serde(default)]
    pub stack_license: Option<String>,
    #[serde(default)]
    pub packages: Vec<ComponentLicenseReport>,
    #[serde(default)]
    pub conflict_packages: Vec<OrderedPairs>,
    #[serde(default)]
    pub outlier_packages: OrderedPairs,
}

/// LicenseScoringService port for stack level license analysis
///
/// This port abstracts the remote service that picks a representative
/// license for a stack and reports unknown, conflicting and outlier licenses.
#[async_trait]
pub trait LicenseScoringService: Send + Sync {
    /// Scores the licenses of a whole stack
    ///
    /// # Arguments
    /// * `packages` - `(name, version, licenses)` entries of the stack
    ///
    /// # Returns
    /// The parsed response, or `None` when the service answered with an
    /// empty body
    ///
    /// # Errors
    /// Returns an error if the service is unreachable, answers with a
    /// non-success status, or the response is malformed
    async fn score_stack(
        &self,
        packages: &[LicenseScoringPackage],
    ) -> Result<Option<StackLicenseResponse>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_pairs_keep_payload_order() {
        let json = r#"{"zlib-pkg": "Zlib", "apache-pkg": "Apache-2.0"}"#;
        let pairs: OrderedPairs = serde_json::from_str(json).unwrap();
        assert_eq!(
            pairs.0,
            vec![
                ("zlib-pkg".to_string(), "Zlib".to_string()),
                ("apache-pkg".to_string(), "Apache-2.0".to_string()),
            ]
        );
    }

    #[test]
    fn test_ordered_pairs_null() {
        let pairs: OrderedPairs = serde_json::from_str("null").unwrap();
        assert!(pairs.0.is_empty());
    }

    #[test]
    fn test_response_unknown_status_values() {
        let json = r#"{"status": "SomethingNew", "packages": [{"package": "p", "license_analysis": {"status": "Weird"}}]}"#;
        let response: StackLicenseResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, Some(StackLicenseStatus::Other));
        assert_eq!(
            response.packages[0].license_analysis.status,
            Some(ComponentLicenseStatus::Other)
        );
    }

    #[test]
    fn test_response_defaults() {
        let response: StackLicenseResponse = serde_json::from_str("{}").unwrap();
        assert!(response.stack_license.is_none());
        assert!(response.packages.is_empty());
        assert!(response.conflict_packages.is_empty());
        assert!(response.outlier_packages.0.is_empty());
    }
}
