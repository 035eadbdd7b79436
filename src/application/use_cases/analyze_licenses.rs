use crate::ports::outbound::{
    ComponentLicenseStatus, LicenseScoringPackage, LicenseScoringService, StackLicenseResponse,
    StackLicenseStatus,
};
use crate::shared::error::AggregatorError;
use crate::stack_analysis::domain::{
    ComponentConflict, ConflictPackages, LicenseAnalysis, LicenseOutlier, LicensePair,
    LicenseServiceStatus, NormalizedPackages, Package, PackageDetails, ReallyUnknownLicense,
    UnknownLicenses,
};
use std::collections::{BTreeSet, HashMap};
use tracing::{error, info, instrument, warn};

/// Package name used when the scoring service omits one
const UNKNOWN_PACKAGE: &str = "Unknown";

/// AnalyzeLicensesUseCase - Stack level license aggregation
///
/// Asks the scoring service for a representative stack license and folds
/// its findings together with the distinct licenses declared across the
/// stack. A failing or silent service never fails the request: the service
/// derived sections stay empty and `service_status` records the outage.
///
/// # Type Parameters
/// * `L` - LicenseScoringService implementation
pub struct AnalyzeLicensesUseCase<'a, L> {
    license_service: &'a L,
}

impl<'a, L: LicenseScoringService> AnalyzeLicensesUseCase<'a, L> {
    pub fn new(license_service: &'a L) -> Self {
        Self { license_service }
    }

    /// Builds the license analysis for a stack
    ///
    /// # Arguments
    /// * `packages` - Normalized packages of the stack
    /// * `details` - Details lookup produced by enrichment
    #[instrument(name = "analyze_licenses", skip_all, fields(directs = packages.direct_dependencies().len()))]
    pub async fn analyze(
        &self,
        packages: &NormalizedPackages,
        details: &HashMap<Package, PackageDetails>,
    ) -> LicenseAnalysis {
        let payload = Self::scoring_payload(packages, details);

        let response = match self.license_service.score_stack(&payload).await {
            Ok(Some(response)) => Some(response),
            Ok(None) => {
                let failure = AggregatorError::LicenseService {
                    details: "empty response".to_string(),
                };
                error!(error = %failure, "license analysis unavailable");
                None
            }
            Err(e) => {
                let failure = AggregatorError::LicenseService {
                    details: format!("{:#}", e),
                };
                error!(error = %failure, "license analysis unavailable");
                None
            }
        };

        let analysis = Self::aggregate(response.as_ref(), details);
        info!(
            total_licenses = analysis.total_licenses,
            stack_license_conflict = analysis.stack_license_conflict,
            "license analysis completed"
        );
        analysis
    }

    /// `(name, version, licenses)` triples for every direct with details
    pub fn scoring_payload(
        packages: &NormalizedPackages,
        details: &HashMap<Package, PackageDetails>,
    ) -> Vec<LicenseScoringPackage> {
        packages
            .direct_dependencies()
            .iter()
            .filter_map(|direct| details.get(direct))
            .map(|d| LicenseScoringPackage {
                package: d.name.to_string(),
                version: d.version.to_string(),
                licenses: d.licenses.clone(),
            })
            .collect()
    }

    /// Folds a scoring response (or its absence) with the locally seen licenses
    pub fn aggregate(
        response: Option<&StackLicenseResponse>,
        details: &HashMap<Package, PackageDetails>,
    ) -> LicenseAnalysis {
        let distinct_licenses = Self::distinct_licenses(details);

        let Some(response) = response else {
            return LicenseAnalysis {
                total_licenses: distinct_licenses.len(),
                stack_license_conflict: !distinct_licenses.is_empty(),
                distinct_licenses,
                service_status: LicenseServiceStatus::Unavailable,
                ..Default::default()
            };
        };

        let current_stack_license = response
            .stack_license
            .clone()
            .filter(|license| !license.trim().is_empty());

        LicenseAnalysis {
            total_licenses: distinct_licenses.len(),
            stack_license_conflict: current_stack_license.is_none()
                && !distinct_licenses.is_empty(),
            distinct_licenses,
            current_stack_license,
            unknown_licenses: Self::extract_unknown_licenses(response),
            conflict_packages: Self::extract_conflict_packages(response),
            outlier_packages: Self::extract_outliers(response),
            service_status: LicenseServiceStatus::Available,
        }
    }

    /// Sorted set of licenses declared by any package with details
    pub fn distinct_licenses(details: &HashMap<Package, PackageDetails>) -> Vec<String> {
        details
            .values()
            .flat_map(|d| d.licenses.iter().cloned())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }

    /// Per-package unknowns, split by the stack status of the response
    ///
    /// Really-unknown licenses are only reported under the `Unknown` stack
    /// status and component conflicts only under `ComponentLicenseConflict`.
    fn extract_unknown_licenses(response: &StackLicenseResponse) -> UnknownLicenses {
        let mut unknown = UnknownLicenses::default();

        match response.status {
            Some(StackLicenseStatus::Unknown) => {
                for component in &response.packages {
                    let analysis = &component.license_analysis;
                    if analysis.status != Some(ComponentLicenseStatus::Unknown) {
                        continue;
                    }
                    let package = component.package.as_deref().unwrap_or(UNKNOWN_PACKAGE);
                    unknown
                        .really_unknown
                        .extend(analysis.unknown_licenses.iter().map(|license| {
                            ReallyUnknownLicense {
                                package: package.to_string(),
                                license: license.clone(),
                            }
                        }));
                }
            }
            Some(StackLicenseStatus::ComponentLicenseConflict) => {
                for component in &response.packages {
                    let analysis = &component.license_analysis;
                    if analysis.status != Some(ComponentLicenseStatus::Conflict) {
                        continue;
                    }
                    let package = component.package.as_deref().unwrap_or(UNKNOWN_PACKAGE);
                    let conflict_licenses = analysis
                        .conflict_licenses
                        .iter()
                        .filter_map(|pair| match pair.as_slice() {
                            [license1, license2] => Some(LicensePair {
                                license1: license1.clone(),
                                license2: license2.clone(),
                            }),
                            _ => {
                                warn!(package, entries = pair.len(), "skipping malformed license conflict pair");
                                None
                            }
                        })
                        .collect();
                    unknown.component_conflict.push(ComponentConflict {
                        package: package.to_string(),
                        conflict_licenses,
                    });
                }
            }
            _ => {}
        }

        unknown
    }

    /// Stack level conflicts; the first key of each pair is `package1`
    fn extract_conflict_packages(response: &StackLicenseResponse) -> Vec<ConflictPackages> {
        response
            .conflict_packages
            .iter()
            .filter_map(|pair| match pair.0.as_slice() {
                [(package1, license1), (package2, license2)] => Some(ConflictPackages {
                    package1: package1.clone(),
                    license1: license1.clone(),
                    package2: package2.clone(),
                    license2: license2.clone(),
                }),
                entries => {
                    warn!(entries = entries.len(), "skipping malformed conflict package pair");
                    None
                }
            })
            .collect()
    }

    fn extract_outliers(response: &StackLicenseResponse) -> Vec<LicenseOutlier> {
        response
            .outlier_packages
            .0
            .iter()
            .map(|(package, license)| LicenseOutlier {
                package: package.clone(),
                license: license.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Result;
    use crate::stack_analysis::domain::Ecosystem;
    use async_trait::async_trait;
    use std::sync::Mutex;

    enum Behaviour {
        Respond(serde_json::Value),
        Empty,
        Fail,
    }

    struct StubLicenseService {
        behaviour: Behaviour,
        payloads: Mutex<Vec<Vec<LicenseScoringPackage>>>,
    }

    impl StubLicenseService {
        fn new(behaviour: Behaviour) -> Self {
            Self {
                behaviour,
                payloads: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LicenseScoringService for StubLicenseService {
        async fn score_stack(
            &self,
            packages: &[LicenseScoringPackage],
        ) -> Result<Option<StackLicenseResponse>> {
            self.payloads.lock().unwrap().push(packages.to_vec());
            match &self.behaviour {
                Behaviour::Respond(json) => Ok(Some(serde_json::from_value(json.clone())?)),
                Behaviour::Empty => Ok(None),
                Behaviour::Fail => anyhow::bail!("connection refused"),
            }
        }
    }

    fn pkg(name: &str, version: &str) -> Package {
        Package::new(name.to_string(), version.to_string()).unwrap()
    }

    fn stack(entries: Vec<(&str, Vec<&str>)>) -> (NormalizedPackages, HashMap<Package, PackageDetails>) {
        let packages: Vec<Package> = entries.iter().map(|(name, _)| pkg(name, "1.0")).collect();
        let details = entries
            .iter()
            .map(|(name, licenses)| {
                let package = pkg(name, "1.0");
                let mut d = PackageDetails::new(&package, Ecosystem::Pypi);
                d.licenses = licenses.iter().map(|l| l.to_string()).collect();
                (package, d)
            })
            .collect();
        (NormalizedPackages::new(&packages, Ecosystem::Pypi), details)
    }

    #[tokio::test]
    async fn test_successful_stack_license() {
        let service = StubLicenseService::new(Behaviour::Respond(serde_json::json!({
            "status": "Successful",
            "stack_license": "Apache-2.0",
            "packages": [],
            "conflict_packages": [],
            "outlier_packages": {}
        })));
        let (packages, details) = stack(vec![
            ("flask", vec!["BSD-3-Clause"]),
            ("six", vec!["MIT", "BSD-3-Clause"]),
        ]);

        let analysis = AnalyzeLicensesUseCase::new(&service).analyze(&packages, &details).await;

        assert_eq!(analysis.current_stack_license.as_deref(), Some("Apache-2.0"));
        assert!(!analysis.stack_license_conflict);
        assert_eq!(analysis.distinct_licenses, vec!["BSD-3-Clause", "MIT"]);
        assert_eq!(analysis.total_licenses, 2);
        assert_eq!(analysis.service_status, LicenseServiceStatus::Available);
    }

    #[tokio::test]
    async fn test_payload_contains_directs_with_details() {
        let service = StubLicenseService::new(Behaviour::Empty);
        let request = vec![
            pkg("flask", "1.0").with_dependencies(vec![pkg("six", "1.0")]),
            pkg("unknown", "1.0"),
        ];
        let packages = NormalizedPackages::new(&request, Ecosystem::Pypi);
        let details: HashMap<Package, PackageDetails> = ["flask", "six"]
            .iter()
            .map(|name| {
                let package = pkg(name, "1.0");
                let mut d = PackageDetails::new(&package, Ecosystem::Pypi);
                d.licenses = vec!["MIT".to_string()];
                (package, d)
            })
            .collect();

        AnalyzeLicensesUseCase::new(&service).analyze(&packages, &details).await;

        let payloads = service.payloads.lock().unwrap();
        assert_eq!(
            payloads[0],
            vec![LicenseScoringPackage {
                package: "flask".to_string(),
                version: "1.0".to_string(),
                licenses: vec!["MIT".to_string()],
            }]
        );
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty_analysis() {
        let service = StubLicenseService::new(Behaviour::Fail);
        let (packages, details) = stack(vec![("flask", vec!["MIT"])]);

        let analysis = AnalyzeLicensesUseCase::new(&service).analyze(&packages, &details).await;

        assert_eq!(analysis.service_status, LicenseServiceStatus::Unavailable);
        assert!(analysis.current_stack_license.is_none());
        assert!(analysis.unknown_licenses.is_empty());
        assert!(analysis.conflict_packages.is_empty());
        assert!(analysis.outlier_packages.is_empty());
        assert_eq!(analysis.distinct_licenses, vec!["MIT"]);
        assert!(analysis.stack_license_conflict);
    }

    #[tokio::test]
    async fn test_empty_response_degrades() {
        let service = StubLicenseService::new(Behaviour::Empty);
        let (packages, details) = stack(vec![("flask", vec![])]);

        let analysis = AnalyzeLicensesUseCase::new(&service).analyze(&packages, &details).await;

        assert_eq!(analysis.service_status, LicenseServiceStatus::Unavailable);
        assert!(analysis.distinct_licenses.is_empty());
        assert!(!analysis.stack_license_conflict);
    }

    #[test]
    fn test_no_distinct_licenses_never_conflict() {
        let response: StackLicenseResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        let analysis = AnalyzeLicensesUseCase::<StubLicenseService>::aggregate(
            Some(&response),
            &HashMap::new(),
        );
        assert!(!analysis.stack_license_conflict);
        assert_eq!(analysis.total_licenses, 0);
    }

    #[test]
    fn test_conflict_when_no_stack_license() {
        let (_, details) = stack(vec![("flask", vec!["MIT"])]);
        let response: StackLicenseResponse =
            serde_json::from_value(serde_json::json!({"stack_license": null})).unwrap();
        let analysis =
            AnalyzeLicensesUseCase::<StubLicenseService>::aggregate(Some(&response), &details);
        assert!(analysis.stack_license_conflict);
    }

    #[test]
    fn test_extract_really_unknown_licenses() {
        let response: StackLicenseResponse = serde_json::from_value(serde_json::json!({
            "status": "Unknown",
            "packages": [
                {"package": "p1", "license_analysis": {"status": "Unknown", "unknown_licenses": ["foo", "bar"]}},
                {"package": "p2", "license_analysis": {"status": "Successful"}},
                {"license_analysis": {"status": "Unknown", "unknown_licenses": ["baz"]}}
            ]
        }))
        .unwrap();

        let unknown = AnalyzeLicensesUseCase::<StubLicenseService>::extract_unknown_licenses(&response);

        assert_eq!(unknown.really_unknown.len(), 3);
        assert_eq!(unknown.really_unknown[0].package, "p1");
        assert_eq!(unknown.really_unknown[1].license, "bar");
        assert_eq!(unknown.really_unknown[2].package, "Unknown");
        assert!(unknown.component_conflict.is_empty());
    }

    #[test]
    fn test_extract_component_conflicts() {
        let response: StackLicenseResponse = serde_json::from_value(serde_json::json!({
            "status": "ComponentLicenseConflict",
            "packages": [
                {"package": "p1", "license_analysis": {"status": "Conflict", "conflict_licenses": [["GPL-2.0", "Apache-2.0"], ["only-one"]]}},
                {"package": "p2", "license_analysis": {"status": "Unknown", "unknown_licenses": ["foo"]}}
            ]
        }))
        .unwrap();

        let unknown = AnalyzeLicensesUseCase::<StubLicenseService>::extract_unknown_licenses(&response);

        assert!(unknown.really_unknown.is_empty());
        assert_eq!(unknown.component_conflict.len(), 1);
        assert_eq!(unknown.component_conflict[0].package, "p1");
        assert_eq!(
            unknown.component_conflict[0].conflict_licenses,
            vec![LicensePair {
                license1: "GPL-2.0".to_string(),
                license2: "Apache-2.0".to_string(),
            }]
        );
    }

    #[test]
    fn test_extract_conflict_packages_keeps_key_order() {
        let response: StackLicenseResponse = serde_json::from_str(
            r#"{
                "status": "StackLicenseConflict",
                "conflict_packages": [
                    {"zpkg": "GPL-3.0", "apkg": "Apache-2.0"},
                    {"lonely": "MIT"}
                ]
            }"#,
        )
        .unwrap();

        let conflicts = AnalyzeLicensesUseCase::<StubLicenseService>::extract_conflict_packages(&response);

        assert_eq!(
            conflicts,
            vec![ConflictPackages {
                package1: "zpkg".to_string(),
                license1: "GPL-3.0".to_string(),
                package2: "apkg".to_string(),
                license2: "Apache-2.0".to_string(),
            }]
        );
    }

    #[test]
    fn test_extract_outliers() {
        let response: StackLicenseResponse = serde_json::from_str(
            r#"{"outlier_packages": {"pkg-b": "GPL-3.0", "pkg-a": "AGPL-3.0"}}"#,
        )
        .unwrap();

        let outliers = AnalyzeLicensesUseCase::<StubLicenseService>::extract_outliers(&response);

        assert_eq!(outliers.len(), 2);
        assert_eq!(outliers[0].package, "pkg-b");
        assert_eq!(outliers[1].license, "AGPL-3.0");
    }
}
