use crate::stack_analysis::domain::{NormalizedPackages, Package, PackageDetails};
use std::collections::HashMap;

/// Denormalizer service for composing the per-direct report view
///
/// Pure function of the normalized graph and the details lookup. The lookup
/// is never modified; every nested entry in the output is a copy.
pub struct Denormalizer;

impl Denormalizer {
    /// Re-attaches transitive details onto each direct dependency
    ///
    /// Directs without details are omitted (they are reported as unknown).
    /// Transitives without details are left out of the nested lists. When
    /// `include_transitives` is false the nested lists stay empty.
    pub fn denormalize(
        packages: &NormalizedPackages,
        details: &HashMap<Package, PackageDetails>,
        include_transitives: bool,
    ) -> Vec<PackageDetails> {
        packages
            .direct_dependencies()
            .iter()
            .filter_map(|direct| {
                let mut direct_details = details.get(direct)?.clone();
                direct_details.dependencies.clear();
                direct_details.vulnerable_dependencies.clear();

                if include_transitives {
                    let nested: Vec<PackageDetails> = packages
                        .transitives_of(direct)
                        .into_iter()
                        .flatten()
                        .filter_map(|transitive| details.get(transitive).cloned())
                        .collect();

                    direct_details.vulnerable_dependencies = nested
                        .iter()
                        .filter(|d| d.has_vulnerabilities())
                        .cloned()
                        .collect();
                    direct_details.dependencies = nested;
                }

                Some(direct_details)
            })
            .collect()
    }

    /// Packages of the graph for which no details were found, directs first
    pub fn unknown_packages(
        packages: &NormalizedPackages,
        details: &HashMap<Package, PackageDetails>,
    ) -> Vec<Package> {
        packages
            .all_dependencies()
            .iter()
            .filter(|p| !details.contains_key(p))
            .cloned()
            .collect()
    }
}
