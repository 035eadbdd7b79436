use super::package::{Ecosystem, Package};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Duplicate-free view of a request's dependency tree
///
/// Only the first level of nesting is read: each direct package maps to the
/// set of packages it lists under `dependencies`, and anything those list in
/// turn is ignored. All stored packages are identity-only copies.
///
/// Directs keep the order in which they first appear in the request, which
/// fixes the order of the analyzed list in the report. Transitives and the
/// per-direct sets are ordered by `(name, version)`.
#[derive(Debug, Clone)]
pub struct NormalizedPackages {
    ecosystem: Ecosystem,
    directs: Vec<Package>,
    dependency_graph: HashMap<Package, BTreeSet<Package>>,
    transitives: BTreeSet<Package>,
    all: Vec<Package>,
}

impl NormalizedPackages {
    /// Builds the normalized view from request packages
    ///
    /// A direct listed more than once keeps its first position and the union
    /// of every dependency list it was given.
    pub fn new(packages: &[Package], ecosystem: Ecosystem) -> Self {
        let mut directs = Vec::new();
        let mut dependency_graph: HashMap<Package, BTreeSet<Package>> = HashMap::new();

        for package in packages {
            if !dependency_graph.contains_key(package) {
                directs.push(package.identity());
            }
            dependency_graph
                .entry(package.identity())
                .or_default()
                .extend(package.dependencies().iter().map(Package::identity));
        }

        let transitives: BTreeSet<Package> = dependency_graph
            .values()
            .flat_map(|deps| deps.iter().cloned())
            .collect();

        let direct_set: HashSet<&Package> = directs.iter().collect();
        let all = directs
            .iter()
            .cloned()
            .chain(transitives.iter().filter(|p| !direct_set.contains(p)).cloned())
            .collect();

        Self {
            ecosystem,
            directs,
            dependency_graph,
            transitives,
            all,
        }
    }

    pub fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    /// Distinct top-level packages, in request order
    pub fn direct_dependencies(&self) -> &[Package] {
        &self.directs
    }

    /// Distinct packages reachable one level below any direct
    pub fn transitive_dependencies(&self) -> &BTreeSet<Package> {
        &self.transitives
    }

    /// Union of directs and transitives: directs first, then transitives
    /// that are not also directs
    pub fn all_dependencies(&self) -> &[Package] {
        &self.all
    }

    pub fn dependency_graph(&self) -> &HashMap<Package, BTreeSet<Package>> {
        &self.dependency_graph
    }

    /// Transitives of one direct; `None` when the package is not a direct
    pub fn transitives_of(&self, direct: &Package) -> Option<&BTreeSet<Package>> {
        self.dependency_graph.get(direct)
    }

    pub fn is_empty(&self) -> bool {
        self.directs.is_empty()
    }
}
