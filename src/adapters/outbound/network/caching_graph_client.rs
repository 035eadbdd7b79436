use crate::ports::outbound::{GraphPackageRecord, GraphRepository};
use crate::shared::Result;
use crate::stack_analysis::domain::{Ecosystem, Package};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct VersionsKey {
    ecosystem: Ecosystem,
    package_name: String,
}

/// CachingGraphRepository memoizes the non-vulnerable version lookups of a
/// GraphRepository.
///
/// Several vulnerable records of one stack can share a package name (a
/// package pinned at two versions), and each of them would otherwise issue
/// the same fallback query. Package detail queries are passed through
/// untouched; batches never repeat within a request.
pub struct CachingGraphRepository<R: GraphRepository> {
    inner: R,
    versions: Arc<DashMap<VersionsKey, Vec<String>>>,
}

impl<R: GraphRepository> CachingGraphRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            versions: Arc::new(DashMap::new()),
        }
    }

    /// Returns the current cache size (for testing/monitoring)
    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.versions.len()
    }
}

#[async_trait]
impl<R: GraphRepository> GraphRepository for CachingGraphRepository<R> {
    async fn fetch_package_records(
        &self,
        ecosystem: Ecosystem,
        packages: &[Package],
    ) -> Result<Vec<GraphPackageRecord>> {
        self.inner.fetch_package_records(ecosystem, packages).await
    }

    async fn fetch_non_vulnerable_versions(
        &self,
        ecosystem: Ecosystem,
        package_name: &str,
    ) -> Result<Vec<String>> {
        let key = VersionsKey {
            ecosystem,
            package_name: package_name.to_string(),
        };

        if let Some(cached) = self.versions.get(&key) {
            return Ok(cached.clone());
        }

        // Failures are not cached
        let versions = self
            .inner
            .fetch_non_vulnerable_versions(ecosystem, package_name)
            .await?;
        self.versions.insert(key, versions.clone());

        Ok(versions)
    }
}
