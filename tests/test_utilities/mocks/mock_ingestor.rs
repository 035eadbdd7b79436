use async_trait::async_trait;
use stack_aggregator::prelude::*;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Mock UnknownPackageIngestor recording every attempt
#[derive(Default, Clone)]
pub struct MockIngestor {
    failing: HashSet<String>,
    pub attempts: Arc<Mutex<Vec<String>>>,
}

impl MockIngestor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn sorted_attempts(&self) -> Vec<String> {
        let mut attempts = self.attempts.lock().unwrap().clone();
        attempts.sort();
        attempts
    }
}

#[async_trait]
impl UnknownPackageIngestor for MockIngestor {
    async fn ingest(&self, ecosystem: Ecosystem, package: &Package) -> Result<()> {
        self.attempts
            .lock()
            .unwrap()
            .push(format!("{}/{}", ecosystem, package));
        if self.failing.contains(package.name()) {
            anyhow::bail!("ingestion endpoint returned HTTP 503");
        }
        Ok(())
    }
}
