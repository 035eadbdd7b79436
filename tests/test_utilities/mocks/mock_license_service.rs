use async_trait::async_trait;
use stack_aggregator::ports::outbound::{LicenseScoringPackage, StackLicenseResponse};
use stack_aggregator::prelude::*;
use std::sync::{Arc, Mutex};

/// Mock LicenseScoringService answering with a fixed JSON payload
#[derive(Clone)]
pub struct MockLicenseService {
    response: Option<serde_json::Value>,
    should_fail: bool,
    pub payloads: Arc<Mutex<Vec<Vec<LicenseScoringPackage>>>>,
}

impl MockLicenseService {
    pub fn responding(response: serde_json::Value) -> Self {
        Self {
            response: Some(response),
            should_fail: false,
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn empty() -> Self {
        Self {
            response: None,
            should_fail: false,
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_failure() -> Self {
        Self {
            response: None,
            should_fail: true,
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn last_payload(&self) -> Vec<LicenseScoringPackage> {
        self.payloads
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl LicenseScoringService for MockLicenseService {
    async fn score_stack(
        &self,
        packages: &[LicenseScoringPackage],
    ) -> Result<Option<StackLicenseResponse>> {
        self.payloads.lock().unwrap().push(packages.to_vec());
        if self.should_fail {
            anyhow::bail!("Mock license service failure");
        }
        match &self.response {
            Some(json) => Ok(Some(serde_json::from_value(json.clone())?)),
            None => Ok(None),
        }
    }
}
