use super::http::{build_client, join_url, with_retry};
use crate::ports::outbound::{LicenseScoringPackage, LicenseScoringService, StackLicenseResponse};
use crate::shared::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const STACK_LICENSE_PATH: &str = "api/v1/stack_license";

#[derive(Serialize)]
struct StackLicenseRequest<'a> {
    packages: &'a [LicenseScoringPackage],
}

/// LicenseScoringClient adapter for the license analysis REST service
pub struct LicenseScoringClient {
    client: reqwest::Client,
    endpoint: String,
    max_retries: u32,
}

impl LicenseScoringClient {
    pub fn new(base_url: &str, timeout: Duration, max_retries: u32) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: join_url(base_url, STACK_LICENSE_PATH),
            max_retries,
        })
    }
}

/// Treats an empty body, `null` and `{}` as "no answer"
fn parse_response(body: &str) -> Result<Option<StackLicenseResponse>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(body)?;
    match &value {
        Value::Null => Ok(None),
        Value::Object(map) if map.is_empty() => Ok(None),
        _ => Ok(Some(serde_json::from_value(value)?)),
    }
}

#[async_trait]
impl LicenseScoringService for LicenseScoringClient {
    async fn score_stack(
        &self,
        packages: &[LicenseScoringPackage],
    ) -> Result<Option<StackLicenseResponse>> {
        let request = StackLicenseRequest { packages };
        let (client, endpoint, request) = (&self.client, self.endpoint.as_str(), &request);

        let body = with_retry(self.max_retries, || async move {
            let response = client.post(endpoint).json(request).send().await?;
            let status = response.status();
            if !status.is_success() {
                anyhow::bail!("license service returned HTTP {}", status);
            }
            Ok(response.text().await?)
        })
        .await?;

        debug!(packages = packages.len(), bytes = body.len(), "license service answered");
        parse_response(&body)
    }
}
