use super::http::{build_client, join_url, with_retry};
use crate::ports::outbound::UnknownPackageIngestor;
use crate::shared::Result;
use crate::stack_analysis::domain::{Ecosystem, Package};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const COMPONENT_ANALYSES_PATH: &str = "api/v1/component-analyses";

#[derive(Serialize)]
struct AnalysisRequest<'a> {
    ecosystem: &'a str,
    package: &'a str,
    version: &'a str,
    force: bool,
    force_graph_sync: bool,
}

/// IngestionClient adapter scheduling analysis of unseen packages
///
/// Requests a forced graph sync but never a forced re-analysis, so packages
/// that are already queued are not analyzed twice.
pub struct IngestionClient {
    client: reqwest::Client,
    endpoint: String,
    max_retries: u32,
}

impl IngestionClient {
    pub fn new(base_url: &str, timeout: Duration, max_retries: u32) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: join_url(base_url, COMPONENT_ANALYSES_PATH),
            max_retries,
        })
    }
}

#[async_trait]
impl UnknownPackageIngestor for IngestionClient {
    async fn ingest(&self, ecosystem: Ecosystem, package: &Package) -> Result<()> {
        let request = AnalysisRequest {
            ecosystem: ecosystem.as_str(),
            package: package.name(),
            version: package.version(),
            force: false,
            force_graph_sync: true,
        };
        let (client, endpoint, request) = (&self.client, self.endpoint.as_str(), &request);

        with_retry(self.max_retries, || async move {
            let response = client.post(endpoint).json(request).send().await?;
            let status = response.status();
            if !status.is_success() {
                anyhow::bail!("ingestion service returned HTTP {}", status);
            }
            Ok(())
        })
        .await?;

        debug!(%ecosystem, package = %package, "ingestion scheduled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_ingest_posts_analysis_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/component-analyses"))
            .and(body_json(json!({
                "ecosystem": "npm",
                "package": "left-pad",
                "version": "1.3.0",
                "force": false,
                "force_graph_sync": true
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let client = IngestionClient::new(&server.uri(), Duration::from_secs(5), 1).unwrap();
        let package = Package::new("left-pad".to_string(), "1.3.0".to_string()).unwrap();

        client.ingest(Ecosystem::Npm, &package).await.unwrap();
    }

    #[tokio::test]
    async fn test_ingest_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .expect(2)
            .mount(&server)
            .await;

        let client = IngestionClient::new(&server.uri(), Duration::from_secs(5), 2).unwrap();
        let package = Package::new("ghost".to_string(), "0.0.1".to_string()).unwrap();

        let err = client.ingest(Ecosystem::Pypi, &package).await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
