use crate::shared::Result;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Builds the HTTP client shared by the network adapters
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    let user_agent = format!("stack-aggregator/{}", env!("CARGO_PKG_VERSION"));
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?)
}

/// Joins a base URL and a path without doubling the slash
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Runs `operation` up to `max_attempts` times with a linear backoff
///
/// `max_attempts` of zero is treated as one attempt.
pub(crate) async fn with_retry<T, F, Fut>(max_attempts: u32, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                debug!(attempt, error = %e, "request failed, retrying");
                tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
