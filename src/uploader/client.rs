use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tokio::time::{sleep, Duration};

use crate::errors::NodeResult;
use crate::validation::InputValidator;

use super::retry::RetryConfig;

/// Per-attempt timeout for a single PUT request.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Pre-signed OSS URLs are signed against a wildcard image content type.
const UPLOAD_CONTENT_TYPE: &str = "image/*";

/// One upload: where the bytes go and the bytes themselves.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub destination_url: String,
    pub payload: Vec<u8>,
}

impl UploadRequest {
    pub fn new(destination_url: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            destination_url: destination_url.into(),
            payload,
        }
    }
}

/// Terminal result of an upload once retries are exhausted or an attempt
/// succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub succeeded: bool,
    pub detail: String,
}

impl UploadOutcome {
    fn delivered(status: u16) -> Self {
        Self {
            succeeded: true,
            detail: format!("HTTP {}", status),
        }
    }

    fn exhausted(attempts: u32, last_error: &str) -> Self {
        Self {
            succeeded: false,
            detail: format!(
                "exhausted retries after {} attempts, last error: {}",
                attempts, last_error
            ),
        }
    }
}

/// Outcome of a single PUT attempt. Network and timeout failures carry no
/// status code; HTTP-level rejections do.
#[derive(Debug)]
enum AttemptOutcome {
    Delivered { status: u16 },
    Failed { status: Option<u16>, error: String },
}

/// OSS delivery client: PUTs a payload to a pre-signed URL with bounded
/// retries. Attempts run strictly one at a time.
pub struct OssClient {
    client: Client,
    retry: RetryConfig,
}

impl OssClient {
    pub fn new() -> Self {
        Self::with_retry_config(RetryConfig::default())
    }

    pub fn with_retry_config(retry: RetryConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(UPLOAD_TIMEOUT)
                .build()
                .expect("Failed to create OSS HTTP client"),
            retry,
        }
    }

    /// Upload the full payload, retrying failed attempts up to the configured
    /// limit. An invalid destination URL fails before any network call; an
    /// upload that runs out of attempts resolves to a failed [`UploadOutcome`]
    /// rather than an error.
    pub async fn upload(&self, request: &UploadRequest) -> NodeResult<UploadOutcome> {
        InputValidator::validate_destination_url(&request.destination_url)?;

        let max_attempts = self.retry.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            log::info!(
                "[upload] ({}/{}) PUT {} ({} bytes)",
                attempt,
                max_attempts,
                request.destination_url,
                request.payload.len()
            );

            match self.attempt_put(request).await {
                AttemptOutcome::Delivered { status } => {
                    log::info!(
                        "[upload] delivered to {} (HTTP {})",
                        request.destination_url,
                        status
                    );
                    return Ok(UploadOutcome::delivered(status));
                }
                AttemptOutcome::Failed { status, error } => {
                    log::error!(
                        "[upload] attempt {}/{} failed for {} (status: {:?}): {}",
                        attempt,
                        max_attempts,
                        request.destination_url,
                        status,
                        error
                    );
                    last_error = error;

                    if attempt < max_attempts {
                        let delay = self.retry.policy.delay_for_attempt(attempt);
                        log::info!("[upload] retrying in {:?}", delay);
                        sleep(delay).await;
                    }
                }
            }
        }

        Ok(UploadOutcome::exhausted(max_attempts, &last_error))
    }

    /// One PUT of the full payload. The request body is rebuilt from the same
    /// buffer on every call, so retries always send identical bytes starting
    /// at offset zero.
    async fn attempt_put(&self, request: &UploadRequest) -> AttemptOutcome {
        let response = self
            .client
            .put(&request.destination_url)
            .header(CONTENT_TYPE, UPLOAD_CONTENT_TYPE)
            .body(request.payload.clone())
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status();
                if status.is_client_error() || status.is_server_error() {
                    AttemptOutcome::Failed {
                        status: Some(status.as_u16()),
                        error: format!("HTTP {}", status),
                    }
                } else {
                    AttemptOutcome::Delivered {
                        status: status.as_u16(),
                    }
                }
            }
            Err(e) => AttemptOutcome::Failed {
                status: None,
                error: e.to_string(),
            },
        }
    }
}

impl Default for OssClient {
    fn default() -> Self {
        Self::new()
    }
}
