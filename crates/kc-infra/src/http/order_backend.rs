use std::time::Duration;

use async_trait::async_trait;
use kc_core::order::wire::{CheckinRequestBody, CHECKIN_PATH, LATEST_ORDER_PATH};
use kc_core::order::{classify_checkin, classify_latest_order};
use kc_core::ports::{BackendError, OrderBackendPort};
use kc_core::{CheckinOutcome, PollOutcome};
use reqwest::Response;
use tracing::{debug, info_span, Instrument};

/// Order backend reached over HTTP.
pub struct HttpOrderBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOrderBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Network(format!("failed to build HTTP client: {e}")))?;

        let base_url = normalize_base_url(base_url);
        reqwest::Url::parse(&base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{base_url}: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(base_url: &str) -> String {
    format!("{}/", base_url.trim_end_matches('/'))
}

async fn read_body(response: Response) -> Result<(u16, Vec<u8>), BackendError> {
    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    Ok((status, body.to_vec()))
}

fn map_reqwest_error(error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::Timeout
    } else if error.is_decode() || error.is_body() {
        BackendError::Decode(error.to_string())
    } else {
        BackendError::Network(error.to_string())
    }
}

#[async_trait]
impl OrderBackendPort for HttpOrderBackend {
    async fn check_in(&self, phone: &str) -> Result<CheckinOutcome, BackendError> {
        let url = self.endpoint(CHECKIN_PATH);
        let span = info_span!("infra.http.check_in", url = %url);
        async {
            let response = self
                .client
                .post(&url)
                .json(&CheckinRequestBody {
                    phone: phone.to_string(),
                })
                .send()
                .await
                .map_err(map_reqwest_error)?;
            let (status, body) = read_body(response).await?;
            debug!(status, bytes = body.len(), "check-in response received");
            Ok(classify_checkin(status, &body, phone))
        }
        .instrument(span)
        .await
    }

    async fn latest_order(&self) -> Result<PollOutcome, BackendError> {
        let url = self.endpoint(LATEST_ORDER_PATH);
        let span = info_span!("infra.http.latest_order", url = %url);
        async {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(map_reqwest_error)?;
            let (status, body) = read_body(response).await?;
            debug!(status, bytes = body.len(), "latest order response received");
            Ok(classify_latest_order(status, &body))
        }
        .instrument(span)
        .await
    }
}
