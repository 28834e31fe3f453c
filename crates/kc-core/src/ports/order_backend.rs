use async_trait::async_trait;

use crate::order::{CheckinOutcome, PollOutcome};

/// Transport-level failures talking to the order backend.
///
/// HTTP statuses are not errors here; they are classified into outcomes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("backend request timed out")]
    Timeout,
    #[error("backend unreachable: {0}")]
    Network(String),
    #[error("failed to read backend response: {0}")]
    Decode(String),
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

#[async_trait]
pub trait OrderBackendPort: Send + Sync {
    /// `POST api/checkin/checkin` for `phone`.
    async fn check_in(&self, phone: &str) -> Result<CheckinOutcome, BackendError>;

    /// `GET api/orders/latest`.
    async fn latest_order(&self) -> Result<PollOutcome, BackendError>;
}
