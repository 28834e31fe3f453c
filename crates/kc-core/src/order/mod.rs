//! Order lookup results and the backend wire contract.

pub mod wire;

use serde::{Deserialize, Serialize};

pub use wire::{classify_checkin, classify_latest_order};

/// Shown when the backend has no pending order for the phone number.
pub const NO_ORDER_MESSAGE: &str = "You have no order";
/// Backend conflict message that the kiosk treats as a successful check-in.
pub const WAITING_ORDER_MESSAGE: &str = "You have a waiting order.";
/// Generic message for failed check-ins.
pub const CHECKIN_FAILED_MESSAGE: &str = "Failed to check in";

/// Outcome of a successful order lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderResult {
    pub customer_name: String,
    pub customer_phone: String,
    pub reward_points: u32,
}

/// Classified answer to a check-in request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckinOutcome {
    /// A pending order exists for the phone number.
    Ready(OrderResult),
    /// The backend reported a waiting order; recovered as a success.
    ConflictRecovered(OrderResult),
    /// The backend has no pending order for the phone number.
    NoPendingOrder,
    /// Transient failure; `message` is shown to the customer.
    Failed { message: String },
}

impl CheckinOutcome {
    pub fn failed() -> Self {
        CheckinOutcome::Failed {
            message: CHECKIN_FAILED_MESSAGE.to_string(),
        }
    }

    pub fn order(&self) -> Option<&OrderResult> {
        match self {
            CheckinOutcome::Ready(order) | CheckinOutcome::ConflictRecovered(order) => Some(order),
            _ => None,
        }
    }
}

/// Classified answer to a latest-order poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    OrderReady(OrderResult),
    /// No order is ready. Expected steady state, never reported.
    NotFound,
    /// Polling failure; logged and retried on the next tick.
    Failed { reason: String },
}

impl PollOutcome {
    /// Whether this outcome should be logged as a polling error.
    pub fn is_reportable(&self) -> bool {
        matches!(self, PollOutcome::Failed { .. })
    }
}
