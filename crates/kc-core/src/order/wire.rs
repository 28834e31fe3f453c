//! Backend HTTP bodies and response classification.
//!
//! Status and body inspection lives here so that adapters only move bytes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    CheckinOutcome, OrderResult, PollOutcome, CHECKIN_FAILED_MESSAGE, WAITING_ORDER_MESSAGE,
};

pub const CHECKIN_PATH: &str = "api/checkin/checkin";
pub const LATEST_ORDER_PATH: &str = "api/orders/latest";

const STATUS_NOT_FOUND: u16 = 404;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckinRequestBody {
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PendingOrderDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinResponseBody {
    #[serde(default)]
    pub pending_order: Option<PendingOrderDto>,
    #[serde(default)]
    pub reward_points: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub pending_order: Option<PendingOrderDto>,
    #[serde(default)]
    pub reward_points: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestOrderBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub reward_points: Option<u32>,
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Classify a `POST /api/checkin/checkin` response.
///
/// `submitted_phone` fills in the customer phone when a recovered conflict
/// omits it.
pub fn classify_checkin(status: u16, body: &[u8], submitted_phone: &str) -> CheckinOutcome {
    if is_success(status) {
        return match serde_json::from_slice::<CheckinResponseBody>(body) {
            Ok(CheckinResponseBody {
                pending_order: Some(order),
                reward_points,
            }) => CheckinOutcome::Ready(OrderResult {
                customer_name: order.name.unwrap_or_default(),
                customer_phone: order.phone.unwrap_or_default(),
                reward_points: reward_points.unwrap_or(0),
            }),
            Ok(_) => CheckinOutcome::NoPendingOrder,
            Err(_) => CheckinOutcome::failed(),
        };
    }

    let error_body = serde_json::from_slice::<CheckinErrorBody>(body).unwrap_or_default();
    match error_body.message {
        Some(message) if message == WAITING_ORDER_MESSAGE => {
            let order = error_body.pending_order.unwrap_or_default();
            CheckinOutcome::ConflictRecovered(OrderResult {
                customer_name: order.name.unwrap_or_default(),
                customer_phone: order
                    .phone
                    .unwrap_or_else(|| submitted_phone.to_string()),
                reward_points: error_body.reward_points.unwrap_or(0),
            })
        }
        Some(message) if !message.is_empty() => CheckinOutcome::Failed { message },
        _ => CheckinOutcome::Failed {
            message: CHECKIN_FAILED_MESSAGE.to_string(),
        },
    }
}

/// Classify a `GET /api/orders/latest` response.
///
/// 404 is the steady state. A 2xx body counts as an order when it is a
/// truthy JSON object.
pub fn classify_latest_order(status: u16, body: &[u8]) -> PollOutcome {
    if status == STATUS_NOT_FOUND {
        return PollOutcome::NotFound;
    }
    if !is_success(status) {
        return PollOutcome::Failed {
            reason: format!("unexpected status {status}"),
        };
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return PollOutcome::NotFound;
    }

    let value = match serde_json::from_slice::<Value>(body) {
        Ok(value) => value,
        Err(err) => {
            return PollOutcome::Failed {
                reason: format!("malformed body: {err}"),
            }
        }
    };
    if !is_truthy(&value) {
        return PollOutcome::NotFound;
    }
    if !value.is_object() {
        return PollOutcome::Failed {
            reason: "latest order body is not an object".to_string(),
        };
    }

    match serde_json::from_value::<LatestOrderBody>(value) {
        Ok(order) => PollOutcome::OrderReady(OrderResult {
            customer_name: order.name.unwrap_or_default(),
            customer_phone: order.phone.unwrap_or_default(),
            reward_points: order.reward_points.unwrap_or(0),
        }),
        Err(err) => PollOutcome::Failed {
            reason: format!("malformed order: {err}"),
        },
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::NO_ORDER_MESSAGE;

    #[test]
    fn checkin_with_pending_order_is_ready() {
        let body = br#"{"pendingOrder":{"name":"Jane","phone":"5551234567"},"rewardPoints":10}"#;
        let outcome = classify_checkin(200, body, "5551234567");
        assert_eq!(
            outcome,
            CheckinOutcome::Ready(OrderResult {
                customer_name: "Jane".into(),
                customer_phone: "5551234567".into(),
                reward_points: 10,
            })
        );
    }

    #[test]
    fn checkin_reward_points_default_to_zero() {
        let body = br#"{"pendingOrder":{"name":"Jane","phone":"5551234567"}}"#;
        let outcome = classify_checkin(201, body, "5551234567");
        assert_eq!(outcome.order().map(|o| o.reward_points), Some(0));
    }

    #[test]
    fn checkin_with_null_pending_order_has_no_order() {
        assert_eq!(
            classify_checkin(200, br#"{"pendingOrder":null}"#, "5551234567"),
            CheckinOutcome::NoPendingOrder
        );
        assert_eq!(
            classify_checkin(200, br#"{}"#, "5551234567"),
            CheckinOutcome::NoPendingOrder
        );
    }

    #[test]
    fn checkin_waiting_order_conflict_is_recovered() {
        let body = br#"{"message":"You have a waiting order.","pendingOrder":{"name":"Tom","phone":"5559876543"}}"#;
        let outcome = classify_checkin(409, body, "5559876543");
        assert_eq!(
            outcome,
            CheckinOutcome::ConflictRecovered(OrderResult {
                customer_name: "Tom".into(),
                customer_phone: "5559876543".into(),
                reward_points: 0,
            })
        );
    }

    #[test]
    fn checkin_conflict_without_phone_uses_submitted_number() {
        let body = br#"{"message":"You have a waiting order.","pendingOrder":{"name":"Tom"}}"#;
        let outcome = classify_checkin(409, body, "5550001111");
        assert_eq!(
            outcome.order().map(|o| o.customer_phone.as_str()),
            Some("5550001111")
        );
    }

    #[test]
    fn checkin_other_error_message_is_surfaced() {
        let body = br#"{"message":"Phone number is required"}"#;
        assert_eq!(
            classify_checkin(400, body, ""),
            CheckinOutcome::Failed {
                message: "Phone number is required".into()
            }
        );
    }

    #[test]
    fn checkin_unrecognized_failure_shape_is_generic() {
        assert_eq!(
            classify_checkin(500, b"<html>oops</html>", "5551234567"),
            CheckinOutcome::failed()
        );
        assert_eq!(
            classify_checkin(200, b"not json", "5551234567"),
            CheckinOutcome::failed()
        );
        assert_ne!(CHECKIN_FAILED_MESSAGE, NO_ORDER_MESSAGE);
    }

    #[test]
    fn latest_order_404_is_not_found() {
        assert_eq!(classify_latest_order(404, b""), PollOutcome::NotFound);
        assert!(!classify_latest_order(404, b"{\"message\":\"none\"}").is_reportable());
    }

    #[test]
    fn latest_order_object_is_ready() {
        let body = br#"{"name":"Amy","phone":"555000111","rewardPoints":5}"#;
        assert_eq!(
            classify_latest_order(200, body),
            PollOutcome::OrderReady(OrderResult {
                customer_name: "Amy".into(),
                customer_phone: "555000111".into(),
                reward_points: 5,
            })
        );
    }

    #[test]
    fn latest_order_empty_object_is_still_an_order() {
        assert_eq!(
            classify_latest_order(200, b"{}"),
            PollOutcome::OrderReady(OrderResult::default())
        );
    }

    #[test]
    fn latest_order_falsy_body_is_not_found() {
        assert_eq!(classify_latest_order(200, b""), PollOutcome::NotFound);
        assert_eq!(classify_latest_order(200, b"null"), PollOutcome::NotFound);
        assert_eq!(classify_latest_order(204, b"  "), PollOutcome::NotFound);
        assert_eq!(classify_latest_order(200, b"false"), PollOutcome::NotFound);
        assert_eq!(classify_latest_order(200, b"0"), PollOutcome::NotFound);
        assert_eq!(classify_latest_order(200, b"\"\""), PollOutcome::NotFound);
    }

    #[test]
    fn latest_order_server_error_is_reportable() {
        let outcome = classify_latest_order(503, b"");
        assert!(outcome.is_reportable());
        assert!(classify_latest_order(200, b"{broken").is_reportable());
        assert!(classify_latest_order(200, b"[1,2]").is_reportable());
    }
}
