//! Remote input commands relayed over the kiosk's socket.io channel.

use std::sync::Arc;

use kc_core::ports::KioskInputPort;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

pub const RECEIVE_PHONE_NUMBER_EVENT: &str = "receivePhoneNumber";
pub const CHECKIN_EVENT: &str = "checkin";
pub const PHONE_RESPONSE_EVENT: &str = "phoneResponse";

/// Events the kiosk subscribes to.
pub const REMOTE_EVENTS: [&str; 3] = [
    RECEIVE_PHONE_NUMBER_EVENT,
    CHECKIN_EVENT,
    PHONE_RESPONSE_EVENT,
];

const PHONE_NUMBER_DIGITS: usize = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhoneNumberPayload {
    phone_number: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct PhoneResponsePayload {
    status: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCommand {
    /// A valid phone number to enter.
    PhoneNumber(String),
    /// Phone number that failed validation; raw value kept for logging.
    InvalidPhoneNumber(String),
    /// Check in with the entered phone number.
    Checkin,
    /// Server accepted the phone number; check in with it.
    PhoneAccepted { message: String },
    PhoneRejected { message: String },
}

/// Exactly ten ASCII digits.
pub fn is_valid_phone_number(phone: &str) -> bool {
    phone.len() == PHONE_NUMBER_DIGITS && phone.bytes().all(|b| b.is_ascii_digit())
}

impl RemoteCommand {
    /// Map a socket event and its first argument to a command.
    ///
    /// Returns `None` for events the kiosk does not handle.
    pub fn parse(event: &str, payload: &Value) -> Option<Self> {
        match event {
            RECEIVE_PHONE_NUMBER_EVENT => {
                let raw = serde_json::from_value::<PhoneNumberPayload>(payload.clone())
                    .ok()
                    .and_then(|p| p.phone_number);
                Some(match raw {
                    Some(Value::String(phone)) if is_valid_phone_number(&phone) => {
                        RemoteCommand::PhoneNumber(phone)
                    }
                    Some(Value::String(phone)) => RemoteCommand::InvalidPhoneNumber(phone),
                    Some(other) => RemoteCommand::InvalidPhoneNumber(other.to_string()),
                    None => RemoteCommand::InvalidPhoneNumber(String::new()),
                })
            }
            CHECKIN_EVENT => Some(RemoteCommand::Checkin),
            PHONE_RESPONSE_EVENT => {
                let response = serde_json::from_value::<PhoneResponsePayload>(payload.clone())
                    .unwrap_or(PhoneResponsePayload {
                        status: None,
                        message: None,
                    });
                let message = response.message.unwrap_or_default();
                Some(if response.status.as_deref() == Some("success") {
                    RemoteCommand::PhoneAccepted { message }
                } else {
                    RemoteCommand::PhoneRejected { message }
                })
            }
            _ => None,
        }
    }
}

/// Applies remote commands to the kiosk through its input port.
pub struct RemoteCommandHandler {
    input: Arc<dyn KioskInputPort>,
}

impl RemoteCommandHandler {
    pub fn new(input: Arc<dyn KioskInputPort>) -> Self {
        Self { input }
    }

    pub async fn handle(&self, command: RemoteCommand) -> anyhow::Result<()> {
        match command {
            RemoteCommand::PhoneNumber(phone) => {
                info!(%phone, "received phone number from server");
                self.input.enter_phone_number(&phone).await
            }
            RemoteCommand::InvalidPhoneNumber(raw) => {
                warn!(%raw, "invalid phone number received from server");
                Ok(())
            }
            RemoteCommand::Checkin => {
                info!("check-in requested by server");
                self.input.submit_entered_phone().await
            }
            RemoteCommand::PhoneAccepted { message } => {
                info!(%message, "phone number sent successfully");
                self.input.submit_entered_phone().await
            }
            RemoteCommand::PhoneRejected { message } => {
                warn!(%message, "server rejected phone number");
                Ok(())
            }
        }
    }

    /// Parse and apply one socket event. Failures are logged, never raised,
    /// so one bad event cannot stop the listener.
    pub async fn handle_event(&self, event: &str, payload: &Value) {
        let Some(command) = RemoteCommand::parse(event, payload) else {
            debug!(event, "ignoring unhandled remote event");
            return;
        };
        if let Err(err) = self.handle(command).await {
            warn!(event, error = %err, "failed to apply remote command");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Enter(String),
        Submit,
    }

    #[derive(Default)]
    struct RecordingInput {
        calls: Mutex<Vec<Call>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl KioskInputPort for RecordingInput {
        async fn enter_phone_number(&self, phone: &str) -> anyhow::Result<()> {
            self.calls.lock().await.push(Call::Enter(phone.to_string()));
            if self.fail {
                anyhow::bail!("kiosk is not running");
            }
            Ok(())
        }

        async fn submit_entered_phone(&self) -> anyhow::Result<()> {
            self.calls.lock().await.push(Call::Submit);
            Ok(())
        }
    }

    fn handler_with(input: &Arc<RecordingInput>) -> RemoteCommandHandler {
        RemoteCommandHandler::new(input.clone())
    }

    #[test]
    fn phone_number_must_be_ten_digits() {
        assert!(is_valid_phone_number("5551234567"));
        assert!(!is_valid_phone_number("555123456"));
        assert!(!is_valid_phone_number("55512345678"));
        assert!(!is_valid_phone_number("555-123-45"));
        assert!(!is_valid_phone_number(""));
    }

    #[test]
    fn parse_receive_phone_number() {
        assert_eq!(
            RemoteCommand::parse(RECEIVE_PHONE_NUMBER_EVENT, &json!({ "phoneNumber": "5551234567" })),
            Some(RemoteCommand::PhoneNumber("5551234567".into()))
        );
        assert_eq!(
            RemoteCommand::parse(RECEIVE_PHONE_NUMBER_EVENT, &json!({ "phoneNumber": "12ab" })),
            Some(RemoteCommand::InvalidPhoneNumber("12ab".into()))
        );
        assert_eq!(
            RemoteCommand::parse(RECEIVE_PHONE_NUMBER_EVENT, &json!({ "phoneNumber": 5551234567u64 })),
            Some(RemoteCommand::InvalidPhoneNumber("5551234567".into()))
        );
        assert_eq!(
            RemoteCommand::parse(RECEIVE_PHONE_NUMBER_EVENT, &Value::Null),
            Some(RemoteCommand::InvalidPhoneNumber(String::new()))
        );
    }

    #[test]
    fn parse_phone_response_and_checkin() {
        assert_eq!(
            RemoteCommand::parse(
                PHONE_RESPONSE_EVENT,
                &json!({ "status": "success", "message": "ok" })
            ),
            Some(RemoteCommand::PhoneAccepted {
                message: "ok".into()
            })
        );
        assert_eq!(
            RemoteCommand::parse(
                PHONE_RESPONSE_EVENT,
                &json!({ "status": "error", "message": "unknown phone" })
            ),
            Some(RemoteCommand::PhoneRejected {
                message: "unknown phone".into()
            })
        );
        assert_eq!(
            RemoteCommand::parse(CHECKIN_EVENT, &json!({ "phoneNumber": "5551234567" })),
            Some(RemoteCommand::Checkin)
        );
        assert_eq!(RemoteCommand::parse("message", &Value::Null), None);
    }

    #[tokio::test]
    async fn events_drive_the_kiosk_input_port() {
        let input = Arc::new(RecordingInput::default());
        let handler = handler_with(&input);

        handler
            .handle_event(RECEIVE_PHONE_NUMBER_EVENT, &json!({ "phoneNumber": "5551234567" }))
            .await;
        handler
            .handle_event(RECEIVE_PHONE_NUMBER_EVENT, &json!({ "phoneNumber": "555" }))
            .await;
        handler.handle_event(CHECKIN_EVENT, &json!({})).await;
        handler
            .handle_event(PHONE_RESPONSE_EVENT, &json!({ "status": "success", "message": "ok" }))
            .await;
        handler
            .handle_event(PHONE_RESPONSE_EVENT, &json!({ "status": "error", "message": "no" }))
            .await;
        handler.handle_event("unrelated", &json!({})).await;

        assert_eq!(
            *input.calls.lock().await,
            vec![
                Call::Enter("5551234567".into()),
                Call::Submit,
                Call::Submit
            ]
        );
    }

    #[tokio::test]
    async fn port_errors_are_reported_not_raised() {
        let input = Arc::new(RecordingInput {
            fail: true,
            ..RecordingInput::default()
        });
        let handler = handler_with(&input);

        assert!(handler
            .handle(RemoteCommand::PhoneNumber("5551234567".into()))
            .await
            .is_err());
        handler
            .handle_event(RECEIVE_PHONE_NUMBER_EVENT, &json!({ "phoneNumber": "5551234567" }))
            .await;
        assert_eq!(input.calls.lock().await.len(), 2);
    }
}
