/// Driving port for kiosk input that arrives from outside the touch screen,
/// such as a companion device relaying the customer's phone number.
#[async_trait::async_trait]
pub trait KioskInputPort: Send + Sync {
    /// Replace the entered phone number.
    async fn enter_phone_number(&self, phone: &str) -> anyhow::Result<()>;

    /// Start a check-in with the currently entered phone number.
    ///
    /// Returns once the request is submitted; the result arrives as a state
    /// change.
    async fn submit_entered_phone(&self) -> anyhow::Result<()>;
}
