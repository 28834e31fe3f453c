use serde::{Deserialize, Serialize};

use crate::order::OrderResult;

/// Screen currently shown by the kiosk.
///
/// Exactly one screen is active at a time. `Checkin` is the start state; the
/// welcome screen is only reachable through an explicit tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Welcome,
    #[default]
    Checkin,
    Success,
}

/// Working state owned by the screen controller.
///
/// Nothing here is persisted. The order fields only carry meaning while
/// `screen == Screen::Success` and are cleared on every return to `Checkin`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct KioskState {
    pub screen: Screen,
    /// Phone number being composed or submitted.
    pub phone_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub reward_points: u32,
    /// User-facing message explaining the last failed check-in.
    pub checkin_error: Option<String>,

    /// A user check-in request is awaiting the backend.
    pub checkin_in_flight: bool,
    /// A latest-order poll is awaiting the backend.
    pub poll_in_flight: bool,
    /// Generation of the most recently armed reset timer.
    pub reset_generation: u64,
    /// Generation of the most recently started poll interval.
    pub poll_generation: u64,
}

impl KioskState {
    /// The order shown on the success screen, if any.
    pub fn order(&self) -> Option<OrderResult> {
        if self.screen != Screen::Success {
            return None;
        }
        Some(OrderResult {
            customer_name: self.customer_name.clone(),
            customer_phone: self.customer_phone.clone(),
            reward_points: self.reward_points,
        })
    }

    pub(crate) fn apply_order(&mut self, order: OrderResult) {
        self.customer_name = order.customer_name;
        self.customer_phone = order.customer_phone;
        self.reward_points = order.reward_points;
    }

    pub(crate) fn clear_customer(&mut self) {
        self.phone_number.clear();
        self.customer_name.clear();
        self.customer_phone.clear();
        self.reward_points = 0;
        self.checkin_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_starts_on_checkin_screen() {
        let state = KioskState::default();
        assert_eq!(state.screen, Screen::Checkin);
        assert!(state.phone_number.is_empty());
        assert_eq!(state.checkin_error, None);
    }

    #[test]
    fn order_is_only_exposed_on_success_screen() {
        let mut state = KioskState::default();
        state.apply_order(OrderResult {
            customer_name: "Jane".into(),
            customer_phone: "5551234567".into(),
            reward_points: 10,
        });
        assert_eq!(state.order(), None);

        state.screen = Screen::Success;
        let order = state.order().expect("order on success screen");
        assert_eq!(order.customer_name, "Jane");
        assert_eq!(order.reward_points, 10);
    }

    #[test]
    fn screen_serializes_lowercase() {
        let json = serde_json::to_string(&Screen::Success).unwrap();
        assert_eq!(json, "\"success\"");
    }
}
