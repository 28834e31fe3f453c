//! Kiosk screen state machine.
//!
//! Defines a pure state transition function for the check-in screen flow.
//! Timers and backend calls are requested through [`KioskAction`]s and their
//! results come back as [`KioskEvent`]s.

use crate::kiosk::state::{KioskState, Screen};
use crate::order::{CheckinOutcome, OrderResult, PollOutcome, NO_ORDER_MESSAGE};

/// Events that drive the kiosk flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KioskEvent {
    /// Customer tapped the welcome screen.
    WelcomeTapped,
    /// Phone number input changed.
    PhoneNumberChanged { phone: String },
    /// Customer asked to check in with a phone number.
    CheckinRequested { phone: String },
    /// Check in with whatever phone number is currently entered.
    EnteredPhoneSubmitted,
    /// Backend answered a check-in request (network callback).
    CheckinResolved { outcome: CheckinOutcome },
    /// Poll interval ticked.
    PollTick { generation: u64 },
    /// Backend answered a latest-order poll (network callback).
    PollResolved { generation: u64, outcome: PollOutcome },
    /// Success-screen dwell elapsed.
    ResetTimerFired { generation: u64 },
    /// External reset back to the check-in screen.
    ForceReset,
}

/// Side-effects produced by state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KioskAction {
    /// Send a check-in lookup for `phone`.
    SubmitCheckin { phone: String },
    /// Ask the backend for the latest ready order.
    PollLatestOrder { generation: u64 },
    /// Arm the one-shot reset timer, replacing any previous one.
    ArmResetTimer { generation: u64 },
    /// Cancel the pending reset timer.
    CancelResetTimer,
    /// Start the poll interval, replacing any previous one.
    StartPolling { generation: u64 },
    /// Stop the poll interval.
    StopPolling,
}

/// Pure kiosk state machine.
///
/// Contains no side effects; the orchestrator executes the returned actions.
pub struct KioskStateMachine;

impl KioskStateMachine {
    /// Initial state together with the actions needed to enter it.
    pub fn boot() -> (KioskState, Vec<KioskAction>) {
        let mut state = KioskState::default();
        let mut actions = Vec::new();
        start_polling(&mut state, &mut actions);
        (state, actions)
    }

    pub fn transition(state: KioskState, event: KioskEvent) -> (KioskState, Vec<KioskAction>) {
        let mut state = state;
        let mut actions = Vec::new();

        match (state.screen, event) {
            (Screen::Welcome, KioskEvent::WelcomeTapped) => {
                enter_checkin(&mut state, &mut actions);
            }
            (Screen::Checkin, KioskEvent::PhoneNumberChanged { phone }) => {
                state.phone_number = phone;
            }
            (Screen::Checkin, KioskEvent::CheckinRequested { phone }) => {
                submit_checkin(&mut state, &mut actions, phone);
            }
            (Screen::Checkin, KioskEvent::EnteredPhoneSubmitted) => {
                let phone = state.phone_number.clone();
                submit_checkin(&mut state, &mut actions, phone);
            }
            (screen, KioskEvent::CheckinResolved { outcome }) => {
                state.checkin_in_flight = false;
                match outcome {
                    CheckinOutcome::Ready(order) | CheckinOutcome::ConflictRecovered(order) => {
                        enter_success(&mut state, &mut actions, order);
                    }
                    CheckinOutcome::NoPendingOrder if screen == Screen::Checkin => {
                        state.checkin_error = Some(NO_ORDER_MESSAGE.to_string());
                    }
                    CheckinOutcome::Failed { message } if screen == Screen::Checkin => {
                        state.checkin_error = Some(message);
                    }
                    _ => {}
                }
            }
            (Screen::Checkin, KioskEvent::PollTick { generation }) => {
                if generation == state.poll_generation && !state.poll_in_flight {
                    state.poll_in_flight = true;
                    actions.push(KioskAction::PollLatestOrder { generation });
                }
            }
            (screen, KioskEvent::PollResolved { generation, outcome }) => {
                if generation == state.poll_generation {
                    state.poll_in_flight = false;
                    if let (Screen::Checkin, PollOutcome::OrderReady(order)) = (screen, outcome) {
                        enter_success(&mut state, &mut actions, order);
                    }
                }
            }
            (Screen::Success, KioskEvent::ResetTimerFired { generation }) => {
                if generation == state.reset_generation {
                    state.clear_customer();
                    enter_checkin(&mut state, &mut actions);
                }
            }
            (screen, KioskEvent::ForceReset) => {
                if screen == Screen::Success {
                    actions.push(KioskAction::CancelResetTimer);
                }
                state.clear_customer();
                enter_checkin(&mut state, &mut actions);
            }
            _ => {}
        }

        (state, actions)
    }
}

fn submit_checkin(state: &mut KioskState, actions: &mut Vec<KioskAction>, phone: String) {
    if state.checkin_in_flight {
        return;
    }
    state.checkin_error = None;
    state.phone_number = phone.clone();
    state.checkin_in_flight = true;
    actions.push(KioskAction::SubmitCheckin { phone });
}

fn enter_checkin(state: &mut KioskState, actions: &mut Vec<KioskAction>) {
    if state.screen == Screen::Checkin {
        return;
    }
    state.screen = Screen::Checkin;
    start_polling(state, actions);
}

fn start_polling(state: &mut KioskState, actions: &mut Vec<KioskAction>) {
    state.poll_generation += 1;
    state.poll_in_flight = false;
    actions.push(KioskAction::StartPolling {
        generation: state.poll_generation,
    });
}

fn enter_success(state: &mut KioskState, actions: &mut Vec<KioskAction>, order: OrderResult) {
    if state.screen == Screen::Checkin {
        actions.push(KioskAction::StopPolling);
    }
    state.screen = Screen::Success;
    state.checkin_error = None;
    state.apply_order(order);
    state.reset_generation += 1;
    actions.push(KioskAction::ArmResetTimer {
        generation: state.reset_generation,
    });
}
