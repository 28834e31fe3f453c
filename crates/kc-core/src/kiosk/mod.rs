//! Kiosk screen domain module.
//!
//! This module defines the check-in screen state machine types.

pub mod state;
pub mod state_machine;

pub use state::{KioskState, Screen};
pub use state_machine::{KioskAction, KioskEvent, KioskStateMachine};
