//! # kc-core
//!
//! Core domain models and business logic for the kiosk check-in.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the screen state machine, the backend wire contract and the ports implemented
//! by `kc-infra`.

// Public module exports
pub mod config;
pub mod kiosk;
pub mod order;
pub mod ports;

// Re-export commonly used types at the crate root
pub use config::KioskConfig;
pub use kiosk::{KioskAction, KioskEvent, KioskState, KioskStateMachine, Screen};
pub use order::{CheckinOutcome, OrderResult, PollOutcome};
