//! Port interfaces for the application layer
//!
//! Ports define the contract between the kiosk orchestration (kc-app) and
//! infrastructure implementations (kc-infra). This follows Hexagonal
//! Architecture principles, keeping the state machine independent of HTTP,
//! timers and UI plumbing.

mod kiosk_event;
mod kiosk_input;
pub mod order_backend;
mod timer;

pub use kiosk_event::KioskEventPort;
pub use kiosk_input::KioskInputPort;
pub use order_backend::{BackendError, OrderBackendPort};
pub use timer::{TimerFired, TimerKind, TimerPort};
