//! Kiosk Check-in Application Orchestration Layer
//!
//! This crate drives the screen state machine and runs its side effects
//! (backend calls, reset timer, order polling) against the core ports.

pub mod usecases;

pub use usecases::kiosk::{KioskError, KioskOrchestrator, KioskRuntime, KioskSettings};
