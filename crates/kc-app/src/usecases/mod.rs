//! Business logic use cases
//!
//! [customer / poll tick / reset timer]
//!         ↓
//! KioskOrchestrator::dispatch → KioskStateMachine::transition
//!         ↓
//! actions → timers, backend calls → result events

pub mod kiosk;
