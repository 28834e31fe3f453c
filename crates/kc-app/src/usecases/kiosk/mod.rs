mod orchestrator;

pub use orchestrator::{KioskError, KioskOrchestrator, KioskRuntime, KioskSettings};
