//! Binary bootstrap: configuration, tracing, wiring and the runner.

pub mod config;
pub mod run;
pub mod tracing;
pub mod wiring;

pub use config::resolve_config;
pub use run::run_kiosk;
pub use self::tracing::init_tracing_subscriber;
pub use wiring::wire_dependencies;
