//! # Dependency wiring
//!
//! The only place that knows about `kc-infra`, `kc-app` and `kc-core` at once.
//! Builds the adapters and hands them to the orchestrator through their ports;
//! no decisions are made here.

use std::sync::Arc;

use anyhow::Context;
use kc_app::{KioskOrchestrator, KioskSettings};
use kc_core::ports::{KioskEventPort, KioskInputPort, OrderBackendPort, TimerFired, TimerPort};
use kc_core::{KioskConfig, KioskState};
use kc_infra::{HttpOrderBackend, RemoteCommandHandler, TokioTimer, WatchEventPort};
use tokio::sync::{mpsc, watch, Mutex};
use tracing::info;

/// Everything the runner needs once the adapters are wired.
pub struct KioskDeps {
    pub orchestrator: KioskOrchestrator,
    /// Timer fires, consumed by `KioskOrchestrator::start`.
    pub fired: mpsc::Receiver<TimerFired>,
    /// Published screen state.
    pub states: watch::Receiver<KioskState>,
    /// Remote input listener settings, when enabled.
    pub remote: Option<RemoteInput>,
}

/// Where to listen for remote commands and who applies them.
pub struct RemoteInput {
    pub url: String,
    pub handler: Arc<RemoteCommandHandler>,
}

pub fn wire_dependencies(config: &KioskConfig) -> anyhow::Result<KioskDeps> {
    let backend: Arc<dyn OrderBackendPort> = Arc::new(
        HttpOrderBackend::new(&config.backend_url, config.request_timeout)
            .with_context(|| format!("Failed to build backend client for {}", config.backend_url))?,
    );

    let (timer, fired) = TokioTimer::new();
    let timer: Arc<Mutex<dyn TimerPort>> = Arc::new(Mutex::new(timer));

    let (event_port, states) = WatchEventPort::new();
    let events: Arc<dyn KioskEventPort> = Arc::new(event_port);

    let settings = KioskSettings::from(config);
    info!(
        backend_url = %config.backend_url,
        request_timeout = ?config.request_timeout,
        reset_dwell = ?settings.reset_dwell,
        poll_interval = ?settings.poll_interval,
        remote_input = config.remote_input,
        "kiosk dependencies wired"
    );

    let orchestrator = KioskOrchestrator::new(backend, timer, events, settings);
    let remote = config.remote_input.then(|| {
        let input: Arc<dyn KioskInputPort> = Arc::new(orchestrator.clone());
        RemoteInput {
            url: config.backend_url.clone(),
            handler: Arc::new(RemoteCommandHandler::new(input)),
        }
    });

    Ok(KioskDeps {
        orchestrator,
        fired,
        states,
        remote,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kc_core::Screen;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wire_dependencies_publishes_boot_state() {
        let config = KioskConfig {
            poll_interval: Duration::from_secs(3600),
            ..KioskConfig::default()
        };
        let KioskDeps {
            orchestrator,
            fired,
            mut states,
            remote,
        } = wire_dependencies(&config).unwrap();
        assert_eq!(remote.map(|r| r.url).as_deref(), Some("http://localhost:5000/"));

        let runtime = orchestrator.start(fired).await.unwrap();
        states.changed().await.unwrap();
        assert_eq!(states.borrow_and_update().screen, Screen::Checkin);

        runtime.shutdown().await.unwrap();
    }

    #[test]
    fn test_remote_input_can_be_disabled() {
        let config = KioskConfig {
            remote_input: false,
            ..KioskConfig::default()
        };
        assert!(wire_dependencies(&config).unwrap().remote.is_none());
    }

    #[test]
    fn test_wire_dependencies_rejects_bad_url() {
        let config = KioskConfig {
            backend_url: "not a url".to_string(),
            ..KioskConfig::default()
        };
        assert!(wire_dependencies(&config).is_err());
    }
}
