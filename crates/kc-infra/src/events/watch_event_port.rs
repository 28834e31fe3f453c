use kc_core::ports::KioskEventPort;
use kc_core::KioskState;
use tokio::sync::watch;
use tracing::debug;

/// Publishes every kiosk state change on a `watch` channel.
///
/// Renderers subscribe and always see the latest snapshot; intermediate
/// states may be skipped by slow readers.
pub struct WatchEventPort {
    tx: watch::Sender<KioskState>,
}

impl WatchEventPort {
    pub fn new() -> (Self, watch::Receiver<KioskState>) {
        let (tx, rx) = watch::channel(KioskState::default());
        (Self { tx }, rx)
    }

    pub fn subscribe(&self) -> watch::Receiver<KioskState> {
        self.tx.subscribe()
    }
}

#[async_trait::async_trait]
impl KioskEventPort for WatchEventPort {
    async fn emit_state_changed(&self, state: KioskState) {
        debug!(screen = ?state.screen, "publishing kiosk state");
        self.tx.send_replace(state);
    }
}
