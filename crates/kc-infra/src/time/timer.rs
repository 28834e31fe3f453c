use std::collections::HashMap;
use std::sync::Arc;

use kc_core::ports::{TimerFired, TimerKind, TimerPort};
use tokio::sync::{mpsc, Mutex};
use tokio::time::{interval_at, sleep_until, Duration, Instant, MissedTickBehavior};
use tracing::debug;

const FIRED_CHANNEL_CAPACITY: usize = 16;

struct ActiveTimer {
    generation: u64,
    handle: tokio::task::AbortHandle,
}

type TimerTable = Arc<Mutex<HashMap<TimerKind, ActiveTimer>>>;

/// Tokio-backed timers delivering [`TimerFired`] on an mpsc channel.
pub struct TokioTimer {
    timers: TimerTable,
    fired_tx: mpsc::Sender<TimerFired>,
}

impl TokioTimer {
    /// Create the timer together with the receiving end of its fire channel.
    pub fn new() -> (Self, mpsc::Receiver<TimerFired>) {
        let (fired_tx, fired_rx) = mpsc::channel(FIRED_CHANNEL_CAPACITY);
        let timer = Self {
            timers: Arc::new(Mutex::new(HashMap::new())),
            fired_tx,
        };
        (timer, fired_rx)
    }

    async fn install(&self, kind: TimerKind, generation: u64, handle: tokio::task::AbortHandle) {
        let mut timers_guard = self.timers.lock().await;
        if let Some(existing) = timers_guard.insert(kind, ActiveTimer { generation, handle }) {
            existing.handle.abort();
        }
    }
}

async fn release(timers: &TimerTable, kind: TimerKind, generation: u64) {
    let mut timers_guard = timers.lock().await;
    if timers_guard
        .get(&kind)
        .is_some_and(|active| active.generation == generation)
    {
        timers_guard.remove(&kind);
    }
}

#[async_trait::async_trait]
impl TimerPort for TokioTimer {
    async fn start_once(
        &mut self,
        kind: TimerKind,
        generation: u64,
        after: Duration,
    ) -> anyhow::Result<()> {
        // Hold the table while spawning so the task cannot release before install.
        let timers = Arc::clone(&self.timers);
        let fired_tx = self.fired_tx.clone();
        let deadline = Instant::now() + after;
        let mut timers_guard = self.timers.lock().await;
        if let Some(existing) = timers_guard.remove(&kind) {
            existing.handle.abort();
        }

        let handle = tokio::spawn(async move {
            sleep_until(deadline).await;
            let _ = fired_tx.send(TimerFired { kind, generation }).await;
            release(&timers, kind, generation).await;
        });

        timers_guard.insert(
            kind,
            ActiveTimer {
                generation,
                handle: handle.abort_handle(),
            },
        );
        debug!(?kind, generation, after_ms = after.as_millis() as u64, "timer started");
        Ok(())
    }

    async fn start_every(
        &mut self,
        kind: TimerKind,
        generation: u64,
        every: Duration,
    ) -> anyhow::Result<()> {
        let timers = Arc::clone(&self.timers);
        let fired_tx = self.fired_tx.clone();
        let first_tick = Instant::now() + every;

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(first_tick, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if fired_tx.send(TimerFired { kind, generation }).await.is_err() {
                    break;
                }
            }
            release(&timers, kind, generation).await;
        });

        self.install(kind, generation, handle.abort_handle()).await;
        debug!(?kind, generation, every_ms = every.as_millis() as u64, "interval started");
        Ok(())
    }

    async fn stop(&mut self, kind: TimerKind) -> anyhow::Result<()> {
        let mut timers_guard = self.timers.lock().await;
        if let Some(active) = timers_guard.remove(&kind) {
            active.handle.abort();
            debug!(?kind, generation = active.generation, "timer stopped");
        }
        Ok(())
    }

    async fn stop_all(&mut self) -> anyhow::Result<()> {
        let mut timers_guard = self.timers.lock().await;
        for (kind, active) in timers_guard.drain() {
            active.handle.abort();
            debug!(?kind, generation = active.generation, "timer stopped");
        }
        Ok(())
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        if let Ok(mut timers_guard) = self.timers.try_lock() {
            for (_, active) in timers_guard.drain() {
                active.handle.abort();
            }
        }
    }
}
