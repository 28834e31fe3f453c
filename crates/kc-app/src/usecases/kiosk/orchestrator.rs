//! Kiosk orchestrator.
//!
//! This module coordinates the kiosk screen state machine and its side effects:
//! the check-in call, the latest-order poller and the success reset timer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use kc_core::config::KioskConfig;
use kc_core::ports::{
    KioskEventPort, KioskInputPort, OrderBackendPort, TimerFired, TimerKind, TimerPort,
};
use kc_core::{
    CheckinOutcome, KioskAction, KioskEvent, KioskState, KioskStateMachine, PollOutcome,
};
use tokio::sync::{mpsc, Mutex};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Timings the orchestrator hands to the timer port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KioskSettings {
    pub reset_dwell: Duration,
    pub poll_interval: Duration,
}

impl From<&KioskConfig> for KioskSettings {
    fn from(config: &KioskConfig) -> Self {
        Self {
            reset_dwell: config.reset_dwell,
            poll_interval: config.poll_interval,
        }
    }
}

impl Default for KioskSettings {
    fn default() -> Self {
        Self::from(&KioskConfig::default())
    }
}

/// Errors produced by the kiosk orchestrator.
///
/// Backend failures are never errors here; they become screen state.
#[derive(Debug, thiserror::Error)]
pub enum KioskError {
    #[error("timer operation failed: {0}")]
    Timer(#[source] anyhow::Error),
    #[error("kiosk already started")]
    AlreadyStarted,
    #[error("kiosk is not running")]
    NotRunning,
    #[error("check-in task was cancelled")]
    CheckinCancelled,
}

/// Backend work requested by a transition, run outside the dispatch lock.
#[derive(Debug)]
enum BackendCall {
    CheckIn { phone: String },
    LatestOrder { generation: u64 },
}

/// Shared controller state.
///
/// Lock order: `dispatch_lock` first, then `state`. `state` is only written
/// while `dispatch_lock` is held; snapshots read it without the dispatch lock.
struct Inner {
    dispatch_lock: Mutex<()>,
    state: Mutex<KioskState>,
    started: AtomicBool,
    stopped: AtomicBool,
    tasks: StdMutex<Vec<AbortHandle>>,

    backend: Arc<dyn OrderBackendPort>,
    timer: Arc<Mutex<dyn TimerPort>>,
    events: Arc<dyn KioskEventPort>,
    settings: KioskSettings,
}

/// Orchestrator that drives the kiosk screens.
///
/// Cheap to clone; all clones share one controller.
#[derive(Clone)]
pub struct KioskOrchestrator {
    inner: Arc<Inner>,
}

/// Running kiosk. Dropping it tears the controller down.
pub struct KioskRuntime {
    orchestrator: KioskOrchestrator,
}

impl KioskOrchestrator {
    pub fn new(
        backend: Arc<dyn OrderBackendPort>,
        timer: Arc<Mutex<dyn TimerPort>>,
        events: Arc<dyn KioskEventPort>,
        settings: KioskSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                dispatch_lock: Mutex::new(()),
                state: Mutex::new(KioskState::default()),
                started: AtomicBool::new(false),
                stopped: AtomicBool::new(false),
                tasks: StdMutex::new(Vec::new()),
                backend,
                timer,
                events,
                settings,
            }),
        }
    }

    /// Enter the boot state, start polling and run the timer event loop.
    ///
    /// `fired` is the receiving end of the timer port's fire channel.
    pub async fn start(
        &self,
        fired: mpsc::Receiver<TimerFired>,
    ) -> Result<KioskRuntime, KioskError> {
        if self.inner.started.swap(true, Ordering::SeqCst) {
            return Err(KioskError::AlreadyStarted);
        }

        {
            let _dispatch_guard = self.inner.dispatch_lock.lock().await;
            let (state, actions) = KioskStateMachine::boot();
            info!(screen = ?state.screen, "kiosk booting");
            self.inner.set_state_and_emit(state).await;
            self.inner.execute_actions(actions).await?;
        }

        let event_loop = tokio::spawn(Inner::run_event_loop(Arc::clone(&self.inner), fired));
        self.inner.track(event_loop.abort_handle());

        Ok(KioskRuntime {
            orchestrator: self.clone(),
        })
    }

    /// Submit a check-in for `phone` and wait for the resulting screen.
    ///
    /// While another check-in is outstanding the request is ignored and the
    /// current state is returned.
    pub async fn request_checkin(
        &self,
        phone: impl Into<String>,
    ) -> Result<KioskState, KioskError> {
        self.ensure_running()?;
        let event = KioskEvent::CheckinRequested {
            phone: phone.into(),
        };
        let (state, calls) = self.inner.dispatch(event).await?;

        let mut handles: Vec<_> = calls
            .into_iter()
            .map(|call| self.inner.spawn_call(call))
            .collect();
        match handles.pop() {
            // Spawned so a dropped caller cannot strand the in-flight flag.
            Some(handle) => handle.await.map_err(|_| KioskError::CheckinCancelled)?,
            None => {
                debug!(screen = ?state.screen, "check-in request not submitted");
                Ok(state)
            }
        }
    }

    pub async fn set_phone_number(
        &self,
        phone: impl Into<String>,
    ) -> Result<KioskState, KioskError> {
        self.dispatch_and_spawn(KioskEvent::PhoneNumberChanged {
            phone: phone.into(),
        })
        .await
    }

    pub async fn tap_welcome(&self) -> Result<KioskState, KioskError> {
        self.dispatch_and_spawn(KioskEvent::WelcomeTapped).await
    }

    /// Return to the check-in screen immediately, cancelling a pending reset.
    pub async fn force_reset(&self) -> Result<KioskState, KioskError> {
        self.dispatch_and_spawn(KioskEvent::ForceReset).await
    }

    pub async fn state(&self) -> KioskState {
        self.inner.snapshot().await
    }

    /// Stop all timers and abort the event loop and in-flight backend calls.
    pub async fn shutdown(&self) -> Result<(), KioskError> {
        let _dispatch_guard = self.inner.dispatch_lock.lock().await;
        if self.inner.stopped.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.inner.abort_tasks();
        self.inner
            .timer
            .lock()
            .await
            .stop_all()
            .await
            .map_err(KioskError::Timer)?;
        info!("kiosk shut down");
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), KioskError> {
        if self.inner.started.load(Ordering::SeqCst) && !self.inner.stopped.load(Ordering::SeqCst)
        {
            Ok(())
        } else {
            Err(KioskError::NotRunning)
        }
    }

    async fn dispatch_and_spawn(&self, event: KioskEvent) -> Result<KioskState, KioskError> {
        self.ensure_running()?;
        let (state, calls) = self.inner.dispatch(event).await?;
        for call in calls {
            self.inner.spawn_call(call);
        }
        Ok(state)
    }
}

#[async_trait::async_trait]
impl KioskInputPort for KioskOrchestrator {
    async fn enter_phone_number(&self, phone: &str) -> anyhow::Result<()> {
        self.set_phone_number(phone).await?;
        Ok(())
    }

    async fn submit_entered_phone(&self) -> anyhow::Result<()> {
        let state = self
            .dispatch_and_spawn(KioskEvent::EnteredPhoneSubmitted)
            .await?;
        debug!(in_flight = state.checkin_in_flight, "entered phone submitted");
        Ok(())
    }
}

impl Inner {
    async fn dispatch(
        &self,
        event: KioskEvent,
    ) -> Result<(KioskState, Vec<BackendCall>), KioskError> {
        // Serialize dispatch so timer fires, poll results and user actions
        // never interleave between reading and writing the state.
        let _dispatch_guard = self.dispatch_lock.lock().await;
        if self.stopped.load(Ordering::SeqCst) {
            return Err(KioskError::NotRunning);
        }

        let span = info_span!("usecase.kiosk_orchestrator.dispatch", event = ?event);
        async {
            let current = self.snapshot().await;
            let event_name = format!("{:?}", event);
            let (next, actions) = KioskStateMachine::transition(current.clone(), event);

            if next == current && actions.is_empty() {
                debug!(event = %event_name, screen = ?current.screen, "kiosk event ignored");
                return Ok((next, Vec::new()));
            }

            info!(from = ?current.screen, to = ?next.screen, event = %event_name, "kiosk state transition");
            if next != current {
                self.set_state_and_emit(next.clone()).await;
            }
            let calls = self.execute_actions(actions).await?;
            Ok((next, calls))
        }
        .instrument(span)
        .await
    }

    async fn execute_actions(
        &self,
        actions: Vec<KioskAction>,
    ) -> Result<Vec<BackendCall>, KioskError> {
        let mut calls = Vec::new();
        for action in actions {
            debug!(?action, "kiosk executing action");
            match action {
                KioskAction::SubmitCheckin { phone } => {
                    calls.push(BackendCall::CheckIn { phone });
                }
                KioskAction::PollLatestOrder { generation } => {
                    calls.push(BackendCall::LatestOrder { generation });
                }
                KioskAction::ArmResetTimer { generation } => {
                    self.timer
                        .lock()
                        .await
                        .start_once(TimerKind::Reset, generation, self.settings.reset_dwell)
                        .await
                        .map_err(KioskError::Timer)?;
                }
                KioskAction::CancelResetTimer => {
                    self.timer
                        .lock()
                        .await
                        .stop(TimerKind::Reset)
                        .await
                        .map_err(KioskError::Timer)?;
                }
                KioskAction::StartPolling { generation } => {
                    self.timer
                        .lock()
                        .await
                        .start_every(TimerKind::Poll, generation, self.settings.poll_interval)
                        .await
                        .map_err(KioskError::Timer)?;
                }
                KioskAction::StopPolling => {
                    self.timer
                        .lock()
                        .await
                        .stop(TimerKind::Poll)
                        .await
                        .map_err(KioskError::Timer)?;
                }
            }
        }
        Ok(calls)
    }

    fn spawn_call(self: &Arc<Self>, call: BackendCall) -> JoinHandle<Result<KioskState, KioskError>> {
        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let event = match call {
                BackendCall::CheckIn { phone } => KioskEvent::CheckinResolved {
                    outcome: inner.check_in(&phone).await,
                },
                BackendCall::LatestOrder { generation } => KioskEvent::PollResolved {
                    generation,
                    outcome: inner.latest_order().await,
                },
            };
            let (state, calls) = inner.dispatch(event).await?;
            if !calls.is_empty() {
                warn!(?calls, "backend result requested further backend calls; dropped");
            }
            Ok(state)
        });
        self.track(handle.abort_handle());
        handle
    }

    async fn check_in(&self, phone: &str) -> CheckinOutcome {
        match self.backend.check_in(phone).await {
            Ok(outcome) => {
                debug!(?outcome, "check-in resolved");
                outcome
            }
            Err(err) => {
                warn!(error = %err, "check-in request failed");
                CheckinOutcome::failed()
            }
        }
    }

    async fn latest_order(&self) -> PollOutcome {
        let outcome = self
            .backend
            .latest_order()
            .await
            .unwrap_or_else(|err| PollOutcome::Failed {
                reason: err.to_string(),
            });
        match &outcome {
            PollOutcome::OrderReady(_) => info!("poll found a ready order"),
            PollOutcome::NotFound => debug!("no ready order"),
            PollOutcome::Failed { reason } => warn!(%reason, "latest order poll failed"),
        }
        outcome
    }

    async fn run_event_loop(inner: Arc<Self>, mut fired: mpsc::Receiver<TimerFired>) {
        while let Some(TimerFired { kind, generation }) = fired.recv().await {
            let event = match kind {
                TimerKind::Reset => KioskEvent::ResetTimerFired { generation },
                TimerKind::Poll => KioskEvent::PollTick { generation },
            };
            match inner.dispatch(event).await {
                Ok((_, calls)) => {
                    for call in calls {
                        inner.spawn_call(call);
                    }
                }
                Err(KioskError::NotRunning) => break,
                Err(err) => error!(error = %err, ?kind, "failed to handle timer event"),
            }
        }
        debug!("kiosk event loop stopped");
    }

    async fn snapshot(&self) -> KioskState {
        self.state.lock().await.clone()
    }

    async fn set_state_and_emit(&self, state: KioskState) {
        *self.state.lock().await = state.clone();
        self.events.emit_state_changed(state).await;
    }

    fn track(&self, handle: AbortHandle) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
    }

    fn abort_tasks(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        for task in tasks.drain(..) {
            task.abort();
        }
    }
}

impl KioskRuntime {
    pub fn orchestrator(&self) -> &KioskOrchestrator {
        &self.orchestrator
    }

    pub async fn shutdown(self) -> Result<(), KioskError> {
        self.orchestrator.shutdown().await
    }
}

impl Drop for KioskRuntime {
    fn drop(&mut self) {
        // Timers are stopped by `shutdown`; here we can only cut the loop so
        // no fire reaches the controller after teardown.
        self.orchestrator.inner.stopped.store(true, Ordering::SeqCst);
        self.orchestrator.inner.abort_tasks();
    }
}
