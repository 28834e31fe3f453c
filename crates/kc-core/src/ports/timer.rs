use std::time::Duration;

/// Timers owned by the kiosk controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// One-shot success-screen reset.
    Reset,
    /// Latest-order poll interval.
    Poll,
}

/// Delivered by a [`TimerPort`] implementation each time a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub kind: TimerKind,
    pub generation: u64,
}

/// At most one timer per [`TimerKind`] is active; starting a kind replaces
/// the previous timer of that kind.
#[async_trait::async_trait]
pub trait TimerPort: Send {
    async fn start_once(
        &mut self,
        kind: TimerKind,
        generation: u64,
        after: Duration,
    ) -> anyhow::Result<()>;
    async fn start_every(
        &mut self,
        kind: TimerKind,
        generation: u64,
        every: Duration,
    ) -> anyhow::Result<()>;
    async fn stop(&mut self, kind: TimerKind) -> anyhow::Result<()>;
    async fn stop_all(&mut self) -> anyhow::Result<()>;
}
