use crate::kiosk::KioskState;

#[async_trait::async_trait]
pub trait KioskEventPort: Send + Sync {
    async fn emit_state_changed(&self, state: KioskState);
}
