use async_trait::async_trait;
use tracing::debug;

/// Status shown while a refresh pass is in flight.
pub const REFRESH_ACTIVITY: &str = "the stars 🌌🔭";

/// Best-effort "currently doing" announcement (e.g. a chat bot's status line).
///
/// Callers ignore failures.
#[async_trait]
pub trait Presence: Send + Sync + 'static {
    async fn set_activity(&self, description: &str) -> anyhow::Result<()>;

    async fn clear_activity(&self) -> anyhow::Result<()>;
}

/// Presence that only writes to the log.
#[derive(Clone, Default)]
pub struct LogPresence;

#[async_trait]
impl Presence for LogPresence {
    async fn set_activity(&self, description: &str) -> anyhow::Result<()> {
        debug!(activity = description, "presence set");
        Ok(())
    }

    async fn clear_activity(&self) -> anyhow::Result<()> {
        debug!("presence cleared");
        Ok(())
    }
}
