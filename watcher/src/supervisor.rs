//! FloorWatcher
//!
//! Owns the shared floor state and one refresh task per tracked collection.
//! Responsibilities:
//!   • Build the initial (zeroed) state for every configured collection
//!   • Spawn exactly one independent refresh loop per collection
//!   • Hand out read handles to query handlers
//!   • Signal and await every loop on shutdown

use std::sync::Arc;
use std::time::Duration;

use market::AskSource;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{Instrument, info, warn};

use crate::config::CollectionConfig;
use crate::error::SupervisorError;
use crate::presence::Presence;
use crate::refresh::RefreshTask;
use crate::state::WatchState;

pub struct FloorWatcher {
    collections: Vec<CollectionConfig>,
    source: Arc<dyn AskSource>,
    presence: Arc<dyn Presence>,
    state: WatchState,

    shutdown_tx: watch::Sender<bool>,
    tasks: JoinSet<()>,
    running: Vec<String>,
}

impl FloorWatcher {
    pub fn new(
        collections: Vec<CollectionConfig>,
        source: Arc<dyn AskSource>,
        presence: Arc<dyn Presence>,
    ) -> Self {
        let state = WatchState::new(&collections);
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            collections,
            source,
            presence,
            state,
            shutdown_tx,
            tasks: JoinSet::new(),
            running: Vec::new(),
        }
    }

    /// Read handle for query handlers.
    pub fn state(&self) -> WatchState {
        self.state.clone()
    }

    pub fn collections(&self) -> &[CollectionConfig] {
        &self.collections
    }

    /// Names of collections with a running refresh task.
    pub fn tracked(&self) -> &[String] {
        &self.running
    }

    /// Spawn one refresh loop per collection. Must be called from a tokio runtime.
    pub fn begin_watching(&mut self) -> Result<(), SupervisorError> {
        if !self.running.is_empty() {
            return Err(SupervisorError::AlreadyWatching);
        }

        for collection in &self.collections {
            let name = collection.name.clone();
            let task = RefreshTask::new(
                collection.clone(),
                Arc::clone(&self.source),
                Arc::clone(&self.presence),
                self.state.clone(),
            );

            let shutdown_rx = self.shutdown_tx.subscribe();
            let span = tracing::info_span!("refresh_task", collection = %name);
            self.tasks.spawn(task.run(shutdown_rx).instrument(span));
            self.running.push(name);
        }

        info!(count = self.running.len(), "floor watching started");
        Ok(())
    }

    /// Signal every loop to stop and wait for them, aborting stragglers after `grace`.
    ///
    /// A loop stuck inside a fetch only sees the signal once the fetch returns,
    /// hence the abort fallback.
    pub async fn shutdown(mut self, grace: Duration) {
        let _ = self.shutdown_tx.send(true);

        let joined = tokio::time::timeout(grace, async {
            while let Some(res) = self.tasks.join_next().await {
                if let Err(e) = res {
                    warn!(error = ?e, "refresh task ended abnormally");
                }
            }
        })
        .await;

        if joined.is_err() {
            warn!(
                remaining = self.tasks.len(),
                "refresh tasks did not stop within grace period; aborting"
            );
            self.tasks.abort_all();
            while self.tasks.join_next().await.is_some() {}
        }

        info!("floor watching stopped");
    }
}
