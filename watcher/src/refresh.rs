//! Per-collection refresh loop.
//!
//! Each pass fetches the collection's trait asks, derives the floor and
//! applies both to the shared [`WatchState`]. A failed pass changes nothing
//! and the loop simply waits for the next one.
//!
//! Data flow:
//! AskSource → min_ask → WatchState

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::logger::{TraceId, child_span, root_span};
use market::{AskSource, min_ask};
use tokio::sync::watch;
use tracing::{Instrument, debug, field, info, warn};

use crate::config::CollectionConfig;
use crate::error::RefreshError;
use crate::presence::{Presence, REFRESH_ACTIVITY};
use crate::state::WatchState;

/// Result of a successful refresh pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOutcome {
    /// New floor in display units.
    pub floor: f64,
    pub updated_at: DateTime<Utc>,
}

pub struct RefreshTask {
    collection: CollectionConfig,
    source: Arc<dyn AskSource>,
    presence: Arc<dyn Presence>,
    state: WatchState,
}

impl RefreshTask {
    pub fn new(
        collection: CollectionConfig,
        source: Arc<dyn AskSource>,
        presence: Arc<dyn Presence>,
        state: WatchState,
    ) -> Self {
        Self {
            collection,
            source,
            presence,
            state,
        }
    }

    /// Fetch, derive the floor and publish it. Leaves state untouched on error.
    pub async fn refresh_once(&self) -> Result<RefreshOutcome, RefreshError> {
        let name = &self.collection.name;

        let asks = self
            .source
            .fetch_trait_asks(name, self.collection.strict_validation)
            .instrument(child_span("fetch"))
            .await?;

        let floor = min_ask(&asks)
            .map(|listing| listing.price.stars())
            .ok_or_else(|| RefreshError::NoListings {
                collection: name.clone(),
            })?;

        let updated_at = Utc::now();
        self.state
            .record_refresh(name, asks, floor, updated_at)
            .await?;

        Ok(RefreshOutcome { floor, updated_at })
    }

    /// One full pass: announce, refresh, log the outcome, clear the announcement.
    pub async fn run_iteration(&self) -> Result<RefreshOutcome, RefreshError> {
        if let Err(e) = self.presence.set_activity(REFRESH_ACTIVITY).await {
            debug!(error = %e, "failed to set presence");
        }

        info!("updating asks");
        let result = self.refresh_once().await;

        match &result {
            Ok(outcome) => info!(floor = outcome.floor, "finished updating asks"),
            Err(e) => warn!(error = %e, error_kind = e.kind(), "refresh failed; keeping previous floor"),
        }

        if let Err(e) = self.presence.clear_activity().await {
            debug!(error = %e, "failed to clear presence");
        }

        result
    }

    /// Refresh forever, sleeping the configured interval after every pass.
    ///
    /// Returns only once `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let interval = self.collection.interval();

        info!(
            collection = %self.collection.name,
            every_secs = interval.as_secs(),
            retain_traits = self.collection.enable_trait_query,
            "refresh task started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let trace_id = TraceId::new();
            let span = root_span("refresh", &trace_id);
            span.record("collection", field::display(&self.collection.name));

            // Errors are already logged inside; the loop only cares about timing.
            let _ = self.run_iteration().instrument(span).await;

            debug!(
                collection = %self.collection.name,
                in_secs = interval.as_secs(),
                "next refresh scheduled"
            );

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(collection = %self.collection.name, "refresh task stopped");
    }
}
