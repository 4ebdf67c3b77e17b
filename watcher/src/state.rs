//! Shared per-collection floor state.
//!
//! Holds, for every tracked collection:
//!   • the latest full trait ask map (only when trait queries are enabled)
//!   • a fixed-length floor history, newest first
//!   • the time of the last successful refresh
//!
//! All three live behind one lock so a refresh is applied as a single unit:
//! readers never see a new ask snapshot paired with a stale floor history.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use market::TraitAskMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::CollectionConfig;
use crate::error::StateError;
use crate::history::FloorHistory;

/// Floor and freshness of one collection at read time.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorEntry {
    pub name: String,
    pub history: FloorHistory,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Inner {
    /// Configured order, used when listing.
    order: Vec<String>,
    /// Collections whose full ask map is retained.
    retained: HashSet<String>,
    latest_asks: HashMap<String, TraitAskMap>,
    floors: HashMap<String, FloorHistory>,
    floor_updates: HashMap<String, DateTime<Utc>>,
}

/// Cloneable handle to the shared state.
#[derive(Clone, Default)]
pub struct WatchState {
    inner: Arc<RwLock<Inner>>,
}

impl WatchState {
    /// Create state with a zeroed floor history for every collection.
    pub fn new(collections: &[CollectionConfig]) -> Self {
        let mut inner = Inner::default();

        for c in collections {
            inner.order.push(c.name.clone());
            inner.floors.insert(c.name.clone(), FloorHistory::new());
            if c.enable_trait_query {
                inner.retained.insert(c.name.clone());
            }
        }

        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    /// Apply one successful refresh.
    ///
    /// The ask map replaces the previous snapshot wholesale, and only for
    /// collections with trait queries enabled. The floor is pushed onto the
    /// history and the update time is advanced, never moved backwards.
    pub async fn record_refresh(
        &self,
        collection: &str,
        asks: TraitAskMap,
        floor: f64,
        at: DateTime<Utc>,
    ) -> Result<(), StateError> {
        let mut g = self.inner.write().await;
        let inner = &mut *g;

        let history = inner
            .floors
            .get_mut(collection)
            .ok_or_else(|| StateError::UnknownCollection(collection.to_string()))?;
        history.push(floor);

        if inner.retained.contains(collection) {
            inner.latest_asks.insert(collection.to_string(), asks);
        }

        let updated = inner
            .floor_updates
            .entry(collection.to_string())
            .or_insert(at);
        if at > *updated {
            *updated = at;
        }

        debug!(collection, floor, "floor state updated");
        Ok(())
    }

    /// Floor history and update time of every collection, in configured order.
    pub async fn floors(&self) -> Vec<FloorEntry> {
        let g = self.inner.read().await;

        g.order
            .iter()
            .map(|name| FloorEntry {
                name: name.clone(),
                history: g.floors.get(name).cloned().unwrap_or_default(),
                updated_at: g.floor_updates.get(name).copied(),
            })
            .collect()
    }

    pub async fn floor_history(&self, collection: &str) -> Option<FloorHistory> {
        self.inner.read().await.floors.get(collection).cloned()
    }

    pub async fn last_updated(&self, collection: &str) -> Option<DateTime<Utc>> {
        self.inner.read().await.floor_updates.get(collection).copied()
    }

    pub async fn ask_snapshot(&self, collection: &str) -> Option<TraitAskMap> {
        self.inner.read().await.latest_asks.get(collection).cloned()
    }

    /// Copy of every retained ask map, taken under one read guard.
    pub async fn ask_snapshots(&self) -> HashMap<String, TraitAskMap> {
        self.inner.read().await.latest_asks.clone()
    }

    pub async fn collections(&self) -> Vec<String> {
        self.inner.read().await.order.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use market::{Listing, Price};
    use std::collections::BTreeMap;

    fn asks(amount: u128) -> TraitAskMap {
        let mut values = BTreeMap::new();
        values.insert(
            "blue".to_string(),
            vec![Listing::new("1", "stars1seller", Price::ustars(amount))],
        );
        let mut map = TraitAskMap::new();
        map.insert("background".to_string(), values);
        map
    }

    fn state() -> WatchState {
        WatchState::new(&[
            CollectionConfig::new("alpha").with_trait_query(true),
            CollectionConfig::new("beta"),
        ])
    }

    #[tokio::test]
    async fn new_state_is_zeroed_and_never_updated() {
        let s = state();
        let floors = s.floors().await;

        assert_eq!(floors.len(), 2);
        assert_eq!(floors[0].name, "alpha");
        assert_eq!(floors[1].name, "beta");
        for f in &floors {
            assert_eq!(f.history, FloorHistory::new());
            assert!(f.updated_at.is_none());
        }
        assert!(s.ask_snapshots().await.is_empty());
    }

    #[tokio::test]
    async fn retained_collection_keeps_latest_map() {
        let s = state();
        let now = Utc::now();

        s.record_refresh("alpha", asks(100), 0.0001, now).await.unwrap();
        s.record_refresh("alpha", asks(80), 0.00008, now).await.unwrap();

        assert_eq!(s.ask_snapshot("alpha").await, Some(asks(80)));
        assert_eq!(
            s.floor_history("alpha").await.unwrap().values(),
            vec![0.00008, 0.0001, 0.0, 0.0, 0.0]
        );
    }

    #[tokio::test]
    async fn non_retained_collection_never_stores_asks() {
        let s = state();

        for i in 0..10 {
            s.record_refresh("beta", asks(100 + i), 1.0, Utc::now())
                .await
                .unwrap();
        }

        assert!(s.ask_snapshot("beta").await.is_none());
        assert!(!s.ask_snapshots().await.contains_key("beta"));
        assert_eq!(s.floor_history("beta").await.unwrap().values(), vec![1.0; 5]);
    }

    #[tokio::test]
    async fn update_time_never_moves_backwards() {
        let s = state();
        let later = Utc::now();
        let earlier = later - TimeDelta::seconds(30);

        s.record_refresh("beta", asks(1), 1.0, later).await.unwrap();
        s.record_refresh("beta", asks(1), 1.0, earlier).await.unwrap();

        assert_eq!(s.last_updated("beta").await, Some(later));
    }

    #[tokio::test]
    async fn unknown_collection_is_rejected_without_side_effects() {
        let s = state();

        let err = s
            .record_refresh("gamma", asks(1), 1.0, Utc::now())
            .await
            .unwrap_err();

        assert_eq!(err, StateError::UnknownCollection("gamma".into()));
        assert!(s.floor_history("gamma").await.is_none());
        assert!(s.last_updated("gamma").await.is_none());
        assert_eq!(s.collections().await, vec!["alpha", "beta"]);
    }
}
