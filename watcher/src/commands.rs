//! Chat commands exposed by the watcher.
//!
//! The watcher never talks to a chat platform directly. It registers two
//! handlers with whatever [`CommandSurface`] hosts it and answers through the
//! [`Interaction`] each invocation carries.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use market::TraitAskMap;
use tracing::{debug, instrument};

use crate::query::{list_collections, render_collection_list};
use crate::state::WatchState;
use crate::time::RelativeTime;

pub const LIST_COLLECTIONS: &str = "listcollections";
pub const QUERY_TRAIT_FLOOR: &str = "querytraitfloor";

/// Handle to the request a command was invoked with.
#[async_trait]
pub trait Interaction: Send + Sync {
    async fn send_message(&self, message: String) -> anyhow::Result<()>;
}

#[async_trait]
pub trait CommandHandler: Send + Sync + 'static {
    async fn invoke(&self, interaction: &dyn Interaction) -> anyhow::Result<()>;
}

/// Multi-step trait floor conversation, driven by the host.
///
/// Receives every retained ask map keyed by collection; the watcher has no
/// involvement once the flow starts.
#[async_trait]
pub trait TraitFloorFlow: Send + Sync + 'static {
    async fn start(
        &self,
        asks: HashMap<String, TraitAskMap>,
        interaction: &dyn Interaction,
    ) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub handler: Arc<dyn CommandHandler>,
}

/// Command dispatcher the watcher registers into.
pub trait CommandSurface {
    fn add_command(&mut self, command: Command);
}

pub struct ListCollections {
    state: WatchState,
    time: Arc<dyn RelativeTime>,
}

impl ListCollections {
    pub fn new(state: WatchState, time: Arc<dyn RelativeTime>) -> Self {
        Self { state, time }
    }
}

#[async_trait]
impl CommandHandler for ListCollections {
    #[instrument(skip_all, name = "listcollections")]
    async fn invoke(&self, interaction: &dyn Interaction) -> anyhow::Result<()> {
        let summaries = list_collections(&self.state, Utc::now()).await;
        debug!(count = summaries.len(), "listing tracked collections");

        let message = render_collection_list(&summaries, self.time.as_ref());
        interaction.send_message(message).await
    }
}

pub struct QueryTraitFloor {
    state: WatchState,
    flow: Arc<dyn TraitFloorFlow>,
}

impl QueryTraitFloor {
    pub fn new(state: WatchState, flow: Arc<dyn TraitFloorFlow>) -> Self {
        Self { state, flow }
    }
}

#[async_trait]
impl CommandHandler for QueryTraitFloor {
    #[instrument(skip_all, name = "querytraitfloor")]
    async fn invoke(&self, interaction: &dyn Interaction) -> anyhow::Result<()> {
        let asks = self.state.ask_snapshots().await;
        debug!(collections = asks.len(), "starting trait floor flow");

        self.flow.start(asks, interaction).await
    }
}

/// Register `listcollections` and `querytraitfloor` with the host surface.
pub fn register_commands(
    surface: &mut dyn CommandSurface,
    state: WatchState,
    time: Arc<dyn RelativeTime>,
    flow: Arc<dyn TraitFloorFlow>,
) {
    surface.add_command(Command {
        name: LIST_COLLECTIONS,
        description: "List tracked Stargaze collections with their floor price",
        handler: Arc::new(ListCollections::new(state.clone(), time)),
    });

    surface.add_command(Command {
        name: QUERY_TRAIT_FLOOR,
        description: "Query the floor pricing for a specific trait",
        handler: Arc::new(QueryTraitFloor::new(state, flow)),
    });
}
