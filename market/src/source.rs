use async_trait::async_trait;

use crate::{stargaze::FetchError, types::TraitAskMap};

/// Source of per-trait asks for a collection.
///
/// Implementations own transport, timeouts and validation; callers own retry.
#[async_trait]
pub trait AskSource: Send + Sync + 'static {
    async fn fetch_trait_asks(
        &self,
        collection: &str,
        strict: bool,
    ) -> Result<TraitAskMap, FetchError>;
}
