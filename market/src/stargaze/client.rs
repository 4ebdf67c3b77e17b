use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::source::AskSource;
use crate::stargaze::errors::FetchError;
use crate::stargaze::types::{RawAsk, TraitAsksEnvelope};
use crate::types::{Listing, Price, TraitAskMap, USTARS_DENOM};

/// HTTP client for the Stargaze marketplace trait-ask endpoint.
#[derive(Clone)]
pub struct StargazeClient {
    http: Client,
    url: String,
}

impl StargazeClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            url: url.trim_end_matches('/').to_string(),
        })
    }

    #[instrument(skip(self), fields(collection = %collection), level = "debug")]
    async fn fetch_envelope(&self, collection: &str) -> Result<TraitAsksEnvelope, FetchError> {
        let url = format!("{}/collections/{}/trait-asks", self.url, collection);

        let resp = self.http.get(&url).send().await?.error_for_status()?;
        let envelope: TraitAsksEnvelope = resp.json().await?;

        debug!(traits = envelope.traits.len(), "stargaze trait asks fetched");

        Ok(envelope)
    }
}

#[async_trait]
impl AskSource for StargazeClient {
    async fn fetch_trait_asks(
        &self,
        collection: &str,
        strict: bool,
    ) -> Result<TraitAskMap, FetchError> {
        let envelope = self.fetch_envelope(collection).await?;
        normalize(collection, envelope, strict)
    }
}

/// Convert the wire envelope into a [`TraitAskMap`].
///
/// Unparseable amounts are always an error. Zero-priced or foreign-denom asks
/// fail the whole fetch when `strict`, and are dropped otherwise.
pub fn normalize(
    collection: &str,
    envelope: TraitAsksEnvelope,
    strict: bool,
) -> Result<TraitAskMap, FetchError> {
    let mut out = TraitAskMap::new();

    for (trait_name, values) in envelope.traits {
        let entry = out.entry(trait_name.clone()).or_default();

        for (value, raw_asks) in values {
            let mut listings = Vec::with_capacity(raw_asks.len());

            for raw in raw_asks {
                match validate(&raw) {
                    Ok(listing) => listings.push(listing),
                    Err(Rejection::Malformed(reason)) => {
                        return Err(FetchError::InvalidResponse(reason));
                    }
                    Err(Rejection::Invalid(reason)) if strict => {
                        return Err(FetchError::Validation {
                            collection: collection.to_string(),
                            reason,
                        });
                    }
                    Err(Rejection::Invalid(reason)) => {
                        warn!(
                            collection,
                            trait_name = %trait_name,
                            value = %value,
                            reason = %reason,
                            "dropping invalid ask"
                        );
                    }
                }
            }

            entry.insert(value, listings);
        }
    }

    Ok(out)
}

enum Rejection {
    Malformed(String),
    Invalid(String),
}

fn validate(raw: &RawAsk) -> Result<Listing, Rejection> {
    let amount: u128 = raw.price.amount.parse().map_err(|e| {
        Rejection::Malformed(format!(
            "token {}: bad amount '{}': {}",
            raw.token_id, raw.price.amount, e
        ))
    })?;

    if raw.price.denom != USTARS_DENOM {
        return Err(Rejection::Invalid(format!(
            "token {}: unexpected denom '{}'",
            raw.token_id, raw.price.denom
        )));
    }
    if amount == 0 {
        return Err(Rejection::Invalid(format!(
            "token {}: zero ask price",
            raw.token_id
        )));
    }

    Ok(Listing::new(
        raw.token_id.clone(),
        raw.seller.clone(),
        Price::ustars(amount),
    ))
}
