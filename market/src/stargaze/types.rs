use std::collections::BTreeMap;

use serde::Deserialize;

/// Body of `GET /collections/{name}/trait-asks`.
#[derive(Debug, Deserialize)]
pub struct TraitAsksEnvelope {
    #[serde(default)]
    pub traits: BTreeMap<String, BTreeMap<String, Vec<RawAsk>>>,
}

#[derive(Debug, Deserialize)]
pub struct RawAsk {
    pub token_id: String,
    pub seller: String,
    pub price: RawPrice,
}

/// Amounts are transported as decimal strings.
#[derive(Debug, Deserialize)]
pub struct RawPrice {
    pub amount: String,
    pub denom: String,
}
