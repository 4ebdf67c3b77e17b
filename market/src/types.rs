use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Base units per display unit (1 STARS = 10^6 ustars).
pub const USTARS_PER_STARS: u128 = 1_000_000;

/// Native Stargaze denomination.
pub const USTARS_DENOM: &str = "ustars";

/// Asking price of a single listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Raw amount in base units.
    pub amount: u128,
    pub denom: String,
}

impl Price {
    pub fn ustars(amount: u128) -> Self {
        Self {
            amount,
            denom: USTARS_DENOM.to_string(),
        }
    }

    /// Amount converted to the display unit.
    pub fn stars(&self) -> f64 {
        self.amount as f64 / USTARS_PER_STARS as f64
    }
}

/// One marketplace ask for a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub token_id: String,
    pub seller: String,
    pub price: Price,
}

impl Listing {
    pub fn new(token_id: impl Into<String>, seller: impl Into<String>, price: Price) -> Self {
        Self {
            token_id: token_id.into(),
            seller: seller.into(),
            price,
        }
    }
}

/// trait name → trait value → listings asking for that value.
///
/// Ordered maps keep iteration deterministic across fetches.
pub type TraitAskMap = BTreeMap<String, BTreeMap<String, Vec<Listing>>>;
