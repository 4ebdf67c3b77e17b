//! Floor derivation over a [`TraitAskMap`].

use std::collections::BTreeMap;

use crate::types::{Listing, TraitAskMap};

/// Cheapest listing across every trait and value, by raw amount.
///
/// Returns `None` when the map holds no listing at all. On equal amounts the
/// first listing in iteration order wins.
pub fn min_ask(asks: &TraitAskMap) -> Option<&Listing> {
    let mut floor: Option<&Listing> = None;

    for listing in asks.values().flat_map(|values| values.values().flatten()) {
        match floor {
            Some(current) if current.price.amount <= listing.price.amount => {}
            _ => floor = Some(listing),
        }
    }

    floor
}

/// Per-trait, per-value floor in display units. Values with no listings are omitted.
pub fn trait_floors(asks: &TraitAskMap) -> BTreeMap<String, BTreeMap<String, f64>> {
    asks.iter()
        .map(|(trait_name, values)| {
            let floors = values
                .iter()
                .filter_map(|(value, listings)| {
                    listings
                        .iter()
                        .min_by_key(|l| l.price.amount)
                        .map(|l| (value.clone(), l.price.stars()))
                })
                .collect();
            (trait_name.clone(), floors)
        })
        .collect()
}
