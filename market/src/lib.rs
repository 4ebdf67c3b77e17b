pub mod floor;
pub mod source;
pub mod stargaze;
pub mod types;

pub use floor::{min_ask, trait_floors};
pub use source::AskSource;
pub use stargaze::{FetchError, StargazeClient};
pub use types::{Listing, Price, TraitAskMap};
