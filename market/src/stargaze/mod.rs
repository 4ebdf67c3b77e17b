pub mod client;
pub mod errors;
pub mod types;

pub use client::StargazeClient;
pub use errors::FetchError;
