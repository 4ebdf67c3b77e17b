use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response from stargaze: {0}")]
    InvalidResponse(String),

    #[error("validation failed for '{collection}': {reason}")]
    Validation { collection: String, reason: String },
}
