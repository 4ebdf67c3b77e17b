use market::FetchError;
use thiserror::Error;

/// Failure of a single refresh pass. Never fatal to the refresh loop.
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("no listings found for '{collection}'")]
    NoListings { collection: String },

    #[error(transparent)]
    State(#[from] StateError),
}

impl RefreshError {
    /// Stable label used as the `error_kind` log field.
    pub fn kind(&self) -> &'static str {
        match self {
            RefreshError::Fetch(FetchError::Validation { .. }) => "validation",
            RefreshError::Fetch(_) => "fetch",
            RefreshError::NoListings { .. } => "no_listings",
            RefreshError::State(_) => "state",
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StateError {
    #[error("collection '{0}' is not tracked")]
    UnknownCollection(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SupervisorError {
    #[error("refresh tasks are already running")]
    AlreadyWatching,
}
