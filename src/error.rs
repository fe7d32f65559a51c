use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrioritizerError {
    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("invalid scoring configuration: {0}")]
    InvalidConfig(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("invalid input: {0}")]
    Input(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml render error: {0}")]
    TomlRender(#[from] toml::ser::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Failure of the signal source for a single domain. Never aborts a batch.
#[allow(dead_code)]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("no signal data found for {0}")]
    NotFound(String),

    #[error("signal source timed out for {0}")]
    Timeout(String),

    #[error("signal source rate-limited request for {0}")]
    RateLimited(String),

    #[error("signal source unreachable for {domain}: {detail}")]
    Unreachable { domain: String, detail: String },

    #[error("malformed signal data for {domain}: {detail}")]
    Malformed { domain: String, detail: String },
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::Timeout(_) | FetchError::RateLimited(_) | FetchError::Unreachable { .. }
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlurbError {
    #[error("blurb generation failed for {domain}: {detail}")]
    Generation { domain: String, detail: String },
}

pub type Result<T> = std::result::Result<T, PrioritizerError>;
