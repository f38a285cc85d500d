use std::io;
use std::result::Result as StdResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("Bad status {status}: {body}")]
    BadStatus { status: u16, body: String },
    #[error("Decode error: {0}")]
    DecodeError(String),
    #[error("No data: {0}")]
    NoData(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Excluded asset (stablecoin or wrapped): {0}")]
    ExcludedAsset(String),
    #[error("enrichment {symbol} unavailable: {cause}")]
    EnrichmentUnavailable { symbol: String, cause: String },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl Error {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Error::NoData(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::DecodeError(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::DecodeError(err.to_string())
        } else {
            Error::SourceUnavailable(err.to_string())
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}

pub type Result<T> = StdResult<T, Error>;
