use chrono::{DateTime, Utc};
use std::fmt;

use crate::error::{Error, Result};

pub mod market;

pub use market::{Candidate, MarketEntry};

/// A per-asset failure, tagged with the asset's display label.
#[derive(Debug)]
pub struct FetchError {
    pub label: String,
    pub cause: Error,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.cause)
    }
}

/// Exactly one of these is produced for every asset submitted to the pipeline.
#[derive(Debug)]
pub enum FetchOutcome {
    Candidate(Candidate),
    Failed(FetchError),
}

/// Start/end quote for the asset priced on the range venue.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub symbol: String,
    pub pair: String,
    pub start_price: f64,
    pub end_price: f64,
    pub change_pct: f64,
}

#[derive(Debug)]
pub struct RunResult {
    pub start: DateTime<Utc>,
    /// Number of assets that passed the filter and were fanned out.
    pub submitted: usize,
    pub candidates: Vec<Candidate>,
    pub errors: Vec<FetchError>,
    /// `None` when no enrichment asset is configured.
    pub enrichment: Option<Result<Enrichment>>,
}
