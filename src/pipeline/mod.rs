//! Bounded fan-out over the filtered universe, per-asset error isolation and
//! ranking by price change.

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::api::{RangePriceSource, SpotPriceSource};
use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::filter;
use crate::models::market::{change_pct, Candidate, MarketEntry, QUOTE_ASSET};
use crate::models::{Enrichment, FetchError, FetchOutcome, RunResult};

mod worker;

use worker::AssetTask;

pub const MAX_CONCURRENCY: usize = 1024;

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub top_k: usize,
    /// Pause each task takes, still holding its slot, after its fetches.
    pub cooldown: Duration,
    pub enrichment_symbol: Option<String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        PipelineSettings::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for PipelineSettings {
    fn from(config: &FetchConfig) -> Self {
        Self {
            top_k: config.top_k,
            cooldown: config.cooldown(),
            enrichment_symbol: config.enrichment_symbol.clone(),
        }
    }
}

enum Pending {
    Spawned(String, JoinHandle<FetchOutcome>),
    Done(FetchOutcome),
}

pub struct Pipeline {
    spot: Arc<dyn SpotPriceSource>,
    range: Arc<dyn RangePriceSource>,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        spot: Arc<dyn SpotPriceSource>,
        range: Arc<dyn RangePriceSource>,
        settings: PipelineSettings,
    ) -> Self {
        Self { spot, range, settings }
    }

    /// Filters `universe`, prices every remaining asset with at most
    /// `concurrency` tasks in flight, and ranks the successes.
    ///
    /// Per-asset failures end up in `RunResult::errors`; a failed enrichment
    /// ends up in `RunResult::enrichment`. Neither fails the run.
    pub async fn run(
        &self,
        universe: Vec<MarketEntry>,
        start: DateTime<Utc>,
        concurrency: usize,
    ) -> RunResult {
        let total = universe.len();
        let eligible = filter::eligible(universe);
        info!(
            "{} of {} assets eligible after filtering, concurrency {}",
            eligible.len(),
            total,
            concurrency
        );

        let (outcomes, enrichment) = tokio::join!(
            self.fan_out(eligible, start, concurrency),
            self.enrich(start, Utc::now())
        );

        let submitted = outcomes.len();
        let (candidates, errors) = partition(outcomes);
        info!("{} priced, {} skipped", candidates.len(), errors.len());

        RunResult {
            start,
            submitted,
            candidates: rank(candidates, self.settings.top_k),
            errors,
            enrichment,
        }
    }

    /// Runs one task per entry behind a counting gate and returns exactly one
    /// outcome per entry, in entry order.
    pub async fn fan_out(
        &self,
        entries: Vec<MarketEntry>,
        start: DateTime<Utc>,
        concurrency: usize,
    ) -> Vec<FetchOutcome> {
        let slots = concurrency.clamp(1, MAX_CONCURRENCY);
        let gate = Arc::new(Semaphore::new(slots));
        let mut pending = Vec::with_capacity(entries.len());

        for (source_index, entry) in entries.into_iter().enumerate() {
            let label = entry.label();
            let permit = match gate.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    pending.push(Pending::Done(FetchOutcome::Failed(FetchError {
                        label,
                        cause: Error::InternalError(format!("admission gate closed: {}", e)),
                    })));
                    continue;
                }
            };
            let task = AssetTask {
                spot: Arc::clone(&self.spot),
                entry,
                source_index,
                start,
                cooldown: self.settings.cooldown,
            };
            pending.push(Pending::Spawned(label, tokio::spawn(task.run(permit))));
        }

        // Barrier: every slot back in the gate means every task has finished.
        match gate.acquire_many(slots as u32).await {
            Ok(all) => drop(all),
            Err(e) => error!("Failed to drain admission gate: {}", e),
        }

        let mut outcomes = Vec::with_capacity(pending.len());
        for item in pending {
            let outcome = match item {
                Pending::Done(outcome) => outcome,
                Pending::Spawned(label, handle) => match handle.await {
                    Ok(outcome) => outcome,
                    Err(e) => FetchOutcome::Failed(FetchError {
                        label,
                        cause: Error::InternalError(format!("task aborted: {}", e)),
                    }),
                },
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn enrich(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Result<Enrichment>> {
        let symbol = self.settings.enrichment_symbol.as_deref()?.to_uppercase();
        let result = match self.range.range_prices(&symbol, start, end).await {
            Ok((start_price, end_price)) if start_price > 0.0 => Ok(Enrichment {
                pair: format!("{}/{}", symbol, QUOTE_ASSET),
                symbol,
                start_price,
                end_price,
                change_pct: change_pct(start_price, end_price),
            }),
            Ok((start_price, _)) => Err(Error::EnrichmentUnavailable {
                symbol,
                cause: format!("non-positive start price {}", start_price),
            }),
            Err(e) => Err(Error::EnrichmentUnavailable { symbol, cause: e.to_string() }),
        };
        if let Err(e) = &result {
            warn!("{}", e);
        }
        Some(result)
    }
}

/// Splits outcomes into candidates and errors, keeping the input order.
pub fn partition(outcomes: Vec<FetchOutcome>) -> (Vec<Candidate>, Vec<FetchError>) {
    let mut candidates = Vec::new();
    let mut errors = Vec::new();
    for outcome in outcomes {
        match outcome {
            FetchOutcome::Candidate(candidate) => candidates.push(candidate),
            FetchOutcome::Failed(err) => errors.push(err),
        }
    }
    (candidates, errors)
}

/// Sorts by change descending and keeps the first `top_k`. Equal changes keep
/// universe order: candidates are put in `source_index` order before a stable
/// sort, so the result does not depend on task completion order.
pub fn rank(mut candidates: Vec<Candidate>, top_k: usize) -> Vec<Candidate> {
    candidates.sort_by_key(|c| c.source_index);
    candidates.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct));
    candidates.truncate(top_k);
    candidates
}
