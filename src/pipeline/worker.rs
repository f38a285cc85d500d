use chrono::{DateTime, Utc};
use log::{debug, error, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OwnedSemaphorePermit;

use crate::api::SpotPriceSource;
use crate::error::{Error, Result};
use crate::filter;
use crate::models::market::{Candidate, MarketEntry};
use crate::models::{FetchError, FetchOutcome};

/// One admitted asset. Holds its gate permit for the whole task, cooldown
/// included, and gives it back by dropping it on every exit path.
pub(crate) struct AssetTask {
    pub spot: Arc<dyn SpotPriceSource>,
    pub entry: MarketEntry,
    pub source_index: usize,
    pub start: DateTime<Utc>,
    pub cooldown: Duration,
}

impl AssetTask {
    pub async fn run(self, permit: OwnedSemaphorePermit) -> FetchOutcome {
        let label = self.entry.label();
        debug!("[{}] admitted", label);

        let outcome = match self.analyze(&label).await {
            Ok(candidate) => {
                debug!("[{}] succeeded: {:.2}%", label, candidate.change_pct);
                FetchOutcome::Candidate(candidate)
            }
            Err(cause) => {
                if cause.is_no_data() {
                    warn!("[{}] no data: {}", label, cause);
                } else {
                    error!("[{}] failed: {}", label, cause);
                }
                FetchOutcome::Failed(FetchError { label: label.clone(), cause })
            }
        };

        debug!("[{}] cooldown {}ms", label, self.cooldown.as_millis());
        tokio::time::sleep(self.cooldown).await;
        drop(permit);
        debug!("[{}] slot released", label);
        outcome
    }

    async fn analyze(&self, label: &str) -> Result<Candidate> {
        debug!("[{}] filtering", label);
        // Already filtered before fan-out; checked again at the point of use.
        if filter::is_excluded(&self.entry.name, &self.entry.symbol) {
            return Err(Error::ExcludedAsset(self.entry.base_symbol()));
        }
        let pair = self.entry.pair();

        debug!("[{}] fetching current price for {}", label, pair);
        let current_price = self.spot.current_price(&pair).await?;

        debug!("[{}] fetching open at {}", label, self.start.to_rfc3339());
        let start_price = self.spot.historical_open(&pair, self.start).await?;

        Candidate::from_prices(&self.entry, self.source_index, start_price, current_price)
            .ok_or_else(|| {
                Error::NoData(format!("no valid start price for {} (got {})", pair, start_price))
            })
    }
}
