use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use log::info;

use crate::config::Config;
use crate::error::Result;
use crate::models::market::MarketEntry;

pub mod binance;
pub mod coingecko;
pub mod http;
pub mod okx;
pub mod types;

/// Source of the market-cap ranked universe.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RankingProvider: Send + Sync {
    async fn top_markets(&self, limit: u32) -> Result<Vec<MarketEntry>>;
}

/// Spot venue quoting a trading pair such as `BTCUSDT`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpotPriceSource: Send + Sync {
    /// Latest traded price.
    async fn current_price(&self, pair: &str) -> Result<f64>;

    /// Open of the first period at or after `at`; `NoData` when there is none.
    async fn historical_open(&self, pair: &str, at: DateTime<Utc>) -> Result<f64>;
}

/// Venue answering a start/end quote for a base symbol.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RangePriceSource: Send + Sync {
    async fn range_prices(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(f64, f64)>;
}

/// The three adapters, all sharing one pooled HTTP client.
#[derive(Clone)]
pub struct MarketDataCollector {
    pub ranking: Arc<dyn RankingProvider>,
    pub spot: Arc<dyn SpotPriceSource>,
    pub range: Arc<dyn RangePriceSource>,
}

impl MarketDataCollector {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = http::build_client(&config.http)?;
        let fetcher = http::HttpFetcher::new(client, &config.http);

        let collector = Self {
            ranking: Arc::new(coingecko::CoinGeckoClient::new(
                fetcher.clone(),
                &config.api.coingecko_base_url,
                config.api.coingecko_api_key.clone(),
            )),
            spot: Arc::new(binance::BinanceClient::new(
                fetcher.clone(),
                &config.api.binance_base_url,
            )),
            range: Arc::new(okx::OkxClient::new(fetcher, &config.api.okx_base_url)),
        };
        info!("Market data collector initialized.");
        Ok(collector)
    }
}
