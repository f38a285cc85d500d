use async_trait::async_trait;
use log::{debug, info};

use crate::api::http::HttpFetcher;
use crate::api::types::CgMarket;
use crate::api::RankingProvider;
use crate::error::{Error, Result};
use crate::models::market::MarketEntry;

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: HttpFetcher,
    api_key: Option<String>,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(http: HttpFetcher, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            http,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RankingProvider for CoinGeckoClient {
    async fn top_markets(&self, limit: u32) -> Result<Vec<MarketEntry>> {
        let url = format!("{}/coins/markets", self.base_url);
        let per_page = limit.to_string();
        let mut request = self.http.client().get(&url).query(&[
            ("vs_currency", "usd"),
            ("order", "market_cap_desc"),
            ("per_page", per_page.as_str()),
            ("page", "1"),
        ]);
        if let Some(key) = &self.api_key {
            debug!("Using CoinGecko API key");
            request = request.header(API_KEY_HEADER, key);
        }

        let body = self.http.fetch(request, "CoinGecko markets").await?;
        let entries = decode_markets(&body)?;
        info!("CoinGecko returned {} market entries", entries.len());
        Ok(entries)
    }
}

pub fn decode_markets(body: &[u8]) -> Result<Vec<MarketEntry>> {
    let markets: Vec<CgMarket> = serde_json::from_slice(body)
        .map_err(|e| Error::DecodeError(format!("Failed to parse CoinGecko markets: {}", e)))?;
    Ok(markets.into_iter().map(MarketEntry::from).collect())
}
