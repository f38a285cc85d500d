use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;

use crate::api::http::{parse_price, HttpFetcher};
use crate::api::types::{OkxCandleResponse, OKX_CLOSE_INDEX};
use crate::api::RangePriceSource;
use crate::error::{Error, Result};

pub const CANDLE_BAR: &str = "1D";

/// OKX market candles, used for a start/end quote on a single instrument.
#[derive(Debug, Clone)]
pub struct OkxClient {
    http: HttpFetcher,
    base_url: String,
}

pub fn inst_id(symbol: &str) -> String {
    format!("{}-USDT", symbol.to_uppercase())
}

impl OkxClient {
    pub fn new(http: HttpFetcher, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Close of the daily candle anchored at `at`.
    async fn close_at(&self, inst_id: &str, at: DateTime<Utc>, boundary: &str) -> Result<f64> {
        let url = format!("{}/api/v5/market/candles", self.base_url);
        let after = at.timestamp_millis().to_string();
        debug!("OKX candles {} {} boundary {}", inst_id, boundary, at.to_rfc3339());
        let request = self.http.client().get(&url).query(&[
            ("instId", inst_id),
            ("bar", CANDLE_BAR),
            ("after", after.as_str()),
            ("limit", "1"),
        ]);
        let body = self.http.fetch(request, "OKX candles").await?;
        decode_first_close(&body, inst_id, boundary)
    }
}

#[async_trait]
impl RangePriceSource for OkxClient {
    async fn range_prices(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(f64, f64)> {
        let inst_id = inst_id(symbol);
        let start_price = self.close_at(&inst_id, start, "start").await?;
        let end_price = self.close_at(&inst_id, end, "end").await?;
        Ok((start_price, end_price))
    }
}

pub fn decode_first_close(body: &[u8], inst_id: &str, boundary: &str) -> Result<f64> {
    let response: OkxCandleResponse = serde_json::from_slice(body)?;
    if !response.is_ok() {
        return Err(Error::ApiError(format!(
            "OKX rejected {} ({}): {}",
            inst_id, response.code, response.message
        )));
    }
    let first = response
        .data
        .first()
        .ok_or_else(|| Error::NoData(format!("no {} data for {}", boundary, inst_id)))?;
    let close = first
        .get(OKX_CLOSE_INDEX)
        .ok_or_else(|| Error::DecodeError(format!("OKX candle for {} has no close field", inst_id)))?;
    parse_price(close, &format!("{} {} close", inst_id, boundary))
}
