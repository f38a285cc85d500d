use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use serde_json::Value;

use crate::api::http::{parse_price, HttpFetcher};
use crate::api::types::{BinanceKline, BinanceTickerPrice, KLINE_OPEN_INDEX};
use crate::api::SpotPriceSource;
use crate::error::{Error, Result};

pub const KLINE_INTERVAL: &str = "1m";

/// Binance spot REST: latest ticker price and one-minute klines.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    http: HttpFetcher,
    base_url: String,
}

impl BinanceClient {
    pub fn new(http: HttpFetcher, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SpotPriceSource for BinanceClient {
    async fn current_price(&self, pair: &str) -> Result<f64> {
        let url = format!("{}/api/v3/ticker/price", self.base_url);
        debug!("Binance ticker {}", pair);
        let request = self.http.client().get(&url).query(&[("symbol", pair)]);
        let body = self.http.fetch(request, "Binance ticker").await?;
        decode_ticker_price(&body)
    }

    async fn historical_open(&self, pair: &str, at: DateTime<Utc>) -> Result<f64> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let start_ms = at.timestamp_millis().to_string();
        debug!("Binance klines {} from {}", pair, at.to_rfc3339());
        let request = self.http.client().get(&url).query(&[
            ("symbol", pair),
            ("interval", KLINE_INTERVAL),
            ("startTime", start_ms.as_str()),
            ("limit", "1"),
        ]);
        let body = self.http.fetch(request, "Binance klines").await?;
        decode_first_open(&body, pair)
    }
}

pub fn decode_ticker_price(body: &[u8]) -> Result<f64> {
    let ticker: BinanceTickerPrice = serde_json::from_slice(body)?;
    parse_price(&ticker.price, &format!("{} ticker price", ticker.symbol))
}

/// Open price of the first kline in the response. An empty array means the
/// pair has no periods at or after the requested start.
pub fn decode_first_open(body: &[u8], pair: &str) -> Result<f64> {
    let klines: Vec<BinanceKline> = serde_json::from_slice(body)?;
    let first = klines.first().ok_or_else(|| {
        Error::NoData(format!(
            "no klines for {} at or after start (not listed yet or no trades)",
            pair
        ))
    })?;
    let open = first
        .get(KLINE_OPEN_INDEX)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::DecodeError(format!("kline open field malformed for {}", pair)))?;
    parse_price(open, &format!("{} kline open", pair))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ticker_price() {
        let body = br#"{"symbol":"BTCUSDT","price":"55000.00000000"}"#;
        assert_eq!(decode_ticker_price(body).unwrap(), 55000.0);
    }

    #[test]
    fn test_decode_ticker_bad_payloads() {
        assert!(matches!(decode_ticker_price(b"<html>"), Err(Error::DecodeError(_))));
        assert!(matches!(
            decode_ticker_price(br#"{"symbol":"BTCUSDT","price":"n/a"}"#),
            Err(Error::DecodeError(_))
        ));
        assert!(matches!(
            decode_ticker_price(br#"{"symbol":"BTCUSDT","price":55000}"#),
            Err(Error::DecodeError(_))
        ));
    }

    #[test]
    fn test_decode_first_open() {
        let body = br#"[[1725148800000,"50000.00","50100.00","49900.00","50050.00","12.5",1725148859999,"625000.0",100,"6.0","300000.0","0"]]"#;
        assert_eq!(decode_first_open(body, "BTCUSDT").unwrap(), 50000.0);
    }

    #[test]
    fn test_decode_first_open_empty_is_no_data() {
        let err = decode_first_open(b"[]", "NEWUSDT").unwrap_err();
        assert!(err.is_no_data());
        assert!(err.to_string().contains("NEWUSDT"));
    }

    #[test]
    fn test_decode_first_open_malformed_row() {
        assert!(matches!(
            decode_first_open(b"[[1725148800000, 50000.0]]", "BTCUSDT"),
            Err(Error::DecodeError(_))
        ));
        assert!(matches!(decode_first_open(b"[[1725148800000]]", "BTCUSDT"), Err(Error::DecodeError(_))));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let http = HttpFetcher::new(reqwest::Client::new(), &crate::config::HttpConfig::default());
        let client = BinanceClient::new(http, "https://api.binance.com/");
        assert_eq!(client.base_url, "https://api.binance.com");
    }
}
