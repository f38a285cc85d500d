#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use topcap_movers::api::http::{build_client, HttpFetcher};
use topcap_movers::api::{RangePriceSource, SpotPriceSource};
use topcap_movers::config::{Config, HttpConfig};
use topcap_movers::error::{Error, Result};
use topcap_movers::models::market::MarketEntry;

// Helper to create a config whose venues all point at `base_url`
pub fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.api.coingecko_base_url = base_url.to_string();
    config.api.binance_base_url = base_url.to_string();
    config.api.okx_base_url = base_url.to_string();
    config.http.request_timeout_secs = 2;
    config.http.connect_timeout_secs = 1;
    config.http.use_system_proxy = false;
    config.fetch.cooldown_ms = 1;
    config
}

pub fn create_test_fetcher(http: &HttpConfig) -> HttpFetcher {
    HttpFetcher::new(build_client(http).expect("client builds"), http)
}

pub fn entry(symbol: &str, rank: u32) -> MarketEntry {
    MarketEntry::new(&symbol.to_lowercase(), &symbol.to_lowercase(), symbol, rank, 1_000 - rank as i64)
}

#[derive(Debug, Clone)]
pub struct CallSpan {
    pub pair: String,
    pub started: Instant,
    pub finished: Instant,
}

/// Spot source answering from a fixed table after `delay`, recording every
/// call and the highest number of calls in flight at once.
pub struct RecordingSpotSource {
    prices: HashMap<String, (f64, f64)>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<CallSpan>>,
}

impl RecordingSpotSource {
    /// `prices` maps a pair to `(open, current)`. Unknown pairs get `NoData`.
    pub fn new(prices: &[(&str, f64, f64)], delay: Duration) -> Self {
        Self {
            prices: prices
                .iter()
                .map(|(pair, open, current)| (pair.to_string(), (*open, *current)))
                .collect(),
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<CallSpan> {
        self.calls.lock().unwrap().clone()
    }

    async fn record<T>(&self, pair: &str, answer: Result<T>) -> Result<T> {
        let started = Instant::now();
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(CallSpan {
            pair: pair.to_string(),
            started,
            finished: Instant::now(),
        });
        answer
    }
}

#[async_trait]
impl SpotPriceSource for RecordingSpotSource {
    async fn current_price(&self, pair: &str) -> Result<f64> {
        let answer = self
            .prices
            .get(pair)
            .map(|p| p.1)
            .ok_or_else(|| Error::BadStatus { status: 400, body: format!("unknown symbol {}", pair) });
        self.record(pair, answer).await
    }

    async fn historical_open(&self, pair: &str, _at: DateTime<Utc>) -> Result<f64> {
        let answer = self
            .prices
            .get(pair)
            .map(|p| p.0)
            .ok_or_else(|| Error::NoData(format!("no klines for {}", pair)));
        self.record(pair, answer).await
    }
}

/// Range source that always fails; the enrichment line must degrade.
pub struct UnavailableRangeSource;

#[async_trait]
impl RangePriceSource for UnavailableRangeSource {
    async fn range_prices(
        &self,
        symbol: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<(f64, f64)> {
        Err(Error::SourceUnavailable(format!("{} venue down", symbol)))
    }
}

/// Serves `responses` to consecutive connections, one response each, and
/// yields the raw request heads it received.
pub async fn serve(responses: Vec<(&'static str, Vec<u8>)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        let mut heads = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
                if head.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            heads.push(String::from_utf8_lossy(&head).into_owned());
            let response_head = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            let _ = socket.write_all(response_head.as_bytes()).await;
            let _ = socket.write_all(&body).await;
            let _ = socket.shutdown().await;
        }
        heads
    });
    (format!("http://{}", addr), handle)
}

/// Accepts one connection and never answers it.
pub async fn serve_silent() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        if let Ok((_socket, _)) = listener.accept().await {
            tokio::time::sleep(Duration::from_secs(10)).await;
        }
    });
    (format!("http://{}", addr), handle)
}
