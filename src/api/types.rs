use serde::Deserialize;
use serde_json::Value;

use crate::models::market::MarketEntry;

/// Partial CoinGecko `/coins/markets` row.
#[derive(Debug, Clone, Deserialize)]
pub struct CgMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub current_price: Option<f64>,
    // Sent as an integer, but occasionally as a float or null.
    #[serde(default)]
    pub market_cap: Option<f64>,
}

impl From<CgMarket> for MarketEntry {
    fn from(market: CgMarket) -> Self {
        MarketEntry {
            id: market.id,
            symbol: market.symbol,
            name: market.name,
            market_cap_rank: market.market_cap_rank.unwrap_or_default(),
            market_cap: market.market_cap.map(|cap| cap as i64).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinanceTickerPrice {
    pub symbol: String,
    pub price: String,
}

/// Binance klines come back as heterogeneous arrays:
/// `[openTime, "open", "high", "low", "close", "volume", closeTime, ...]`.
pub type BinanceKline = Vec<Value>;

pub const KLINE_OPEN_INDEX: usize = 1;
pub const OKX_CLOSE_INDEX: usize = 4;

#[derive(Debug, Clone, Deserialize)]
pub struct OkxCandleResponse {
    #[serde(default)]
    pub code: Value,
    #[serde(default, alias = "msg")]
    pub message: String,
    #[serde(default)]
    pub data: Vec<Vec<String>>,
}

impl OkxCandleResponse {
    /// OKX reports success as code `"0"`; a missing code is treated as success.
    pub fn is_ok(&self) -> bool {
        match &self.code {
            Value::Null => true,
            Value::String(code) => code == "0",
            Value::Number(code) => code.as_i64() == Some(0),
            _ => false,
        }
    }
}
