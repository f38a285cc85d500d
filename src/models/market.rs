use serde::{Deserialize, Serialize};

/// One row of the market-cap ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEntry {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub market_cap_rank: u32,
    pub market_cap: i64,
}

impl MarketEntry {
    pub fn new(id: &str, symbol: &str, name: &str, market_cap_rank: u32, market_cap: i64) -> Self {
        Self {
            id: id.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            market_cap_rank,
            market_cap,
        }
    }

    pub fn base_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }

    pub fn pair(&self) -> String {
        format!("{}{}", self.base_symbol(), QUOTE_ASSET)
    }

    /// Label used when reporting a failure for this asset, e.g. `Bitcoin(BTC)`.
    pub fn label(&self) -> String {
        format!("{}({})", self.name, self.base_symbol())
    }
}

pub const QUOTE_ASSET: &str = "USDT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub symbol: String,
    pub pair: String,
    pub start_price: f64,
    pub current_price: f64,
    pub change_pct: f64,
    pub market_cap: i64,
    pub market_cap_rank: u32,
    /// Position in the filtered universe; breaks ties between equal changes.
    pub source_index: usize,
}

pub fn change_pct(start_price: f64, end_price: f64) -> f64 {
    (end_price - start_price) / start_price * 100.0
}

impl Candidate {
    /// Returns `None` unless `start_price` is strictly positive.
    pub fn from_prices(
        entry: &MarketEntry,
        source_index: usize,
        start_price: f64,
        current_price: f64,
    ) -> Option<Self> {
        if start_price <= 0.0 || !start_price.is_finite() {
            return None;
        }
        Some(Self {
            name: entry.name.clone(),
            symbol: entry.base_symbol(),
            pair: entry.pair(),
            start_price,
            current_price,
            change_pct: change_pct(start_price, current_price),
            market_cap: entry.market_cap,
            market_cap_rank: entry.market_cap_rank,
            source_index,
        })
    }
}
