//! Classification of pegged and wrapped assets that should never be ranked.
//!
//! The symbol sets are immutable process-wide constants, so workers can read
//! them concurrently without synchronisation.

use crate::models::market::MarketEntry;

pub const STABLECOINS: &[&str] = &[
    "USDT", "USDC", "BUSD", "TUSD", "DAI", "FDUSD", "USDE", "USDD", "USDJ", "GUSD", "PYUSD",
    "USDP", "LUSD", "SUSD",
];

pub const WRAPPED_SYMBOL_BLACKLIST: &[&str] = &["WBTC", "WBETH", "WETH", "WBNB", "WAVAX"];

pub fn is_stablecoin(symbol: &str) -> bool {
    let sym = symbol.to_uppercase();
    STABLECOINS.contains(&sym.as_str())
}

pub fn is_wrapped_asset(name: &str, symbol: &str) -> bool {
    let sym = symbol.to_uppercase();
    if WRAPPED_SYMBOL_BLACKLIST.contains(&sym.as_str()) {
        return true;
    }
    name.to_lowercase().contains("wrapped")
}

pub fn is_excluded(name: &str, symbol: &str) -> bool {
    is_stablecoin(symbol) || is_wrapped_asset(name, symbol)
}

/// Keeps the entries that pass the filter, preserving ranking order.
pub fn eligible(universe: Vec<MarketEntry>) -> Vec<MarketEntry> {
    universe
        .into_iter()
        .filter(|entry| {
            let excluded = is_excluded(&entry.name, &entry.symbol);
            if excluded {
                log::debug!("Excluding {} ({})", entry.name, entry.symbol);
            }
            !excluded
        })
        .collect()
}
