use chrono::SecondsFormat;

use crate::models::{Enrichment, RunResult};
use crate::utils::format::format_int_with_comma;

/// Line number given to the unranked enrichment line.
pub const ENRICHMENT_LINE_NO: usize = 100;

pub fn header(result: &RunResult, universe_size: u32, top_k: usize) -> String {
    format!(
        "From {} to now, top {} by market cap (stablecoins and wrapped assets excluded), top {} USDT pairs by change:",
        result.start.to_rfc3339_opts(SecondsFormat::Secs, true),
        universe_size,
        top_k
    )
}

pub fn render(result: &RunResult, universe_size: u32, top_k: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(result.candidates.len() + 2);
    lines.push(header(result, universe_size, top_k));

    for (i, c) in result.candidates.iter().enumerate() {
        lines.push(format!(
            "{:2}) {} ({}) pair: {} cap(#{}): {} start: {:.4}  now: {:.4}  change: {:.2}%",
            i + 1,
            c.name,
            c.symbol,
            c.pair,
            c.market_cap_rank,
            format_int_with_comma(c.market_cap),
            c.start_price,
            c.current_price,
            c.change_pct
        ));
    }

    match &result.enrichment {
        Some(Ok(enrichment)) => lines.push(enrichment_line(enrichment)),
        Some(Err(e)) => lines.push(e.to_string()),
        None => {}
    }
    lines
}

fn enrichment_line(e: &Enrichment) -> String {
    format!(
        "{:2}) {} ({}) pair: {}  start: {:.5}  now: {:.5}  change: {:.2}%",
        ENRICHMENT_LINE_NO, e.symbol, e.symbol, e.pair, e.start_price, e.end_price, e.change_pct
    )
}

/// One `skipped: <label>: <cause>` line per failed asset.
pub fn skipped_lines(result: &RunResult) -> Vec<String> {
    result
        .errors
        .iter()
        .map(|err| format!("skipped: {}", err))
        .collect()
}
