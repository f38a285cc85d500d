use log::{error, info};
use std::sync::Arc;

use crate::api::{MarketDataCollector, RankingProvider};
use crate::config::Config;
use crate::error::Result;
use crate::models::RunResult;
use crate::pipeline::{Pipeline, PipelineSettings};
use crate::utils::time::parse_start_time;

/// Wires the ranking provider to the pipeline for a single run.
pub struct Analyzer {
    ranking: Arc<dyn RankingProvider>,
    pipeline: Pipeline,
    universe_size: u32,
}

impl Analyzer {
    pub fn new(ranking: Arc<dyn RankingProvider>, pipeline: Pipeline, universe_size: u32) -> Self {
        Self { ranking, pipeline, universe_size }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let collector = MarketDataCollector::from_config(config)?;
        let pipeline = Pipeline::new(
            collector.spot,
            collector.range,
            PipelineSettings::from(&config.fetch),
        );
        Ok(Self::new(collector.ranking, pipeline, config.fetch.universe_size))
    }

    /// Fails only when the start time cannot be parsed or the ranked universe
    /// cannot be fetched; everything after that degrades per asset.
    pub async fn run(&self, start: &str, concurrency: usize) -> Result<RunResult> {
        let start = parse_start_time(start)?;
        info!("Window start {}", start.to_rfc3339());

        let universe = self
            .ranking
            .top_markets(self.universe_size)
            .await
            .map_err(|e| {
                error!("Failed to fetch top {} by market cap: {}", self.universe_size, e);
                e
            })?;

        Ok(self.pipeline.run(universe, start, concurrency).await)
    }
}
