use anyhow::Result;
use clap::Parser;
use log::info;

use topcap_movers::analyzer::Analyzer;
use topcap_movers::cli::Cli;
use topcap_movers::config::Config;
use topcap_movers::{logging, report};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.debug, cli.log_file.as_deref())?;

    let config = match Config::resolve(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(anyhow::anyhow!("Configuration loading failed: {}", e));
        }
    };

    let start = match cli.start {
        Some(start) if !start.trim().is_empty() => start,
        _ => {
            return Err(anyhow::anyhow!(
                "--start is required, e.g. --start 2025-09-01T00:00:00Z or --start 1725148800"
            ));
        }
    };
    let concurrency = cli.concurrency.unwrap_or(config.fetch.concurrency);

    let analyzer = Analyzer::from_config(&config)?;
    info!("Starting analysis with concurrency {}", concurrency);

    let result = match analyzer.run(&start, concurrency).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            return Err(e.into());
        }
    };

    for line in report::render(&result, config.fetch.universe_size, config.fetch.top_k) {
        println!("{}", line);
    }
    for line in report::skipped_lines(&result) {
        eprintln!("{}", line);
    }

    Ok(())
}
