use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Start of the window: RFC3339 (2025-09-01T00:00:00Z), Unix seconds
    /// (1725148800) or local "YYYY-MM-DD HH:MM:SS"
    #[arg(short, long)]
    pub start: Option<String>,

    /// Maximum number of assets fetched concurrently
    #[arg(short = 'n', long)]
    pub concurrency: Option<usize>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Append log output to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["topcap-movers", "-s", "2025-09-01T00:00:00Z", "-n", "5", "-d"]);
        assert_eq!(cli.start.as_deref(), Some("2025-09-01T00:00:00Z"));
        assert_eq!(cli.concurrency, Some(5));
        assert!(cli.debug);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_start_is_optional_at_parse_time() {
        let cli = Cli::parse_from(["topcap-movers"]);
        assert!(cli.start.is_none());
        assert!(cli.concurrency.is_none());
    }
}
