use chrono::Local;
use env_logger::{Builder, Env, Target};
use log::{warn, LevelFilter};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

fn level_for(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger. `RUST_LOG` still wins over `debug` when set.
/// With `log_file`, lines are appended to that file instead of stderr.
pub fn init(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = level_for(debug).to_string().to_lowercase();
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.args()
        )
    });

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    // A second init (e.g. from tests) keeps the first logger.
    if builder.try_init().is_err() {
        if let Some(path) = log_file {
            warn!("Logger already installed; not writing to {}", path.display());
        }
    }
    Ok(())
}
