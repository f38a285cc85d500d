pub mod analyzer;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use error::{Error, Result};
