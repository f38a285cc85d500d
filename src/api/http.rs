use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use log::debug;

use crate::config::HttpConfig;
use crate::error::{Error, Result};

/// Builds the process-wide pooled client. Build it once and clone it into
/// every adapter; clones share the same connection pool.
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    let mut builder = Client::builder();
    if !config.use_system_proxy {
        builder = builder.no_proxy();
    }
    builder
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .tcp_keepalive(Duration::from_secs(config.keep_alive_secs))
        .pool_max_idle_per_host(config.max_idle_connections)
        .pool_idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

/// Reads at most `limit` bytes of the body. The flag is set when the body was
/// longer than `limit` and got cut.
pub async fn read_limited(mut response: Response, limit: usize) -> Result<(Vec<u8>, bool)> {
    let mut buf = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let remaining = limit.saturating_sub(buf.len());
        if chunk.len() > remaining {
            buf.extend_from_slice(&chunk[..remaining]);
            return Ok((buf, true));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok((buf, false))
}

/// The shared client plus the per-request limits every adapter applies.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    request_timeout: Duration,
    error_body_limit: usize,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(client: Client, config: &HttpConfig) -> Self {
        Self {
            client,
            request_timeout: config.request_timeout(),
            error_body_limit: config.error_body_limit,
            max_body_bytes: config.max_body_bytes,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Sends `request` and returns the body of a 2xx response.
    ///
    /// Transport failures and timeouts map to `SourceUnavailable`, non-2xx
    /// statuses to `BadStatus` carrying a truncated body, and oversized
    /// success bodies to `DecodeError`.
    pub async fn fetch(&self, request: RequestBuilder, what: &str) -> Result<Vec<u8>> {
        let response = request
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("{} request failed: {}", what, e)))?;

        let status = response.status();
        debug!("{} responded with {}", what, status);
        if !status.is_success() {
            let (body, _) = read_limited(response, self.error_body_limit)
                .await
                .unwrap_or_default();
            return Err(Error::BadStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let (body, truncated) = read_limited(response, self.max_body_bytes)
            .await
            .map_err(|e| Error::SourceUnavailable(format!("{} body read failed: {}", what, e)))?;
        if truncated {
            return Err(Error::DecodeError(format!(
                "{} response exceeds {} bytes",
                what, self.max_body_bytes
            )));
        }
        Ok(body)
    }
}

pub fn parse_price(raw: &str, what: &str) -> Result<f64> {
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|e| Error::DecodeError(format!("{} is not a decimal ({:?}): {}", what, raw, e)))?;
    if !price.is_finite() {
        return Err(Error::DecodeError(format!("{} is not finite: {}", what, raw)));
    }
    Ok(price)
}
