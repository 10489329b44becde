// =============================================================================
// Market data providers
// =============================================================================
//
// A provider turns `(symbol, lookback_days)` into a validated, oldest-first
// `BarSeries`.  The engine treats providers as opaque and never retries or
// caches on their behalf.
// =============================================================================

pub mod finnhub;
pub mod yahoo;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::market_data::{Bar, BarSeries};

pub use finnhub::FinnhubClient;
pub use yahoo::YahooClient;

/// HTTP timeout for every provider request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider}: no data for {symbol}")]
    NoData { provider: String, symbol: String },

    #[error("{provider} returned {status}: {message}")]
    Upstream {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Series(#[from] EngineError),
}

// =============================================================================
// Provider trait
// =============================================================================

/// Source of daily OHLCV bars.
#[async_trait]
pub trait BarProvider: Send + Sync {
    /// Short identifier reported back to API callers (e.g. `"yahoo"`).
    fn name(&self) -> &str;

    /// Up to `lookback_days` trailing daily bars for `symbol`, oldest first,
    /// one per date.
    async fn fetch_bars(&self, symbol: &str, lookback_days: usize) -> Result<ProviderBars, ProviderError>;
}

/// Bars as returned by one provider, tagged with the ticker it actually
/// queried (e.g. `005930.KS` for the request `005930`).
#[derive(Debug, Clone)]
pub struct ProviderBars {
    pub ticker: String,
    pub series: BarSeries,
}

/// Build the shared HTTP client used by all providers.
pub fn http_client() -> Result<reqwest::Client, ProviderError> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent("Mozilla/5.0")
        .build()?;
    Ok(client)
}

/// Calendar days to request so that `lookback_days` trading days fit,
/// allowing for weekends and holidays.
pub(crate) fn calendar_span_days(lookback_days: usize) -> i64 {
    (lookback_days * 3 / 2 + 20) as i64
}

/// Sort by date, keep the last row for each date, and keep only the trailing
/// `lookback_days` bars.
pub fn normalize_bars(mut bars: Vec<Bar>, lookback_days: usize) -> Result<BarSeries, ProviderError> {
    // Stable sort keeps arrival order within a date, so "last wins" below.
    bars.sort_by_key(Bar::date);

    let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match deduped.last_mut() {
            Some(last) if last.date() == bar.date() => *last = bar,
            _ => deduped.push(bar),
        }
    }

    let start = deduped.len().saturating_sub(lookback_days);
    let trimmed = deduped.split_off(start);
    Ok(BarSeries::new(trimmed)?)
}

// =============================================================================
// Fallback chain
// =============================================================================

/// Bars plus the provider that supplied them and the ticker it resolved.
#[derive(Debug)]
pub struct FetchedBars {
    pub source: String,
    pub ticker: String,
    pub series: BarSeries,
}

/// Tries each provider in order and returns the first success.
pub struct FallbackProvider {
    providers: Vec<Box<dyn BarProvider>>,
}

impl FallbackProvider {
    pub fn new(providers: Vec<Box<dyn BarProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Returns the last provider's error when every provider fails.
    pub async fn fetch(&self, symbol: &str, lookback_days: usize) -> Result<FetchedBars, ProviderError> {
        let mut last_err = ProviderError::NoData {
            provider: "none".to_string(),
            symbol: symbol.to_string(),
        };

        for provider in &self.providers {
            match provider.fetch_bars(symbol, lookback_days).await {
                Ok(ProviderBars { ticker, series }) => {
                    debug!(provider = provider.name(), symbol, %ticker, bars = series.len(), "bars fetched");
                    return Ok(FetchedBars {
                        source: provider.name().to_string(),
                        ticker,
                        series,
                    });
                }
                Err(e) => {
                    warn!(provider = provider.name(), symbol, error = %e, "provider failed, trying next");
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }
}
