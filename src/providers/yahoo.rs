// =============================================================================
// Yahoo Finance chart API client
// =============================================================================
//
// GET {base}/v8/finance/chart/{ticker}?period1=..&period2=..&interval=1d
//
// period1/period2 span enough calendar days to cover the configured lookback.
// Bare Korean codes (`5930`, `005930`) are looked up as `005930.KS`, then
// `005930.KQ`.
//
// The response carries parallel arrays (timestamp, open, high, low, close,
// volume) where any entry may be null on halted or partial days.  Those rows
// are dropped; rows that fail bar validation are skipped with a warning.
// =============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{calendar_span_days, normalize_bars, BarProvider, ProviderBars, ProviderError};
use crate::market_data::{Bar, BarSeries};

const PROVIDER: &str = "yahoo";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds; daily timestamps are the local
    /// session open, so the offset is needed to recover the trading date.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Yahoo Finance daily-bar client.
#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl BarProvider for YahooClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    #[instrument(skip(self), name = "yahoo::fetch_bars")]
    async fn fetch_bars(&self, symbol: &str, lookback_days: usize) -> Result<ProviderBars, ProviderError> {
        let mut last_err = None;

        for ticker in candidate_tickers(symbol) {
            match self.fetch_ticker(&ticker, lookback_days).await {
                Ok(series) => {
                    if ticker != symbol {
                        debug!(symbol, %ticker, "resolved domestic code");
                    }
                    return Ok(ProviderBars { ticker, series });
                }
                // Unknown listing on this market: try the next suffix.
                Err(e @ (ProviderError::NoData { .. } | ProviderError::Upstream { .. })) => {
                    debug!(symbol, %ticker, error = %e, "yahoo ticker not found");
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| ProviderError::NoData {
            provider: PROVIDER.to_string(),
            symbol: symbol.to_string(),
        }))
    }
}

impl YahooClient {
    async fn fetch_ticker(&self, ticker: &str, lookback_days: usize) -> Result<BarSeries, ProviderError> {
        let now = Utc::now().timestamp();
        let from = now - calendar_span_days(lookback_days) * 86_400;
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("period1", from.to_string()),
                ("period2", now.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        // Yahoo reports unknown symbols as 404 with a JSON error body.
        let envelope: ChartEnvelope = match serde_json::from_str(&body) {
            Ok(env) => env,
            Err(_) if !status.is_success() => {
                return Err(ProviderError::Upstream {
                    provider: PROVIDER.to_string(),
                    status: status.as_u16(),
                    message: body.chars().take(200).collect(),
                });
            }
            Err(e) => return Err(ProviderError::Malformed(e.to_string())),
        };

        let bars = parse_chart(envelope, ticker)?;
        debug!(ticker, count = bars.len(), "yahoo bars parsed");
        normalize_bars(bars, lookback_days)
    }
}

/// Yahoo tickers to try for a requested symbol, in order.
///
/// Bare Korean stock codes (up to six digits) are zero-padded and tried on
/// KOSPI (`.KS`) then KOSDAQ (`.KQ`); anything else is used as given.
fn candidate_tickers(symbol: &str) -> Vec<String> {
    if !symbol.is_empty() && symbol.len() <= 6 && symbol.bytes().all(|b| b.is_ascii_digit()) {
        let code = format!("{symbol:0>6}");
        vec![format!("{code}.KS"), format!("{code}.KQ")]
    } else {
        vec![symbol.to_string()]
    }
}

/// Convert a decoded chart response into bars.
fn parse_chart(envelope: ChartEnvelope, symbol: &str) -> Result<Vec<Bar>, ProviderError> {
    let no_data = || ProviderError::NoData {
        provider: PROVIDER.to_string(),
        symbol: symbol.to_string(),
    };

    if let Some(err) = envelope.chart.error {
        warn!(symbol, code = %err.code, description = %err.description, "yahoo chart error");
        return Err(no_data());
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(no_data)?;
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let offset = result.meta.gmtoffset;

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let field = |col: &[Option<f64>]| col.get(i).copied().flatten();
        let (Some(open), Some(high), Some(low), Some(close)) = (
            field(&quote.open[..]),
            field(&quote.high[..]),
            field(&quote.low[..]),
            field(&quote.close[..]),
        ) else {
            continue;
        };
        let volume = field(&quote.volume[..]).unwrap_or(0.0);

        let Some(date) = DateTime::from_timestamp(ts + offset, 0).map(|dt| dt.date_naive()) else {
            warn!(symbol, ts, "skipping yahoo row with out-of-range timestamp");
            continue;
        };

        match Bar::new(date, open, high, low, close, volume) {
            Ok(bar) => bars.push(bar),
            Err(e) => warn!(symbol, %date, error = %e, "skipping malformed yahoo row"),
        }
    }

    if bars.is_empty() {
        return Err(no_data());
    }
    Ok(bars)
}
