// =============================================================================
// Finnhub stock candle client
// =============================================================================
//
// GET {base}/api/v1/stock/candle?symbol=..&resolution=D&from=..&to=..&token=..
//
// SECURITY: the API token travels as a query parameter and is never logged;
// `#[instrument]` skips `self` so the client (and token) stay out of spans.
// =============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{calendar_span_days, normalize_bars, BarProvider, ProviderBars, ProviderError};
use crate::market_data::Bar;

const PROVIDER: &str = "finnhub";

/// `s` is `"ok"` or `"no_data"`; arrays are absent on `no_data`.
#[derive(Debug, Deserialize)]
struct CandleResponse {
    s: String,
    #[serde(default)]
    t: Vec<i64>,
    #[serde(default)]
    o: Vec<f64>,
    #[serde(default)]
    h: Vec<f64>,
    #[serde(default)]
    l: Vec<f64>,
    #[serde(default)]
    c: Vec<f64>,
    #[serde(default)]
    v: Vec<f64>,
}

/// Finnhub daily-candle client.
#[derive(Clone)]
pub struct FinnhubClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl FinnhubClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl BarProvider for FinnhubClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    #[instrument(skip(self), name = "finnhub::fetch_bars")]
    async fn fetch_bars(&self, symbol: &str, lookback_days: usize) -> Result<ProviderBars, ProviderError> {
        let now = Utc::now().timestamp();
        let from = now - calendar_span_days(lookback_days) * 86_400;
        let url = format!("{}/api/v1/stock/candle", self.base_url);
        let (from, to) = (from.to_string(), now.to_string());

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("resolution", "D"),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message: String = resp.text().await.unwrap_or_default().chars().take(200).collect();
            return Err(ProviderError::Upstream {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body: CandleResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let bars = parse_candles(body, symbol)?;
        debug!(symbol, count = bars.len(), "finnhub candles parsed");
        Ok(ProviderBars {
            ticker: symbol.to_string(),
            series: normalize_bars(bars, lookback_days)?,
        })
    }
}

fn parse_candles(body: CandleResponse, symbol: &str) -> Result<Vec<Bar>, ProviderError> {
    let no_data = || ProviderError::NoData {
        provider: PROVIDER.to_string(),
        symbol: symbol.to_string(),
    };

    if body.s != "ok" || body.t.is_empty() {
        return Err(no_data());
    }

    let n = body.t.len();
    if [body.o.len(), body.h.len(), body.l.len(), body.c.len()].iter().any(|&len| len != n) {
        return Err(ProviderError::Malformed(format!(
            "finnhub arrays for {symbol} have mismatched lengths"
        )));
    }

    let mut bars = Vec::with_capacity(n);
    for i in 0..n {
        let Some(date) = DateTime::from_timestamp(body.t[i], 0).map(|dt| dt.date_naive()) else {
            warn!(symbol, ts = body.t[i], "skipping finnhub candle with out-of-range timestamp");
            continue;
        };
        let volume = body.v.get(i).copied().unwrap_or(0.0);

        match Bar::new(date, body.o[i], body.h[i], body.l[i], body.c[i], volume) {
            Ok(bar) => bars.push(bar),
            Err(e) => warn!(symbol, %date, error = %e, "skipping malformed finnhub candle"),
        }
    }

    if bars.is_empty() {
        return Err(no_data());
    }
    Ok(bars)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn parse(json: &str) -> Result<Vec<Bar>, ProviderError> {
        parse_candles(serde_json::from_str(json).unwrap(), "AAPL")
    }

    #[test]
    fn parses_ok_response() {
        let json = r#"{"s":"ok","t":[1704153600,1704240000],
            "o":[185.0,184.2],"h":[188.4,185.9],"l":[183.9,183.4],"c":[185.6,184.3],
            "v":[82488700,58414500]}"#;
        let bars = parse(json).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[1].date(), NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(bars[1].volume(), 58_414_500.0);
    }

    #[test]
    fn no_data_status() {
        assert!(matches!(parse(r#"{"s":"no_data"}"#), Err(ProviderError::NoData { .. })));
    }

    #[test]
    fn mismatched_arrays_are_malformed() {
        let json = r#"{"s":"ok","t":[1704153600,1704240000],"o":[1.0],"h":[1.0,1.0],"l":[1.0,1.0],"c":[1.0,1.0],"v":[]}"#;
        assert!(matches!(parse(json), Err(ProviderError::Malformed(_))));
    }

    #[test]
    fn all_malformed_candles_is_no_data() {
        let json = r#"{"s":"ok","t":[1704153600],"o":[10.0],"h":[9.0],"l":[11.0],"c":[10.0],"v":[100]}"#;
        assert!(matches!(parse(json), Err(ProviderError::NoData { .. })));
    }

    #[test]
    fn missing_volume_defaults_to_zero() {
        let json = r#"{"s":"ok","t":[1704153600],"o":[10.0],"h":[11.0],"l":[9.0],"c":[10.5]}"#;
        let bars = parse(json).unwrap();
        assert_eq!(bars[0].volume(), 0.0);
    }
}
