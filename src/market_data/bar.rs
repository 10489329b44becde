use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};

// ---------------------------------------------------------------------------
// Bar
// ---------------------------------------------------------------------------

/// One trading day of OHLCV data.  Fields are private so that every `Bar` in
/// the program has passed [`Bar::new`] validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl Bar {
    /// Build a validated bar.
    ///
    /// Rejects non-finite or non-positive prices, negative volume, and any
    /// bar whose high/low do not bracket its open and close.
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> EngineResult<Self> {
        for (name, price) in [("open", open), ("high", high), ("low", low), ("close", close)] {
            if !price.is_finite() || price <= 0.0 {
                return Err(EngineError::InvalidBarSeries(format!(
                    "{date}: {name} must be a positive number, got {price}"
                )));
            }
        }
        if !volume.is_finite() || volume < 0.0 {
            return Err(EngineError::InvalidBarSeries(format!(
                "{date}: volume must be non-negative, got {volume}"
            )));
        }
        if high < low {
            return Err(EngineError::InvalidBarSeries(format!(
                "{date}: high {high} is below low {low}"
            )));
        }
        if high < open.max(close) || low > open.min(close) {
            return Err(EngineError::InvalidBarSeries(format!(
                "{date}: open/close outside the high-low range"
            )));
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn open(&self) -> f64 {
        self.open
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn close(&self) -> f64 {
        self.close
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// `(high + low + close) / 3`.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

// ---------------------------------------------------------------------------
// BarSeries
// ---------------------------------------------------------------------------

/// Chronologically ordered, oldest-first bars with strictly increasing dates.
///
/// Length requirements are not checked here: each indicator reports
/// `InsufficientData` against its own lookback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(bars: Vec<Bar>) -> EngineResult<Self> {
        if bars.is_empty() {
            return Err(EngineError::InvalidBarSeries("series is empty".to_string()));
        }
        if let Some(w) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(EngineError::InvalidBarSeries(format!(
                "dates must be strictly increasing: {} follows {}",
                w[1].date, w[0].date
            )));
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar.  A series is never empty.
    pub fn last(&self) -> &Bar {
        &self.bars[self.bars.len() - 1]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(Bar::close).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn bar_rejects_high_below_low() {
        let err = Bar::new(day(1), 10.0, 9.0, 11.0, 10.0, 100.0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidBarSeries(_)));
    }

    #[test]
    fn bar_rejects_close_above_high() {
        assert!(Bar::new(day(1), 10.0, 11.0, 9.0, 12.0, 100.0).is_err());
    }

    #[test]
    fn bar_rejects_non_positive_and_nan_prices() {
        assert!(Bar::new(day(1), 0.0, 1.0, 0.0, 0.5, 1.0).is_err());
        assert!(Bar::new(day(1), 1.0, f64::NAN, 0.5, 1.0, 1.0).is_err());
    }

    #[test]
    fn bar_rejects_negative_volume() {
        assert!(Bar::new(day(1), 10.0, 11.0, 9.0, 10.0, -1.0).is_err());
    }

    #[test]
    fn typical_price_is_hlc_mean() {
        let bar = Bar::new(day(1), 10.0, 12.0, 9.0, 11.0, 0.0).unwrap();
        assert!((bar.typical_price() - 32.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        let a = Bar::new(day(1), 10.0, 11.0, 9.0, 10.0, 1.0).unwrap();
        let b = Bar::new(day(1), 10.0, 11.0, 9.0, 10.0, 1.0).unwrap();
        assert!(matches!(
            BarSeries::new(vec![a, b]),
            Err(EngineError::InvalidBarSeries(_))
        ));
    }

    #[test]
    fn series_rejects_backwards_dates() {
        let a = Bar::new(day(2), 10.0, 11.0, 9.0, 10.0, 1.0).unwrap();
        let b = Bar::new(day(1), 10.0, 11.0, 9.0, 10.0, 1.0).unwrap();
        assert!(BarSeries::new(vec![a, b]).is_err());
    }

    #[test]
    fn series_rejects_empty() {
        assert!(BarSeries::new(Vec::new()).is_err());
    }
}
