// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators used by the
// decision engine.  Every public function returns `EngineResult<T>` so callers
// are forced to handle insufficient-data scenarios; numeric edge cases
// (flat markets) resolve to documented values instead of errors.

pub mod adx;
pub mod cci;
pub mod obv;
pub mod rsi;

use serde::Serialize;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::market_data::BarSeries;
use crate::runtime_config::IndicatorParams;

/// Snapshot of every indicator for the last bar of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub adx: f64,
    pub cci: f64,
    pub obv: f64,
    pub obv_trend: f64,
    pub obv_trend_available: bool,
    /// Informational only; not scored.
    pub rsi: f64,
}

impl IndicatorParams {
    /// Lookback each indicator needs, plus the configured floor.
    fn lookbacks(&self) -> [(&'static str, usize); 5] {
        [
            ("engine", self.min_bars),
            ("ADX", adx::required_bars(self.adx_period)),
            ("CCI", self.cci_period),
            ("RSI", self.rsi_period + 1),
            ("OBV trend", self.obv_trend_window + 1),
        ]
    }

    /// Smallest series length [`compute_indicators`] accepts.
    pub fn required_bars(&self) -> usize {
        self.lookbacks().iter().map(|&(_, n)| n).max().unwrap_or(0)
    }
}

/// Compute the full [`IndicatorSet`] for `series`.
///
/// Fails as a whole with `InsufficientData` when the series is shorter than
/// the longest lookback (or the configured `min_bars` floor), so no caller
/// ever sees a partially computed set.
pub fn compute_indicators(series: &BarSeries, params: &IndicatorParams) -> EngineResult<IndicatorSet> {
    if let Some(&(indicator, required)) = params
        .lookbacks()
        .iter()
        .filter(|&&(_, n)| series.len() < n)
        .max_by_key(|&&(_, n)| n)
    {
        return Err(EngineError::InsufficientData {
            indicator,
            required,
            available: series.len(),
        });
    }

    let adx = adx::calculate_adx(series, params.adx_period)?;
    let cci = cci::calculate_cci(series, params.cci_period)?;
    let obv_line = obv::obv_series(series);
    let trend = obv::obv_trend(&obv_line, params.obv_trend_window)?;
    let rsi = rsi::calculate_rsi(&series.closes(), params.rsi_period)?;

    let set = IndicatorSet {
        adx,
        cci,
        obv: obv_line.last().copied().unwrap_or(0.0),
        obv_trend: trend.value,
        obv_trend_available: trend.available,
        rsi,
    };

    debug!(
        bars = series.len(),
        adx = set.adx,
        cci = set.cci,
        obv = set.obv,
        obv_trend = set.obv_trend,
        rsi = set.rsi,
        "indicators computed"
    );

    Ok(set)
}
