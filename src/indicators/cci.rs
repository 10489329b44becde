// =============================================================================
// Commodity Channel Index (CCI)
// =============================================================================
//
// Measures the current typical price relative to its recent average:
//   TP  = (High + Low + Close) / 3
//   CCI = (TP_last - SMA(TP)) / (0.015 * MeanDeviation(TP))
//
// A window with zero mean deviation (flat price) yields CCI = 0.
//
// Thresholds:  CCI < -100 => OVERSOLD,  CCI > +100 => OVERBOUGHT.
// =============================================================================

use crate::error::{EngineError, EngineResult};
use crate::market_data::{Bar, BarSeries};

/// Lambert's constant; scales CCI so roughly 70-80% of values fall in ±100.
pub const CCI_CONSTANT: f64 = 0.015;

/// Compute the most recent CCI value over the trailing `period` bars.
pub fn calculate_cci(series: &BarSeries, period: usize) -> EngineResult<f64> {
    if period == 0 {
        return Err(EngineError::InvalidRequest(
            "CCI period must be non-zero".to_string(),
        ));
    }
    if series.len() < period {
        return Err(EngineError::InsufficientData {
            indicator: "CCI",
            required: period,
            available: series.len(),
        });
    }

    let bars = series.bars();
    let typical: Vec<f64> = bars[bars.len() - period..]
        .iter()
        .map(Bar::typical_price)
        .collect();

    let sma = typical.iter().sum::<f64>() / period as f64;
    let mean_dev = typical.iter().map(|tp| (tp - sma).abs()).sum::<f64>() / period as f64;

    if mean_dev == 0.0 {
        return Ok(0.0);
    }

    let current = series.last().typical_price();
    Ok((current - sma) / (CCI_CONSTANT * mean_dev))
}
