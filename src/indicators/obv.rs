// =============================================================================
// On-Balance Volume (OBV) and its short-term trend
// =============================================================================
//
// OBV is a fold over the supplied window, seeded at 0 on the first bar:
//   close > prev close  => OBV += volume
//   close < prev close  => OBV -= volume
//   otherwise           => unchanged
//
// The running total is recomputed from scratch on every call; nothing is
// carried between invocations.
//
// Trend over a window `w`:
//   (OBV[t] - OBV[t-w]) / |OBV[t-w]|   when OBV[t-w] != 0
//    OBV[t] - OBV[t-w]                 otherwise
// =============================================================================

use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::market_data::BarSeries;

/// Trend of the OBV line over a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObvTrend {
    pub value: f64,
    /// `false` when the series is shorter than `window + 1` bars; `value` is
    /// then reported as 0.
    pub available: bool,
}

/// Full OBV line, one value per bar.
pub fn obv_series(series: &BarSeries) -> Vec<f64> {
    let bars = series.bars();
    let mut values = Vec::with_capacity(bars.len());
    values.push(0.0);

    let mut obv = 0.0;
    for pair in bars.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        if cur.close() > prev.close() {
            obv += cur.volume();
        } else if cur.close() < prev.close() {
            obv -= cur.volume();
        }
        values.push(obv);
    }
    values
}

/// Trend of an OBV line over the trailing `window` bars.
pub fn obv_trend(obv: &[f64], window: usize) -> EngineResult<ObvTrend> {
    if window == 0 {
        return Err(EngineError::InvalidRequest(
            "OBV trend window must be non-zero".to_string(),
        ));
    }
    if obv.len() < window + 1 {
        return Ok(ObvTrend {
            value: 0.0,
            available: false,
        });
    }

    let current = obv[obv.len() - 1];
    let earlier = obv[obv.len() - 1 - window];
    let change = current - earlier;

    let value = if earlier != 0.0 {
        change / earlier.abs()
    } else {
        change
    };

    Ok(ObvTrend {
        value,
        available: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{flat, series, trending};

    #[test]
    fn obv_constant_closes_stay_zero() {
        let line = obv_series(&flat(40, 100.0, 1_000.0));
        assert!(line.iter().all(|&v| v == 0.0));
        let trend = obv_trend(&line, 7).unwrap();
        assert_eq!(trend, ObvTrend { value: 0.0, available: true });
    }

    #[test]
    fn obv_rising_closes_strictly_increase() {
        let line = obv_series(&trending(30, 100.0, 1.0));
        assert!(line.windows(2).all(|w| w[1] > w[0]));
        assert!(obv_trend(&line, 7).unwrap().value > 0.0);
    }

    #[test]
    fn obv_falling_closes_strictly_decrease() {
        let line = obv_series(&trending(30, 200.0, -1.0));
        assert!(line.windows(2).all(|w| w[1] < w[0]));
        assert!(obv_trend(&line, 7).unwrap().value < 0.0);
    }

    #[test]
    fn obv_signs_volume_by_close_direction() {
        let s = series(&[
            (10.0, 10.0, 10.0, 10.0, 100.0),
            (11.0, 11.0, 11.0, 11.0, 50.0),
            (11.0, 11.0, 11.0, 11.0, 70.0),
            (9.0, 9.0, 9.0, 9.0, 30.0),
        ]);
        assert_eq!(obv_series(&s), vec![0.0, 50.0, 50.0, 20.0]);
    }

    #[test]
    fn obv_trend_relative_change() {
        let line = [0.0, 100.0, 150.0, 200.0];
        let trend = obv_trend(&line, 2).unwrap();
        assert!((trend.value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn obv_trend_raw_difference_from_zero_base() {
        let line = [0.0, 10.0, 40.0];
        assert_eq!(obv_trend(&line, 2).unwrap().value, 40.0);
    }

    #[test]
    fn obv_trend_unavailable_on_short_line() {
        let line = [0.0, 10.0, 20.0];
        assert_eq!(
            obv_trend(&line, 7).unwrap(),
            ObvTrend { value: 0.0, available: false }
        );
    }
}
