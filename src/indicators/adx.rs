// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength** regardless of direction.
//
// Calculation pipeline:
//   1. Compute +DM (positive directional movement) and -DM per bar.
//   2. Compute True Range (TR) per bar.
//   3. Apply Wilder's smoothing (period) to +DM, -DM, and TR.
//   4. Derive +DI = smoothed(+DM) / smoothed(TR) * 100
//            -DI = smoothed(-DM) / smoothed(TR) * 100
//   5. DX  = |+DI - -DI| / (+DI + -DI) * 100
//   6. ADX = Wilder's smoothed average of DX over `period` bars.
//
// A flat market (smoothed TR = 0) yields DI = 0 and DX = 0, not an error.
//
// Interpretation:
//   ADX > 25  => trending market
//   ADX < 20  => ranging / choppy market
// =============================================================================

use crate::error::{EngineError, EngineResult};
use crate::market_data::BarSeries;

/// Number of bars needed to produce one ADX value: `period` transitions to
/// seed the +DM/-DM/TR sums, another `period` DX values to seed the ADX
/// average, plus the first bar which has no predecessor.
pub fn required_bars(period: usize) -> usize {
    2 * period + 1
}

/// Compute the most recent ADX value.
///
/// # Errors
/// - `InvalidRequest` when `period` is zero.
/// - `InsufficientData` when the series is shorter than [`required_bars`].
pub fn calculate_adx(series: &BarSeries, period: usize) -> EngineResult<f64> {
    if period == 0 {
        return Err(EngineError::InvalidRequest(
            "ADX period must be non-zero".to_string(),
        ));
    }

    let required = required_bars(period);
    if series.len() < required {
        return Err(EngineError::InsufficientData {
            indicator: "ADX",
            required,
            available: series.len(),
        });
    }

    let period_f = period as f64;
    let bars = series.bars();

    // ------------------------------------------------------------------
    // Step 1 & 2: Raw +DM, -DM, and True Range for each consecutive pair
    // ------------------------------------------------------------------
    let bar_count = bars.len() - 1;
    let mut plus_dm = Vec::with_capacity(bar_count);
    let mut minus_dm = Vec::with_capacity(bar_count);
    let mut tr_vals = Vec::with_capacity(bar_count);

    for pair in bars.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);

        let up_move = cur.high() - prev.high();
        let down_move = prev.low() - cur.low();

        plus_dm.push(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        });
        minus_dm.push(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        });
        tr_vals.push(true_range(cur.high(), cur.low(), prev.close()));
    }

    // ------------------------------------------------------------------
    // Step 3: Wilder's smoothing of +DM, -DM, TR (first `period` values)
    // ------------------------------------------------------------------
    let mut smooth_plus_dm: f64 = plus_dm[..period].iter().sum();
    let mut smooth_minus_dm: f64 = minus_dm[..period].iter().sum();
    let mut smooth_tr: f64 = tr_vals[..period].iter().sum();

    let mut dx_values: Vec<f64> = Vec::with_capacity(bar_count - period + 1);
    dx_values.push(compute_dx(smooth_plus_dm, smooth_minus_dm, smooth_tr));

    for i in period..bar_count {
        smooth_plus_dm = smooth_plus_dm - smooth_plus_dm / period_f + plus_dm[i];
        smooth_minus_dm = smooth_minus_dm - smooth_minus_dm / period_f + minus_dm[i];
        smooth_tr = smooth_tr - smooth_tr / period_f + tr_vals[i];

        dx_values.push(compute_dx(smooth_plus_dm, smooth_minus_dm, smooth_tr));
    }

    // ------------------------------------------------------------------
    // Step 6: ADX = Wilder's smoothed average of DX
    // ------------------------------------------------------------------
    let mut adx = dx_values[..period].iter().sum::<f64>() / period_f;
    for &dx in &dx_values[period..] {
        adx = (adx * (period_f - 1.0) + dx) / period_f;
    }

    // Smoothing can drift a hair outside the band.
    Ok(adx.clamp(0.0, 100.0))
}

/// `max(H - L, |H - prevClose|, |L - prevClose|)`.
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    (high - low)
        .max((high - prev_close).abs())
        .max((low - prev_close).abs())
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Compute DX from smoothed +DM, -DM, and TR values.
fn compute_dx(smooth_plus_dm: f64, smooth_minus_dm: f64, smooth_tr: f64) -> f64 {
    let (plus_di, minus_di) = if smooth_tr == 0.0 {
        (0.0, 0.0)
    } else {
        (
            (smooth_plus_dm / smooth_tr) * 100.0,
            (smooth_minus_dm / smooth_tr) * 100.0,
        )
    };

    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        // Both +DI and -DI are zero: no directional movement.
        return 0.0;
    }

    ((plus_di - minus_di).abs() / di_sum) * 100.0
}
