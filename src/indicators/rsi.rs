// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// Reported alongside the scored indicators for transparency; it does not feed
// the confidence score.
//
//   avg_gain / avg_loss seeded with the SMA of the first `period` deltas, then
//   avg = (prev_avg * (period - 1) + current) / period
//   RSI = 100 - 100 / (1 + avg_gain / avg_loss)
// =============================================================================

use crate::error::{EngineError, EngineResult};

/// Most recent RSI of `closes`.
///
/// Needs `period + 1` closes.  No movement at all gives 50; gains without
/// losses give 100.
pub fn calculate_rsi(closes: &[f64], period: usize) -> EngineResult<f64> {
    if period == 0 {
        return Err(EngineError::InvalidRequest(
            "RSI period must be non-zero".to_string(),
        ));
    }
    if closes.len() < period + 1 {
        return Err(EngineError::InsufficientData {
            indicator: "RSI",
            required: period + 1,
            available: closes.len(),
        });
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|w| {
            let delta = w[1] - w[0];
            (delta.max(0.0), (-delta).max(0.0))
        })
        .unzip();

    let period_f = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / period_f;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period_f;

    for (gain, loss) in gains[period..].iter().zip(&losses[period..]) {
        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;
    }

    Ok(rsi_from_averages(avg_gain, avg_loss))
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_period_zero() {
        assert!(calculate_rsi(&[1.0, 2.0, 3.0], 0).is_err());
    }

    #[test]
    fn rsi_insufficient_data() {
        // 14 closes => 13 deltas < 14.
        let closes: Vec<f64> = (1..=14).map(f64::from).collect();
        assert!(matches!(
            calculate_rsi(&closes, 14),
            Err(EngineError::InsufficientData { required: 15, available: 14, .. })
        ));
    }

    #[test]
    fn rsi_all_gains() {
        let closes: Vec<f64> = (1..=30).map(f64::from).collect();
        assert!((calculate_rsi(&closes, 14).unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_all_losses() {
        let closes: Vec<f64> = (1..=30).rev().map(f64::from).collect();
        assert!(calculate_rsi(&closes, 14).unwrap().abs() < 1e-10);
    }

    #[test]
    fn rsi_flat_market() {
        assert_eq!(calculate_rsi(&[100.0; 30], 14).unwrap(), 50.0);
    }

    #[test]
    fn rsi_range_check() {
        let closes = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let v = calculate_rsi(&closes, 14).unwrap();
        assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
    }
}
