// =============================================================================
// Evaluation pipeline — Bar Series → Indicator Engine → Decision Engine
// =============================================================================
//
// `evaluate` is the sole entry point of the core.  It holds no state between
// calls: OBV and every smoothed average are recomputed from the supplied
// window each time, so concurrent calls need no coordination.
// =============================================================================

use serde::Serialize;
use tracing::debug;

use crate::error::EngineResult;
use crate::indicators::{compute_indicators, IndicatorSet};
use crate::market_data::BarSeries;
use crate::runtime_config::{IndicatorParams, ScoringRules};
use crate::signals::{score_signal, Signal};
use crate::types::Action;

/// Output of one evaluation: the graded signal plus the raw indicators it
/// was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub signal: Signal,
    pub indicators: IndicatorSet,
}

/// Score `requested` against `series`.
///
/// Either every indicator computes cleanly and a signal is returned, or the
/// whole call fails; there is no partial result.
pub fn evaluate(
    series: &BarSeries,
    requested: Action,
    params: &IndicatorParams,
    rules: &ScoringRules,
) -> EngineResult<Evaluation> {
    let indicators = compute_indicators(series, params)?;
    let signal = score_signal(&indicators, requested, rules);

    debug!(
        action = %signal.action,
        confidence = signal.confidence,
        endorsed = signal.endorsed,
        "signal scored"
    );

    Ok(Evaluation { signal, indicators })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::market_data::Bar;
    use crate::test_util::{choppy, flat, series, trending};
    use chrono::NaiveDate;

    fn run(series: &BarSeries, action: Action) -> EngineResult<Evaluation> {
        evaluate(series, action, &IndicatorParams::default(), &ScoringRules::default())
    }

    #[test]
    fn flat_forty_bars_scenario() {
        let s = flat(40, 100.0, 1_000.0);
        for action in [Action::Buy, Action::Sell] {
            let eval = run(&s, action).unwrap();
            assert_eq!(eval.indicators.obv, 0.0);
            assert_eq!(eval.indicators.obv_trend, 0.0);
            assert_eq!(eval.indicators.cci, 0.0);
            assert!(eval.indicators.adx < 1.0);
            assert_eq!(eval.signal.action, action);
            assert_eq!(eval.signal.confidence, 25);
        }
    }

    #[test]
    fn never_flips_requested_action() {
        for s in [trending(50, 100.0, 1.0), trending(50, 200.0, -1.0), choppy(80, 60.0)] {
            assert_eq!(run(&s, Action::Buy).unwrap().signal.action, Action::Buy);
            assert_eq!(run(&s, Action::Sell).unwrap().signal.action, Action::Sell);
        }
    }

    #[test]
    fn rising_window_favours_sell_on_overbought_cci_but_buy_on_obv() {
        // Steady rise: ADX strong (+15), CCI overbought, OBV inflow.
        let s = trending(50, 100.0, 1.0);
        let buy = run(&s, Action::Buy).unwrap().signal;
        let sell = run(&s, Action::Sell).unwrap().signal;
        // BUY: 50 + 15 - 20 + 15; SELL: 50 + 15 + 20 - 15.
        assert_eq!(buy.confidence, 60);
        assert_eq!(sell.confidence, 70);
    }

    #[test]
    fn short_window_is_insufficient() {
        let s = trending(10, 100.0, 1.0);
        assert!(matches!(
            run(&s, Action::Buy),
            Err(EngineError::InsufficientData { required: 30, available: 10, .. })
        ));
    }

    #[test]
    fn invalid_bars_never_reach_the_engine() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(matches!(
            Bar::new(d, 10.0, 9.0, 11.0, 10.0, 1.0),
            Err(EngineError::InvalidBarSeries(_))
        ));
    }

    #[test]
    fn confidence_and_adx_stay_in_band() {
        let rows: Vec<_> = (0..90)
            .map(|i| {
                let c = 50.0 + ((i * 7919) % 23) as f64;
                (c, c + 3.0, c - 2.0, c, ((i * 31) % 17) as f64 * 1_000.0)
            })
            .collect();
        let s = series(&rows);
        for action in [Action::Buy, Action::Sell] {
            let eval = run(&s, action).unwrap();
            assert!((0.0..=100.0).contains(&eval.indicators.adx));
            assert!(eval.signal.confidence <= 100);
        }
    }
}
