// =============================================================================
// Confidence Scorer — additive point rule over ADX / CCI / OBV trend
// =============================================================================
//
// The scorer grades a caller-supplied hypothesis (BUY or SELL).  It never
// originates or flips the action: the returned `Signal.action` is always the
// requested one.
//
//   score = base
//         + ADX term   (strong trend adds, weak trend subtracts)
//         + CCI term   (oversold agrees with BUY, overbought with SELL)
//         + OBV term   (inflow agrees with BUY, outflow with SELL)
//   confidence = round(clamp(score, 0, 100))
// =============================================================================

use serde::Serialize;

use crate::indicators::IndicatorSet;
use crate::runtime_config::ScoringRules;
use crate::types::Action;

/// The contribution of a single rule to the final score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    /// Rule identifier: `"base"`, `"adx"`, `"cci"` or `"obv"`.
    pub rule: &'static str,
    pub points: f64,
    /// Human-readable reading behind the points.
    pub reason: String,
}

/// Coarse label for a confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrengthLevel {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
}

impl std::fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VeryStrong => write!(f, "very strong"),
            Self::Strong => write!(f, "strong"),
            Self::Moderate => write!(f, "moderate"),
            Self::Weak => write!(f, "weak"),
        }
    }
}

/// Result of scoring one hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub action: Action,
    /// 0..=100.
    pub confidence: u8,
    /// `confidence` reached the action's threshold.
    pub endorsed: bool,
    pub level: StrengthLevel,
    /// Position of `confidence` between the threshold (0%) and 100 (100%).
    pub strength_pct: u8,
    pub contributions: Vec<Contribution>,
}

impl Signal {
    pub fn reasons(&self) -> Vec<String> {
        self.contributions
            .iter()
            .filter(|c| c.rule != "base")
            .map(|c| c.reason.clone())
            .collect()
    }
}

/// Score `action` against `indicators`.
pub fn score_signal(indicators: &IndicatorSet, action: Action, rules: &ScoringRules) -> Signal {
    let contributions = vec![
        Contribution {
            rule: "base",
            points: rules.base_points,
            reason: "base score".to_string(),
        },
        adx_contribution(indicators.adx, rules),
        cci_contribution(indicators.cci, action, rules),
        obv_contribution(indicators, action, rules),
    ];

    let total: f64 = contributions.iter().map(|c| c.points).sum();
    let confidence = total.clamp(0.0, 100.0).round() as u8;

    let threshold = match action {
        Action::Buy => rules.buy_threshold,
        Action::Sell => rules.sell_threshold,
    };
    let score = f64::from(confidence);

    Signal {
        action,
        confidence,
        endorsed: score >= threshold,
        level: strength_level(score, threshold),
        strength_pct: percent_from_threshold(score, threshold).round() as u8,
        contributions,
    }
}

// =============================================================================
// Rule terms
// =============================================================================

fn adx_contribution(adx: f64, rules: &ScoringRules) -> Contribution {
    let (points, reason) = if adx >= rules.adx_strong_threshold {
        (rules.adx_strong_points, "ADX strong trend")
    } else if adx < rules.adx_weak_threshold {
        (-rules.adx_weak_penalty, "ADX weak trend")
    } else {
        (0.0, "ADX moderate trend")
    };
    Contribution {
        rule: "adx",
        points,
        reason: format!("{reason} ({adx:.1})"),
    }
}

fn cci_contribution(cci: f64, action: Action, rules: &ScoringRules) -> Contribution {
    // +1 bullish (oversold), -1 bearish (overbought), 0 neutral.
    let (bias, reason) = if cci < rules.cci_oversold {
        (1.0, "CCI oversold")
    } else if cci > rules.cci_overbought {
        (-1.0, "CCI overbought")
    } else {
        (0.0, "CCI neutral")
    };
    Contribution {
        rule: "cci",
        points: bias * action.direction() * rules.cci_points,
        reason: format!("{reason} ({cci:.1})"),
    }
}

fn obv_contribution(indicators: &IndicatorSet, action: Action, rules: &ScoringRules) -> Contribution {
    if !indicators.obv_trend_available {
        return Contribution {
            rule: "obv",
            points: 0.0,
            reason: "OBV trend unavailable".to_string(),
        };
    }

    let trend = indicators.obv_trend;
    let (bias, reason) = if trend > 0.0 {
        (1.0, "OBV inflow")
    } else if trend < 0.0 {
        (-1.0, "OBV outflow")
    } else {
        (0.0, "OBV flat")
    };
    Contribution {
        rule: "obv",
        points: bias * action.direction() * rules.obv_points,
        reason: reason.to_string(),
    }
}

// =============================================================================
// Presentation helpers
// =============================================================================

fn strength_level(score: f64, threshold: f64) -> StrengthLevel {
    if score < threshold {
        StrengthLevel::Weak
    } else if score >= 90.0 {
        StrengthLevel::VeryStrong
    } else if score >= 70.0 {
        StrengthLevel::Strong
    } else {
        StrengthLevel::Moderate
    }
}

/// Map `[threshold, 100]` linearly onto `[0, 100]`; 0 below the threshold.
fn percent_from_threshold(score: f64, threshold: f64) -> f64 {
    if score < threshold {
        return 0.0;
    }
    if threshold >= 100.0 {
        return 100.0;
    }
    ((score - threshold) / (100.0 - threshold) * 100.0).clamp(0.0, 100.0)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn indicators(adx: f64, cci: f64, obv_trend: f64) -> IndicatorSet {
        IndicatorSet {
            adx,
            cci,
            obv: 0.0,
            obv_trend,
            obv_trend_available: true,
            rsi: 50.0,
        }
    }

    fn points(signal: &Signal, rule: &str) -> f64 {
        signal
            .contributions
            .iter()
            .find(|c| c.rule == rule)
            .map(|c| c.points)
            .unwrap()
    }

    #[test]
    fn flat_market_scores_low_for_both_actions() {
        let rules = ScoringRules::default();
        let set = indicators(0.0, 0.0, 0.0);
        for action in [Action::Buy, Action::Sell] {
            let signal = score_signal(&set, action, &rules);
            assert_eq!(signal.action, action);
            assert_eq!(signal.confidence, 25);
            assert!(!signal.endorsed);
            assert_eq!(signal.level, StrengthLevel::Weak);
            assert_eq!(signal.strength_pct, 0);
        }
    }

    #[test]
    fn full_agreement_reaches_one_hundred() {
        let signal = score_signal(&indicators(40.0, -180.0, 0.3), Action::Buy, &ScoringRules::default());
        assert_eq!(signal.confidence, 100);
        assert!(signal.endorsed);
        assert_eq!(signal.level, StrengthLevel::VeryStrong);
        assert_eq!(signal.strength_pct, 100);
    }

    #[test]
    fn full_disagreement_clamps_to_zero() {
        let signal = score_signal(&indicators(5.0, 250.0, -0.4), Action::Buy, &ScoringRules::default());
        assert_eq!(signal.confidence, 0);
        assert_eq!(signal.action, Action::Buy);
    }

    #[test]
    fn cci_and_obv_terms_are_complementary() {
        let rules = ScoringRules::default();
        let set = indicators(22.0, 150.0, -0.2);
        let buy = score_signal(&set, Action::Buy, &rules);
        let sell = score_signal(&set, Action::Sell, &rules);

        assert_eq!(buy.action, Action::Buy);
        assert_eq!(sell.action, Action::Sell);
        assert_eq!(points(&buy, "cci"), -points(&sell, "cci"));
        assert_eq!(points(&buy, "obv"), -points(&sell, "obv"));
        assert_eq!(points(&buy, "adx"), points(&sell, "adx"));
        assert!(sell.confidence > buy.confidence);
        // Moderate ADX contributes nothing: 50 - 20 - 15 and 50 + 20 + 15.
        assert_eq!(buy.confidence, 15);
        assert_eq!(sell.confidence, 85);
    }

    #[test]
    fn strong_trend_adds_weak_trend_subtracts() {
        let rules = ScoringRules::default();
        let strong = score_signal(&indicators(30.0, 0.0, 0.0), Action::Sell, &rules);
        let weak = score_signal(&indicators(10.0, 0.0, 0.0), Action::Sell, &rules);
        assert!(points(&strong, "adx") > 0.0);
        assert!(points(&weak, "adx") < 0.0);
        assert!(strong.confidence > weak.confidence);
    }

    #[test]
    fn unavailable_obv_trend_is_neutral() {
        let mut set = indicators(22.0, 0.0, 0.0);
        set.obv_trend_available = false;
        let signal = score_signal(&set, Action::Buy, &ScoringRules::default());
        assert_eq!(points(&signal, "obv"), 0.0);
        assert_eq!(signal.confidence, 50);
        assert!(signal.endorsed);
        assert_eq!(signal.level, StrengthLevel::Moderate);
    }

    #[test]
    fn sell_threshold_is_independent() {
        let rules = ScoringRules {
            sell_threshold: 90.0,
            ..ScoringRules::default()
        };
        let signal = score_signal(&indicators(22.0, 150.0, -0.2), Action::Sell, &rules);
        assert_eq!(signal.confidence, 85);
        assert!(!signal.endorsed);
        assert_eq!(signal.level, StrengthLevel::Weak);
    }

    #[test]
    fn reasons_skip_base_entry() {
        let signal = score_signal(&indicators(30.0, -150.0, 0.1), Action::Buy, &ScoringRules::default());
        let reasons = signal.reasons();
        assert_eq!(reasons.len(), 3);
        assert!(reasons[0].starts_with("ADX strong trend"));
        assert!(reasons[1].starts_with("CCI oversold"));
        assert_eq!(reasons[2], "OBV inflow");
    }

    #[test]
    fn percent_from_threshold_maps_linearly() {
        assert_eq!(percent_from_threshold(75.0, 50.0), 50.0);
        assert_eq!(percent_from_threshold(49.0, 50.0), 0.0);
        assert_eq!(percent_from_threshold(100.0, 100.0), 100.0);
    }
}
