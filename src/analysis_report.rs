// =============================================================================
// Analysis Report — auditable record of one scored hypothesis
// =============================================================================
//
// Flattens an `Evaluation` plus its data provenance into the shape returned
// to API callers.  Built once per request and never stored.
// =============================================================================

use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::Evaluation;
use crate::indicators::IndicatorSet;
use crate::providers::FetchedBars;
use crate::signals::{Contribution, StrengthLevel};
use crate::types::Action;

/// Response body of `POST /api/v1/analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Unique identifier for this analysis (UUID v4).
    pub id: String,

    pub symbol: String,

    /// The decision string exactly as the caller sent it.
    pub decision_requested: String,

    /// Always the parsed requested action.
    pub action: Action,

    pub confidence: u8,
    pub endorsed: bool,
    pub level: StrengthLevel,
    pub strength_pct: u8,
    pub reasons: Vec<String>,
    pub indicators: IndicatorSet,
    pub contributions: Vec<Contribution>,

    /// Provider that supplied the bars.
    pub source: String,
    /// Ticker the provider actually queried, e.g. `005930.KS` for `005930`.
    pub ticker: String,
    pub rows: usize,
    pub last_date: NaiveDate,

    /// ISO 8601 timestamp of when this report was created.
    pub created_at: String,
}

impl AnalysisReport {
    pub fn new(
        symbol: impl Into<String>,
        decision_requested: impl Into<String>,
        fetched: &FetchedBars,
        evaluation: Evaluation,
    ) -> Self {
        let Evaluation { signal, indicators } = evaluation;
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            symbol: symbol.into(),
            decision_requested: decision_requested.into(),
            action: signal.action,
            confidence: signal.confidence,
            endorsed: signal.endorsed,
            level: signal.level,
            strength_pct: signal.strength_pct,
            reasons: signal.reasons(),
            indicators,
            contributions: signal.contributions,
            source: fetched.source.clone(),
            ticker: fetched.ticker.clone(),
            rows: fetched.series.len(),
            last_date: fetched.series.last().date(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
