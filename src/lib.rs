// =============================================================================
// LKBuy Signal — trend-confirmation scoring for BUY/SELL hypotheses
// =============================================================================
//
// Given daily OHLCV bars and a proposed action, grade how strongly ADX, CCI
// and OBV agree with it.  The library is pure and synchronous; the `api` and
// `providers` modules wrap it in an HTTP service backed by Yahoo / Finnhub.
// =============================================================================

pub mod analysis_report;
pub mod api;
pub mod app_state;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod providers;
pub mod runtime_config;
pub mod signals;
pub mod types;

#[cfg(test)]
mod test_util;

pub use engine::{evaluate, Evaluation};
pub use error::{EngineError, EngineResult};
pub use indicators::IndicatorSet;
pub use market_data::{Bar, BarSeries};
pub use runtime_config::{IndicatorParams, RuntimeConfig, ScoringRules};
pub use signals::{Signal, StrengthLevel};
pub use types::Action;
