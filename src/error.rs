// =============================================================================
// Engine Errors
// =============================================================================
//
// Every failure of the indicator/decision pipeline is terminal for the single
// invocation.  Degraded numeric conventions (CCI = 0 on zero deviation, DI = 0
// on zero ATR) are not errors and never surface here.
// =============================================================================

use thiserror::Error;

/// Failure of a single `evaluate` call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Malformed bars or a non-monotonic date sequence.
    #[error("invalid bar series: {0}")]
    InvalidBarSeries(String),

    /// The window is shorter than the lookback an indicator needs.
    #[error("insufficient data for {indicator}: need {required} bars, have {available}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    /// Unrecognised requested action or unusable parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
