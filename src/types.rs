// =============================================================================
// Shared types used across the signal engine
// =============================================================================

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The trade hypothesis a caller asks the engine to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
}

impl Action {
    /// +1.0 for BUY, -1.0 for SELL.  Multiplying a bullish reading by this
    /// yields a positive number when the reading agrees with the action.
    pub fn direction(self) -> f64 {
        match self {
            Self::Buy => 1.0,
            Self::Sell => -1.0,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for Action {
    type Err = EngineError;

    /// Accepts `BUY`/`SELL` in any case plus the Korean client labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "매수" => Ok(Self::Buy),
            "매도" => Ok(Self::Sell),
            other if other.eq_ignore_ascii_case("buy") => Ok(Self::Buy),
            other if other.eq_ignore_ascii_case("sell") => Ok(Self::Sell),
            other => Err(EngineError::InvalidRequest(format!(
                "unknown action '{other}', expected BUY or SELL"
            ))),
        }
    }
}
