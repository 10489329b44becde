// =============================================================================
// Runtime Configuration — indicator windows, scoring rules, server settings
// =============================================================================
//
// Every tunable number of the engine lives here as a named value with a
// documented default.  All fields carry `#[serde(default)]` so that a partial
// JSON file only overrides what it names.
//
// =============================================================================

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_adx_period() -> usize {
    14
}

fn default_cci_period() -> usize {
    20
}

fn default_obv_trend_window() -> usize {
    7
}

fn default_rsi_period() -> usize {
    14
}

fn default_min_bars() -> usize {
    30
}

fn default_base_points() -> f64 {
    50.0
}

fn default_adx_strong_threshold() -> f64 {
    25.0
}

fn default_adx_weak_threshold() -> f64 {
    20.0
}

fn default_adx_strong_points() -> f64 {
    15.0
}

fn default_adx_weak_penalty() -> f64 {
    25.0
}

fn default_cci_oversold() -> f64 {
    -100.0
}

fn default_cci_overbought() -> f64 {
    100.0
}

fn default_cci_points() -> f64 {
    20.0
}

fn default_obv_points() -> f64 {
    15.0
}

fn default_endorse_threshold() -> f64 {
    50.0
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_lookback_days() -> usize {
    120
}

fn default_yahoo_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_finnhub_base_url() -> String {
    "https://finnhub.io".to_string()
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Window lengths for the indicator engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    /// Wilder period for +DM/-DM/TR smoothing and the ADX average.
    #[serde(default = "default_adx_period")]
    pub adx_period: usize,

    /// Typical-price window for CCI.
    #[serde(default = "default_cci_period")]
    pub cci_period: usize,

    /// Bars between the two OBV readings compared for the trend.
    #[serde(default = "default_obv_trend_window")]
    pub obv_trend_window: usize,

    /// Wilder period for the informational RSI.
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Floor on the series length regardless of indicator lookbacks.
    #[serde(default = "default_min_bars")]
    pub min_bars: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            adx_period: default_adx_period(),
            cci_period: default_cci_period(),
            obv_trend_window: default_obv_trend_window(),
            rsi_period: default_rsi_period(),
            min_bars: default_min_bars(),
        }
    }
}

// =============================================================================
// ScoringRules
// =============================================================================

/// Thresholds and point values of the additive confidence rule.
///
/// Magnitudes are tunable; the sign of each contribution is fixed (strength
/// and agreement add, weakness and disagreement subtract).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Starting score before any rule applies.
    #[serde(default = "default_base_points")]
    pub base_points: f64,

    /// ADX at or above this is a strong trend.
    #[serde(default = "default_adx_strong_threshold")]
    pub adx_strong_threshold: f64,

    /// ADX below this is a weak / absent trend.
    #[serde(default = "default_adx_weak_threshold")]
    pub adx_weak_threshold: f64,

    #[serde(default = "default_adx_strong_points")]
    pub adx_strong_points: f64,

    /// Subtracted (as a positive number) when the trend is weak.
    #[serde(default = "default_adx_weak_penalty")]
    pub adx_weak_penalty: f64,

    /// CCI below this is oversold.
    #[serde(default = "default_cci_oversold")]
    pub cci_oversold: f64,

    /// CCI above this is overbought.
    #[serde(default = "default_cci_overbought")]
    pub cci_overbought: f64,

    /// Added on CCI agreement, subtracted on disagreement.
    #[serde(default = "default_cci_points")]
    pub cci_points: f64,

    /// Added on OBV-trend agreement, subtracted on disagreement.
    #[serde(default = "default_obv_points")]
    pub obv_points: f64,

    /// Confidence at which a BUY hypothesis counts as endorsed.
    #[serde(default = "default_endorse_threshold")]
    pub buy_threshold: f64,

    /// Confidence at which a SELL hypothesis counts as endorsed.
    #[serde(default = "default_endorse_threshold")]
    pub sell_threshold: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_points: default_base_points(),
            adx_strong_threshold: default_adx_strong_threshold(),
            adx_weak_threshold: default_adx_weak_threshold(),
            adx_strong_points: default_adx_strong_points(),
            adx_weak_penalty: default_adx_weak_penalty(),
            cci_oversold: default_cci_oversold(),
            cci_overbought: default_cci_overbought(),
            cci_points: default_cci_points(),
            obv_points: default_obv_points(),
            buy_threshold: default_endorse_threshold(),
            sell_threshold: default_endorse_threshold(),
        }
    }
}

// =============================================================================
// ServerConfig
// =============================================================================

/// Settings for the HTTP layer and the market-data providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Number of trailing daily bars handed to the engine.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: usize,

    /// Try the Yahoo chart API before Finnhub.
    #[serde(default = "default_true")]
    pub enable_yahoo: bool,

    #[serde(default = "default_yahoo_base_url")]
    pub yahoo_base_url: String,

    #[serde(default = "default_finnhub_base_url")]
    pub finnhub_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            lookback_days: default_lookback_days(),
            enable_yahoo: true,
            yahoo_base_url: default_yahoo_base_url(),
            finnhub_base_url: default_finnhub_base_url(),
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub indicators: IndicatorParams,

    #[serde(default)]
    pub scoring: ScoringRules,

    #[serde(default)]
    pub server: ServerConfig,

    /// Read from `FINNHUB_API_KEY`; never written back out.
    #[serde(default, skip_serializing)]
    pub finnhub_api_key: Option<String>,
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("invalid runtime config in {}", path.display()))?;

        info!(
            path = %path.display(),
            adx_period = config.indicators.adx_period,
            cci_period = config.indicators.cci_period,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Apply `LKBUY_BIND_ADDR` and `FINNHUB_API_KEY` from the environment.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var("LKBUY_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Ok(key) = std::env::var("FINNHUB_API_KEY") {
            let key = key.trim().to_string();
            if !key.is_empty() {
                self.finnhub_api_key = Some(key);
            }
        }
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        let ind = &self.indicators;
        ensure!(ind.adx_period > 0, "indicators.adx_period must be non-zero");
        ensure!(ind.cci_period > 0, "indicators.cci_period must be non-zero");
        ensure!(ind.obv_trend_window > 0, "indicators.obv_trend_window must be non-zero");
        ensure!(ind.rsi_period > 0, "indicators.rsi_period must be non-zero");

        let sc = &self.scoring;
        for (name, value) in [
            ("base_points", sc.base_points),
            ("adx_strong_threshold", sc.adx_strong_threshold),
            ("adx_weak_threshold", sc.adx_weak_threshold),
            ("cci_oversold", sc.cci_oversold),
            ("cci_overbought", sc.cci_overbought),
        ] {
            ensure!(value.is_finite(), "scoring.{name} must be finite, got {value}");
        }
        // Magnitudes only: the sign of each term comes from the rule itself.
        for (name, points) in [
            ("adx_strong_points", sc.adx_strong_points),
            ("adx_weak_penalty", sc.adx_weak_penalty),
            ("cci_points", sc.cci_points),
            ("obv_points", sc.obv_points),
        ] {
            ensure!(
                points.is_finite() && points >= 0.0,
                "scoring.{name} must be a finite non-negative magnitude, got {points}"
            );
        }
        ensure!(
            sc.adx_weak_threshold <= sc.adx_strong_threshold,
            "scoring.adx_weak_threshold ({}) exceeds adx_strong_threshold ({})",
            sc.adx_weak_threshold,
            sc.adx_strong_threshold
        );
        ensure!(
            sc.cci_oversold < sc.cci_overbought,
            "scoring.cci_oversold must be below cci_overbought"
        );
        for (name, threshold) in [("buy", sc.buy_threshold), ("sell", sc.sell_threshold)] {
            ensure!(
                (0.0..=100.0).contains(&threshold),
                "scoring.{name}_threshold must be within 0..=100"
            );
        }

        ensure!(self.server.lookback_days > 0, "server.lookback_days must be non-zero");
        Ok(())
    }
}
