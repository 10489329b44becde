// =============================================================================
// Signals Module
// =============================================================================
//
// Decision engine: turns an `IndicatorSet` plus a requested action into a
// graded `Signal`.

pub mod confidence;

pub use confidence::{score_signal, Contribution, Signal, StrengthLevel};
