//! Price-movement prediction engine.
//!
//! Combines a small set of technical indicators into a directional forecast
//! with a 0-100 confidence score. Each rule either establishes the direction
//! or reinforces it; the RSI rule alone may override an established direction.
//! The result is pure in the buffer snapshot: recomputing on unchanged data
//! yields an identical prediction.

pub mod indicators;

use crate::services::history::PriceHistory;
use crate::types::{Direction, Prediction};

const SHORT_MA_PERIOD: usize = 5;
const LONG_MA_PERIOD: usize = 15;
const RSI_PERIOD: usize = 14;
const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;
const MOMENTUM_LOOKBACK: usize = 10;
const MOMENTUM_THRESHOLD_PCT: f64 = 0.5;

const MA_CONFIDENCE: u32 = 25;
const RSI_CONFIDENCE: u32 = 20;
const MOMENTUM_CONFIDENCE: u32 = 15;
const PATTERN_CONFIDENCE: u32 = 15;

/// Confidence floor below which the forecast is forced to neutral.
const CONFIDENCE_FLOOR: u32 = 20;

/// Working state for the rule accumulator.
struct Accumulator {
    direction: Option<Direction>,
    confidence: u32,
    rationale: String,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            direction: None,
            confidence: 0,
            rationale: String::new(),
        }
    }

    /// Reinforce on agreement, establish when unset, leave conflicts alone.
    fn bias(&mut self, direction: Direction, points: u32, reason: &str) {
        match self.direction {
            Some(current) if current == direction => {
                self.confidence += points;
                self.rationale.push_str(reason);
            }
            None => {
                self.direction = Some(direction);
                self.confidence = points;
                self.rationale = reason.to_string();
            }
            Some(_) => {}
        }
    }

    /// Reinforce on agreement, otherwise replace the established direction
    /// and restart the score from `points` (RSI rule only).
    fn bias_or_override(&mut self, direction: Direction, points: u32, reason: &str) {
        if self.direction == Some(direction) {
            self.confidence += points;
            self.rationale.push_str(reason);
        } else {
            self.direction = Some(direction);
            self.confidence = points;
            self.rationale = reason.to_string();
        }
    }
}

/// Derive a forecast from the full price history.
///
/// Requires a warm buffer; below the minimum sample count the result is the
/// neutral prediction (the engine treats that recompute as a no-op anyway).
pub fn predict(history: &PriceHistory) -> Prediction {
    if !history.is_warm() {
        return Prediction::neutral();
    }

    let prices = history.prices();
    let mut acc = Accumulator::new();

    // Rule 1: short MA vs long MA. Runs first, so it always establishes.
    if let (Some(short), Some(long)) = (
        indicators::sma(&prices, SHORT_MA_PERIOD),
        indicators::sma(&prices, LONG_MA_PERIOD),
    ) {
        if short > long {
            acc.bias(Direction::Up, MA_CONFIDENCE, "Short-term MA above long-term MA. ");
        } else if short < long {
            acc.bias(Direction::Down, MA_CONFIDENCE, "Short-term MA below long-term MA. ");
        }
    }

    // Rule 2: RSI extremes. The only rule allowed to override.
    let rsi = indicators::rsi(&prices, RSI_PERIOD);
    if rsi > RSI_OVERBOUGHT {
        acc.bias_or_override(
            Direction::Down,
            RSI_CONFIDENCE,
            "RSI indicates overbought conditions. ",
        );
    } else if rsi < RSI_OVERSOLD {
        acc.bias_or_override(
            Direction::Up,
            RSI_CONFIDENCE,
            "RSI indicates oversold conditions. ",
        );
    }

    // Rule 3: recent momentum. Never overrides a conflicting direction.
    if let Some(change_pct) = indicators::momentum(&prices, MOMENTUM_LOOKBACK) {
        if change_pct > MOMENTUM_THRESHOLD_PCT {
            acc.bias(Direction::Up, MOMENTUM_CONFIDENCE, "Strong upward momentum. ");
        } else if change_pct < -MOMENTUM_THRESHOLD_PCT {
            acc.bias(Direction::Down, MOMENTUM_CONFIDENCE, "Strong downward momentum. ");
        }
    }

    // Rule 4: consistent five-sample run. Same policy as rule 3.
    match indicators::monotonic_run(&prices) {
        Some(Direction::Up) => {
            acc.bias(Direction::Up, PATTERN_CONFIDENCE, "Consistent upward price pattern. ");
        }
        Some(Direction::Down) => {
            acc.bias(
                Direction::Down,
                PATTERN_CONFIDENCE,
                "Consistent downward price pattern. ",
            );
        }
        _ => {}
    }

    let confidence = acc.confidence.min(100);

    match acc.direction {
        Some(direction) if confidence >= CONFIDENCE_FLOOR => Prediction {
            direction,
            confidence: confidence as u8,
            rationale: acc.rationale.trim_end().to_string(),
        },
        _ => Prediction::neutral(),
    }
}
