//! Trade gate: decides whether a prediction fires a trade.
//!
//! Pure over its inputs; the engine applies the resulting transition to the
//! session and spawns execution. Note the in-flight flag is part of the fire
//! condition, so overlapping trades are impossible even with a cooldown
//! shorter than outcome-resolution latency.

use crate::services::history::PriceHistory;
use crate::services::predictor::indicators;
use crate::services::session::TradingSession;
use crate::types::{Direction, Prediction, TradingConfig};
use std::fmt;

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// All conditions hold; fire a trade in `direction` for `amount`.
    Fire { direction: Direction, amount: f64 },
    /// Sit out this tick.
    Hold(HoldReason),
}

impl GateDecision {
    pub fn is_fire(&self) -> bool {
        matches!(self, GateDecision::Fire { .. })
    }
}

/// Why the gate declined to fire.
#[derive(Debug, Clone, PartialEq)]
pub enum HoldReason {
    /// Auto trading is switched off.
    Disabled,
    /// Max-loss breaker has tripped; terminal until operator re-enable.
    Stopped,
    /// A previous trade has not resolved yet.
    InFlight,
    /// No price has been ingested yet.
    NoPrice,
    /// The forecast has no usable direction.
    Neutral,
    /// Forecast confidence is under the operator threshold.
    BelowThreshold { confidence: u8, threshold: u8 },
    /// The cooldown window since the last trade has not elapsed.
    CoolingDown { remaining_ms: i64 },
    /// Rolling volatility exceeds the risk-level tolerance.
    MarketUnsuitable { volatility: f64, threshold: f64 },
}

impl fmt::Display for HoldReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoldReason::Disabled => write!(f, "auto trading disabled"),
            HoldReason::Stopped => write!(f, "max-loss breaker tripped"),
            HoldReason::InFlight => write!(f, "trade already in flight"),
            HoldReason::NoPrice => write!(f, "no current price"),
            HoldReason::Neutral => write!(f, "neutral prediction"),
            HoldReason::BelowThreshold {
                confidence,
                threshold,
            } => write!(f, "confidence {confidence}% below threshold {threshold}%"),
            HoldReason::CoolingDown { remaining_ms } => {
                write!(f, "cooling down for {}s", remaining_ms / 1000)
            }
            HoldReason::MarketUnsuitable {
                volatility,
                threshold,
            } => write!(
                f,
                "volatility {volatility:.3}% above {threshold:.3}% tolerance"
            ),
        }
    }
}

/// Evaluate the fire conditions for the current tick.
pub fn evaluate(
    config: &TradingConfig,
    session: &TradingSession,
    history: &PriceHistory,
    prediction: &Prediction,
    now_ms: i64,
) -> GateDecision {
    if session.breaker_tripped() {
        return GateDecision::Hold(HoldReason::Stopped);
    }
    if !config.enabled {
        return GateDecision::Hold(HoldReason::Disabled);
    }
    if session.is_trading {
        return GateDecision::Hold(HoldReason::InFlight);
    }
    if history.latest().is_none() {
        return GateDecision::Hold(HoldReason::NoPrice);
    }
    if !prediction.is_actionable() {
        return GateDecision::Hold(HoldReason::Neutral);
    }
    if prediction.confidence < config.prediction_threshold {
        return GateDecision::Hold(HoldReason::BelowThreshold {
            confidence: prediction.confidence,
            threshold: config.prediction_threshold,
        });
    }
    if let Some(last) = session.last_trade_time {
        let elapsed = now_ms - last;
        if elapsed < config.cooldown_ms() {
            return GateDecision::Hold(HoldReason::CoolingDown {
                remaining_ms: config.cooldown_ms() - elapsed,
            });
        }
    }

    let volatility = indicators::window_volatility(&history.prices());
    let tolerance = config.risk_level.volatility_threshold();
    if volatility > tolerance {
        return GateDecision::Hold(HoldReason::MarketUnsuitable {
            volatility,
            threshold: tolerance,
        });
    }

    GateDecision::Fire {
        direction: prediction.direction,
        amount: config.investment_amount,
    }
}
