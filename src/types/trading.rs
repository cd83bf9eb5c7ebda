use crate::error::VaneError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator-selected risk appetite. Maps to the maximum rolling volatility
/// the trade gate will tolerate before sitting out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl std::str::FromStr for RiskLevel {
    type Err = VaneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(VaneError::Config(format!("unknown risk level: {other}"))),
        }
    }
}

impl RiskLevel {
    /// Maximum average absolute percent change per sample (over the last 20
    /// samples) that is still considered tradeable at this risk level.
    pub fn volatility_threshold(&self) -> f64 {
        match self {
            RiskLevel::Low => 0.05,
            RiskLevel::Medium => 0.1,
            RiskLevel::High => 0.2,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Operator-facing trading configuration.
///
/// Externally mutable through the engine's command channel; read-only to the
/// core decision path within a single tick. The only mutation the core itself
/// performs is forcing `enabled = false` when the max-loss breaker trips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Master switch for automatic trading.
    pub enabled: bool,
    /// Stake per trade, in account currency.
    pub investment_amount: f64,
    /// Cumulative loss (as a positive number) at which the breaker trips.
    /// Zero disables the breaker.
    pub max_loss: f64,
    /// Minimum minutes between two trade executions.
    pub trade_frequency_minutes: u32,
    /// Minimum prediction confidence (0-100) required to fire.
    pub prediction_threshold: u8,
    /// Volatility tolerance for the gate's market-condition filter.
    pub risk_level: RiskLevel,
    /// Ticker the engine subscribes to; ticks for other tickers are ignored.
    pub selected_asset: String,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            investment_amount: 10.0,
            max_loss: 100.0,
            trade_frequency_minutes: 5,
            prediction_threshold: 70,
            risk_level: RiskLevel::Medium,
            selected_asset: String::new(),
        }
    }
}

impl TradingConfig {
    /// Validate operator-supplied values.
    pub fn validate(&self) -> Result<(), VaneError> {
        if !self.investment_amount.is_finite() || self.investment_amount < 0.0 {
            return Err(VaneError::Config(format!(
                "investment_amount must be >= 0, got {}",
                self.investment_amount
            )));
        }
        if !self.max_loss.is_finite() || self.max_loss < 0.0 {
            return Err(VaneError::Config(format!(
                "max_loss must be >= 0, got {}",
                self.max_loss
            )));
        }
        if self.trade_frequency_minutes < 1 {
            return Err(VaneError::Config(
                "trade_frequency_minutes must be >= 1".to_string(),
            ));
        }
        if self.prediction_threshold > 100 {
            return Err(VaneError::Config(format!(
                "prediction_threshold must be 0-100, got {}",
                self.prediction_threshold
            )));
        }
        Ok(())
    }

    /// Cooldown window in milliseconds.
    pub fn cooldown_ms(&self) -> i64 {
        self.trade_frequency_minutes as i64 * 60 * 1000
    }
}

/// Resolution of a fired trade, as reported by the outcome reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOutcome {
    pub won: bool,
}

/// Observable state of the trade gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Ready to evaluate fire conditions.
    Idle,
    /// A prior trade is still inside the cooldown window.
    CoolingDown,
    /// A trade has been fired and not yet resolved.
    TradeInFlight,
    /// Max-loss breaker tripped; terminal until an operator re-enables.
    Stopped,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateState::Idle => write!(f, "idle"),
            GateState::CoolingDown => write!(f, "cooling_down"),
            GateState::TradeInFlight => write!(f, "trade_in_flight"),
            GateState::Stopped => write!(f, "stopped"),
        }
    }
}
