use crate::types::{RiskLevel, TradingConfig};
use std::env;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Quote-feed WebSocket URL (ws:// or wss://).
    pub ws_url: String,
    /// Ticker to subscribe to and trade.
    pub asset: String,
    /// Per-trade execution timeout in seconds.
    pub execution_timeout_secs: u64,
    /// Initial trading parameters; mutable later through engine commands.
    pub trading: TradingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let asset = env::var("VANE_ASSET").unwrap_or_else(|_| "EURUSD".to_string());

        let trading = TradingConfig {
            enabled: env::var("VANE_AUTO_TRADE")
                .ok()
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            investment_amount: env::var("VANE_INVESTMENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10.0),
            max_loss: env::var("VANE_MAX_LOSS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100.0),
            trade_frequency_minutes: env::var("VANE_TRADE_FREQUENCY_MIN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            prediction_threshold: env::var("VANE_PREDICTION_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(70),
            risk_level: env::var("VANE_RISK_LEVEL")
                .ok()
                .and_then(|v| v.parse::<RiskLevel>().ok())
                .unwrap_or_default(),
            selected_asset: asset.clone(),
        };

        Self {
            ws_url: env::var("VANE_WS_URL")
                .unwrap_or_else(|_| "wss://quotes.example.com/feed".to_string()),
            asset,
            execution_timeout_secs: env::var("VANE_EXECUTION_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            trading,
        }
    }
}
