//! Core event loop: tick ingestion, prediction, trade gating, and
//! asynchronous trade resolution.
//!
//! All mutable state (history buffer, session, config) is owned by the
//! single engine task; adapters and spawned execution tasks communicate
//! exclusively through the event channel, so processing one event always
//! runs to completion before the next and no locking is needed.

use crate::error::VaneError;
use crate::execution::{LogCategory, OutcomeReporter, Presenter, TradeExecutor};
use crate::services::gate::{self, GateDecision};
use crate::services::history::PriceHistory;
use crate::services::predictor;
use crate::services::session::TradingSession;
use crate::types::{Direction, Prediction, PriceTick, RiskLevel, TradeOutcome, TradingConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Default bound for the engine event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Everything the engine reacts to.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// A price update from the tick source.
    Tick(PriceTick),
    /// A fired trade resolved to a win or a loss.
    TradeResolved(TradeOutcome),
    /// The execution task could not place the trade.
    TradeFailed(String),
    /// An operator configuration write.
    Command(ConfigCommand),
}

/// Operator writes to the trading configuration. Applied between events, so
/// they take effect before the next fire decision; disabling never aborts an
/// already in-flight trade.
#[derive(Debug, Clone)]
pub enum ConfigCommand {
    SetEnabled(bool),
    SetInvestmentAmount(f64),
    SetMaxLoss(f64),
    SetTradeFrequencyMinutes(u32),
    SetPredictionThreshold(u8),
    SetRiskLevel(RiskLevel),
    SetSelectedAsset(String),
}

/// The prediction and auto-trade decision engine.
pub struct Engine {
    config: TradingConfig,
    history: PriceHistory,
    session: TradingSession,
    prediction: Option<Prediction>,
    /// Stake captured when the in-flight trade fired; config changes made
    /// while a trade is open must not alter its settlement.
    pending_stake: f64,
    executor: Arc<dyn TradeExecutor>,
    reporter: Arc<dyn OutcomeReporter>,
    presenter: Arc<dyn Presenter>,
    events_tx: mpsc::Sender<EngineEvent>,
    execution_timeout: Duration,
}

impl Engine {
    /// Create the bounded event channel the engine consumes.
    pub fn channel() -> (mpsc::Sender<EngineEvent>, mpsc::Receiver<EngineEvent>) {
        mpsc::channel(EVENT_CHANNEL_CAPACITY)
    }

    pub fn new(
        config: TradingConfig,
        executor: Arc<dyn TradeExecutor>,
        reporter: Arc<dyn OutcomeReporter>,
        presenter: Arc<dyn Presenter>,
        events_tx: mpsc::Sender<EngineEvent>,
    ) -> Self {
        Self {
            config,
            history: PriceHistory::new(),
            session: TradingSession::new(),
            prediction: None,
            pending_stake: 0.0,
            executor,
            reporter,
            presenter,
            events_tx,
            execution_timeout: Duration::from_secs(30),
        }
    }

    /// Override the per-trade execution timeout.
    pub fn with_execution_timeout(mut self, timeout: Duration) -> Self {
        self.execution_timeout = timeout;
        self
    }

    pub fn config(&self) -> &TradingConfig {
        &self.config
    }

    pub fn session(&self) -> &TradingSession {
        &self.session
    }

    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        self.prediction.as_ref()
    }

    /// Consume events until the channel closes.
    pub async fn run(mut self, mut events_rx: mpsc::Receiver<EngineEvent>) {
        self.presenter
            .log(LogCategory::System, "Engine started. Ready to trade.");
        while let Some(event) = events_rx.recv().await {
            let now_ms = chrono::Utc::now().timestamp_millis();
            self.handle_event(event, now_ms);
        }
        self.presenter.log(LogCategory::System, "Engine stopped.");
    }

    /// Process one event to completion. `now_ms` is injected so tests can
    /// drive the clock.
    pub fn handle_event(&mut self, event: EngineEvent, now_ms: i64) {
        match event {
            EngineEvent::Tick(tick) => self.on_tick(tick, now_ms),
            EngineEvent::TradeResolved(outcome) => self.on_trade_resolved(outcome),
            EngineEvent::TradeFailed(reason) => self.on_trade_failed(&reason),
            EngineEvent::Command(command) => self.on_command(command),
        }
    }

    fn on_tick(&mut self, tick: PriceTick, now_ms: i64) {
        if self.config.selected_asset.is_empty() || tick.ticker != self.config.selected_asset {
            return;
        }
        if !tick.is_valid() {
            let err = VaneError::MalformedTick(format!(
                "dropping tick for {}: price {}",
                tick.ticker, tick.price
            ));
            warn!("{err}");
            self.presenter.log(LogCategory::Error, &err.to_string());
            return;
        }

        self.history.push(tick.sample());

        if !self.history.is_warm() {
            debug!(
                "Warming up: {}/{} samples",
                self.history.len(),
                crate::services::history::MIN_PREDICTION_SAMPLES
            );
            return;
        }

        let prediction = predictor::predict(&self.history);
        debug!(
            direction = %prediction.direction,
            confidence = prediction.confidence,
            "Prediction updated"
        );
        self.prediction = Some(prediction);
        self.evaluate_gate(now_ms);
    }

    fn evaluate_gate(&mut self, now_ms: i64) {
        let prediction = match &self.prediction {
            Some(p) => p,
            None => return,
        };

        match gate::evaluate(&self.config, &self.session, &self.history, prediction, now_ms) {
            GateDecision::Fire { direction, amount } => self.fire_trade(direction, amount, now_ms),
            GateDecision::Hold(reason) => {
                debug!("Holding: {reason}");
            }
        }
    }

    fn fire_trade(&mut self, direction: Direction, amount: f64, now_ms: i64) {
        let confidence = self
            .prediction
            .as_ref()
            .map(|p| p.confidence)
            .unwrap_or_default();

        self.session.begin_trade(now_ms);
        self.pending_stake = amount;

        let message = format!(
            "Executing {} trade for ${amount:.2}",
            direction.to_string().to_uppercase()
        );
        info!(confidence, "{message}");
        self.presenter.log(LogCategory::Trade, &message);

        let executor = Arc::clone(&self.executor);
        let reporter = Arc::clone(&self.reporter);
        let events_tx = self.events_tx.clone();
        let timeout = self.execution_timeout;

        tokio::spawn(async move {
            let placed = tokio::time::timeout(timeout, executor.execute(direction, amount)).await;
            let event = match placed {
                Err(_) => EngineEvent::TradeFailed(
                    VaneError::ExecutionTimeout(timeout.as_secs()).to_string(),
                ),
                Ok(Err(e)) => EngineEvent::TradeFailed(e.to_string()),
                Ok(Ok(())) => {
                    let outcome = reporter.resolve(direction, confidence).await;
                    EngineEvent::TradeResolved(outcome)
                }
            };
            // The engine owning the receiver has shut down if this fails;
            // nothing left to notify.
            let _ = events_tx.send(event).await;
        });
    }

    fn on_trade_resolved(&mut self, outcome: TradeOutcome) {
        if !self.session.is_trading {
            warn!("Outcome reported with no trade in flight; ignoring");
            return;
        }

        let stake = self.pending_stake;
        let tripped = self
            .session
            .record_outcome(outcome.won, stake, self.config.max_loss);

        if outcome.won {
            let message = format!(
                "Trade WON! Profit: ${:.2}",
                stake * crate::services::session::WIN_PAYOUT_RATE
            );
            info!(total_profit = self.session.total_profit, "{message}");
            self.presenter.log(LogCategory::Win, &message);
        } else {
            let message = format!("Trade LOST! Loss: ${stake:.2}");
            info!(total_profit = self.session.total_profit, "{message}");
            self.presenter.log(LogCategory::Loss, &message);
        }

        if tripped && self.config.enabled {
            self.config.enabled = false;
            let err = VaneError::BreakerTripped(self.session.total_profit);
            warn!("{err}");
            self.presenter.log(
                LogCategory::Alert,
                "Maximum loss limit reached. Trading stopped.",
            );
        }
    }

    fn on_trade_failed(&mut self, reason: &str) {
        self.session.abort_trade();
        let message = format!("Failed to execute trade: {reason}");
        warn!("{message}");
        self.presenter.log(LogCategory::Error, &message);
    }

    fn on_command(&mut self, command: ConfigCommand) {
        let re_enabled = matches!(command, ConfigCommand::SetEnabled(true));
        let mut candidate = self.config.clone();
        let description = match command {
            ConfigCommand::SetEnabled(enabled) => {
                candidate.enabled = enabled;
                format!(
                    "Auto trading {}",
                    if enabled { "enabled" } else { "disabled" }
                )
            }
            ConfigCommand::SetInvestmentAmount(amount) => {
                candidate.investment_amount = amount;
                format!("Investment amount set to ${amount:.2}")
            }
            ConfigCommand::SetMaxLoss(max_loss) => {
                candidate.max_loss = max_loss;
                format!("Maximum loss limit set to ${max_loss:.2}")
            }
            ConfigCommand::SetTradeFrequencyMinutes(minutes) => {
                candidate.trade_frequency_minutes = minutes;
                format!("Trade frequency set to {minutes} minutes")
            }
            ConfigCommand::SetPredictionThreshold(threshold) => {
                candidate.prediction_threshold = threshold;
                format!("Prediction threshold set to {threshold}%")
            }
            ConfigCommand::SetRiskLevel(level) => {
                candidate.risk_level = level;
                format!("Risk level set to {level}")
            }
            ConfigCommand::SetSelectedAsset(ref asset) => {
                candidate.selected_asset = asset.clone();
                format!("Selected asset: {asset}")
            }
        };

        if let Err(e) = candidate.validate() {
            warn!("Rejected config change: {e}");
            self.presenter
                .log(LogCategory::Error, &format!("Rejected config change: {e}"));
            return;
        }

        self.config = candidate;
        info!("{description}");
        self.presenter.log(LogCategory::System, &description);

        // An explicit re-enable is the operator's way out of the stopped
        // state; the breaker re-arms and trips again on the next loss.
        if re_enabled && self.session.breaker_tripped() {
            self.session.rearm_breaker();
            warn!("Loss breaker re-armed by operator");
            self.presenter
                .log(LogCategory::Alert, "Loss breaker re-armed. Trading resumed.");
        }
    }
}
