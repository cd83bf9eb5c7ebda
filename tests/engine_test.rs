//! End-to-end engine tests: tick stream in, trade lifecycle out.
//!
//! The platform adapters are replaced with deterministic fakes so every
//! scenario is driven entirely by the injected tick sequence and clock.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vane::error::VaneError;
use vane::execution::{LogCategory, OutcomeReporter, Presenter, TradeExecutor};
use vane::services::{ConfigCommand, Engine, EngineEvent};
use vane::types::{Direction, PriceTick, TradeOutcome, TradingConfig};

// ============================================================================
// Fakes
// ============================================================================

/// Executor that places every order immediately.
struct InstantExecutor;

impl TradeExecutor for InstantExecutor {
    fn execute(
        &self,
        _direction: Direction,
        _amount: f64,
    ) -> Pin<Box<dyn Future<Output = Result<(), VaneError>> + Send + '_>> {
        Box::pin(async { Ok(()) })
    }
}

/// Executor that never completes; used to exercise the placement timeout.
struct StallingExecutor;

impl TradeExecutor for StallingExecutor {
    fn execute(
        &self,
        _direction: Direction,
        _amount: f64,
    ) -> Pin<Box<dyn Future<Output = Result<(), VaneError>> + Send + '_>> {
        Box::pin(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
    }
}

/// Reporter that scores every trade the same way.
struct FixedReporter {
    won: bool,
}

impl OutcomeReporter for FixedReporter {
    fn resolve(
        &self,
        _direction: Direction,
        _confidence: u8,
    ) -> Pin<Box<dyn Future<Output = TradeOutcome> + Send + '_>> {
        let won = self.won;
        Box::pin(async move { TradeOutcome { won } })
    }
}

#[derive(Default)]
struct CapturingPresenter {
    lines: Mutex<Vec<(LogCategory, String)>>,
}

impl CapturingPresenter {
    fn count(&self, category: LogCategory) -> usize {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == category)
            .count()
    }

    fn contains(&self, category: LogCategory, needle: &str) -> bool {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .any(|(c, m)| *c == category && m.contains(needle))
    }
}

impl Presenter for CapturingPresenter {
    fn log(&self, category: LogCategory, message: &str) {
        self.lines
            .lock()
            .unwrap()
            .push((category, message.to_string()));
    }
}

// ============================================================================
// Fixtures
// ============================================================================

const ASSET: &str = "EURUSD";
const SECOND_MS: i64 = 1_000;

/// Sixteen flat samples, a small saw-tooth dip, then a steady rising tail.
/// Warms the buffer to exactly 30 samples and yields an Up forecast at
/// confidence 55 with rolling volatility inside the medium-risk tolerance.
fn quiet_uptrend_prices() -> Vec<f64> {
    let mut prices = vec![100.00; 16];
    prices.extend_from_slice(&[
        99.90, 99.98, 99.88, 99.96, 99.86, 99.94, 99.84, 99.92, 99.82,
    ]);
    prices.extend((0..5).map(|i| 99.94 + i as f64 * 0.12));
    prices
}

fn tick(price: f64, ts_ms: i64) -> EngineEvent {
    EngineEvent::Tick(PriceTick {
        ticker: ASSET.to_string(),
        price,
        timestamp: ts_ms,
    })
}

fn armed_config() -> TradingConfig {
    TradingConfig {
        enabled: true,
        prediction_threshold: 50,
        selected_asset: ASSET.to_string(),
        ..TradingConfig::default()
    }
}

struct Harness {
    engine: Engine,
    events_rx: tokio::sync::mpsc::Receiver<EngineEvent>,
    presenter: Arc<CapturingPresenter>,
}

fn harness(executor: Arc<dyn TradeExecutor>, reporter_wins: bool) -> Harness {
    let (events_tx, events_rx) = Engine::channel();
    let presenter = Arc::new(CapturingPresenter::default());
    let engine = Engine::new(
        armed_config(),
        executor,
        Arc::new(FixedReporter {
            won: reporter_wins,
        }),
        Arc::clone(&presenter) as Arc<dyn Presenter>,
        events_tx,
    )
    .with_execution_timeout(Duration::from_millis(200));
    Harness {
        engine,
        events_rx,
        presenter,
    }
}

/// Feed the warm-up sequence; the final tick fires a trade.
fn feed_uptrend(harness: &mut Harness) {
    for (i, price) in quiet_uptrend_prices().iter().enumerate() {
        harness
            .engine
            .handle_event(tick(*price, i as i64 * SECOND_MS), i as i64 * SECOND_MS);
    }
}

// ============================================================================
// Trade Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_winning_trade_lifecycle() {
    let mut h = harness(Arc::new(InstantExecutor), true);
    feed_uptrend(&mut h);
    assert!(h.engine.session().is_trading);
    assert!(h.presenter.contains(LogCategory::Trade, "Executing UP trade for $10.00"));

    let event = h.events_rx.recv().await.expect("resolution event");
    assert!(matches!(event, EngineEvent::TradeResolved(_)));
    h.engine.handle_event(event, 30 * SECOND_MS);

    let session = h.engine.session();
    assert!(!session.is_trading);
    assert_eq!(session.total_trades, 1);
    assert_eq!(session.win_trades, 1);
    assert_eq!(session.total_profit, 8.0);
    assert!(h.presenter.contains(LogCategory::Win, "Trade WON! Profit: $8.00"));
}

#[tokio::test]
async fn test_losing_trade_subtracts_stake() {
    let mut h = harness(Arc::new(InstantExecutor), false);
    feed_uptrend(&mut h);

    let event = h.events_rx.recv().await.expect("resolution event");
    h.engine.handle_event(event, 30 * SECOND_MS);

    let session = h.engine.session();
    assert_eq!(session.loss_trades, 1);
    assert_eq!(session.total_profit, -10.0);
    assert!(h.presenter.contains(LogCategory::Loss, "Trade LOST! Loss: $10.00"));
    // One loss is far from the default limit.
    assert!(!session.breaker_tripped());
    assert!(h.engine.config().enabled);
}

#[tokio::test]
async fn test_cooldown_blocks_refire_after_resolution() {
    let mut h = harness(Arc::new(InstantExecutor), true);
    feed_uptrend(&mut h);

    let event = h.events_rx.recv().await.expect("resolution event");
    h.engine.handle_event(event, 30 * SECOND_MS);
    assert_eq!(h.presenter.count(LogCategory::Trade), 1);

    // Still inside the five-minute window: the next actionable tick holds.
    h.engine
        .handle_event(tick(100.54, 31 * SECOND_MS), 31 * SECOND_MS);
    assert!(!h.engine.session().is_trading);
    assert_eq!(h.presenter.count(LogCategory::Trade), 1);
}

#[tokio::test]
async fn test_breaker_trips_and_disables_trading() {
    let mut h = harness(Arc::new(InstantExecutor), false);
    // A single lost stake reaches the limit.
    h.engine
        .handle_event(EngineEvent::Command(ConfigCommand::SetMaxLoss(10.0)), 0);
    feed_uptrend(&mut h);

    let event = h.events_rx.recv().await.expect("resolution event");
    h.engine.handle_event(event, 30 * SECOND_MS);

    assert!(h.engine.session().breaker_tripped());
    assert!(!h.engine.config().enabled);
    assert!(h.presenter.contains(
        LogCategory::Alert,
        "Maximum loss limit reached. Trading stopped."
    ));

    // Well past the cooldown window, yet nothing fires again.
    let hour_later = 3_700 * SECOND_MS;
    h.engine.handle_event(tick(100.54, hour_later), hour_later);
    assert!(!h.engine.session().is_trading);
    assert_eq!(h.presenter.count(LogCategory::Trade), 1);
}

#[tokio::test]
async fn test_operator_reenable_resumes_after_breaker() {
    let mut h = harness(Arc::new(InstantExecutor), false);
    h.engine
        .handle_event(EngineEvent::Command(ConfigCommand::SetMaxLoss(10.0)), 0);
    feed_uptrend(&mut h);

    let event = h.events_rx.recv().await.expect("resolution event");
    h.engine.handle_event(event, 30 * SECOND_MS);
    assert!(h.engine.session().breaker_tripped());
    assert!(!h.engine.config().enabled);

    // Flipping the switch back on re-arms the breaker.
    h.engine
        .handle_event(EngineEvent::Command(ConfigCommand::SetEnabled(true)), 31 * SECOND_MS);
    assert!(!h.engine.session().breaker_tripped());
    assert!(h.engine.config().enabled);
    assert!(h
        .presenter
        .contains(LogCategory::Alert, "Loss breaker re-armed"));

    // An actionable sequence well past the cooldown fires again.
    let hour_later = 3_600 * SECOND_MS;
    for (i, price) in quiet_uptrend_prices().iter().enumerate() {
        let ts = hour_later + i as i64 * SECOND_MS;
        h.engine.handle_event(tick(*price, ts), ts);
    }
    assert!(h.engine.session().is_trading);
    assert_eq!(h.presenter.count(LogCategory::Trade), 2);
}

// ============================================================================
// Execution Failure Tests
// ============================================================================

#[tokio::test]
async fn test_placement_timeout_aborts_without_counting() {
    let mut h = harness(Arc::new(StallingExecutor), true);
    feed_uptrend(&mut h);
    assert!(h.engine.session().is_trading);

    let event = h.events_rx.recv().await.expect("failure event");
    match &event {
        EngineEvent::TradeFailed(reason) => assert!(reason.contains("timed out")),
        other => panic!("expected failure, got {other:?}"),
    }
    h.engine.handle_event(event, 31 * SECOND_MS);

    let session = h.engine.session();
    assert!(!session.is_trading);
    assert_eq!(session.total_trades, 0);
    assert_eq!(session.total_profit, 0.0);
    assert!(h.presenter.contains(LogCategory::Error, "Failed to execute trade"));
}

// ============================================================================
// Stream Robustness Tests
// ============================================================================

#[tokio::test]
async fn test_garbage_ticks_do_not_pollute_history() {
    let mut h = harness(Arc::new(InstantExecutor), true);

    h.engine.handle_event(
        EngineEvent::Tick(PriceTick {
            ticker: "GBPUSD".to_string(),
            price: 1.25,
            timestamp: 0,
        }),
        0,
    );
    h.engine.handle_event(tick(f64::NAN, SECOND_MS), SECOND_MS);
    h.engine.handle_event(tick(-3.0, 2 * SECOND_MS), 2 * SECOND_MS);
    h.engine.handle_event(tick(100.0, 3 * SECOND_MS), 3 * SECOND_MS);

    assert_eq!(h.engine.history().len(), 1);
    assert_eq!(h.presenter.count(LogCategory::Error), 2);
}
