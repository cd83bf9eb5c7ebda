//! Default simulated platform adapters.
//!
//! Stand-ins for the real UI-driving executor and the platform's trade
//! settlement. Both are injectable; tests replace them with deterministic
//! fakes.

use super::{OutcomeReporter, TradeExecutor};
use crate::error::VaneError;
use crate::types::{Direction, TradeOutcome};
use rand::Rng;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

/// Executor that accepts every order after a short placement delay.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    placement_delay: Duration,
}

impl SimulatedExecutor {
    pub fn new(placement_delay: Duration) -> Self {
        Self { placement_delay }
    }
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        // Matches the original platform adapter's settle-before-click delay.
        Self::new(Duration::from_secs(1))
    }
}

impl TradeExecutor for SimulatedExecutor {
    fn execute(
        &self,
        direction: Direction,
        amount: f64,
    ) -> Pin<Box<dyn Future<Output = Result<(), VaneError>> + Send + '_>> {
        Box::pin(async move {
            tokio::time::sleep(self.placement_delay).await;
            debug!("Simulated {direction} order placed for {amount:.2}");
            Ok(())
        })
    }
}

/// Outcome reporter that resolves after a fixed delay with a random draw
/// weighted by the prediction's confidence: the higher the confidence, the
/// more likely the trade is scored a win.
#[derive(Debug, Clone)]
pub struct WeightedCoinFlip {
    resolution_delay: Duration,
}

impl WeightedCoinFlip {
    pub fn new(resolution_delay: Duration) -> Self {
        Self { resolution_delay }
    }
}

impl Default for WeightedCoinFlip {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl OutcomeReporter for WeightedCoinFlip {
    fn resolve(
        &self,
        _direction: Direction,
        confidence: u8,
    ) -> Pin<Box<dyn Future<Output = TradeOutcome> + Send + '_>> {
        Box::pin(async move {
            tokio::time::sleep(self.resolution_delay).await;
            let draw: f64 = rand::thread_rng().gen_range(0.0..100.0);
            TradeOutcome {
                won: draw < confidence as f64,
            }
        })
    }
}
