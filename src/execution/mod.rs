//! Collaborator interfaces for trade execution, outcome reporting, and
//! operator-visible status output.
//!
//! The engine only ever talks to these traits; the default implementations
//! simulate the platform surface and are swapped out for deterministic fakes
//! in tests.

pub mod presenter;
pub mod simulated;

pub use presenter::{LogCategory, Presenter, TracingPresenter};
pub use simulated::{SimulatedExecutor, WeightedCoinFlip};

use crate::error::VaneError;
use crate::types::{Direction, TradeOutcome};
use std::future::Future;
use std::pin::Pin;

/// Places a trade on the external platform surface.
///
/// Failure to locate or drive the platform controls is non-fatal: the engine
/// aborts the in-flight trade, logs, and returns to idle.
pub trait TradeExecutor: Send + Sync {
    fn execute(
        &self,
        direction: Direction,
        amount: f64,
    ) -> Pin<Box<dyn Future<Output = Result<(), VaneError>> + Send + '_>>;
}

/// Resolves a fired trade to a win or a loss, eventually.
pub trait OutcomeReporter: Send + Sync {
    fn resolve(
        &self,
        direction: Direction,
        confidence: u8,
    ) -> Pin<Box<dyn Future<Output = TradeOutcome> + Send + '_>>;
}
