//! Operator-facing status sink.

use std::fmt;
use tracing::{error, info, warn};

/// Category attached to every status line, mirroring the trade-log entry
/// kinds an operator sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    System,
    Trade,
    Win,
    Loss,
    Alert,
    Error,
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogCategory::System => write!(f, "system"),
            LogCategory::Trade => write!(f, "trade"),
            LogCategory::Win => write!(f, "win"),
            LogCategory::Loss => write!(f, "loss"),
            LogCategory::Alert => write!(f, "alert"),
            LogCategory::Error => write!(f, "error"),
        }
    }
}

/// One-way sink for human-readable status lines.
///
/// The engine calls it on every state transition and error; it never blocks
/// on it and never reads from it.
pub trait Presenter: Send + Sync {
    fn log(&self, category: LogCategory, message: &str);
}

/// Default presenter that forwards to `tracing` (timestamps come from the
/// subscriber).
#[derive(Debug, Default, Clone)]
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn log(&self, category: LogCategory, message: &str) {
        match category {
            LogCategory::Error => error!(category = %category, "{message}"),
            LogCategory::Alert => warn!(category = %category, "{message}"),
            _ => info!(category = %category, "{message}"),
        }
    }
}
