//! Process-wide trading session state.

use crate::types::GateState;

/// Payout fraction credited on a winning trade.
pub const WIN_PAYOUT_RATE: f64 = 0.8;

/// Mutable record of the running session: cumulative profit, trade counters,
/// cooldown anchor, and the in-flight flag.
///
/// Created zeroed at startup and owned by the engine task; every mutation
/// happens on that single task, so no locking is required. Not persisted.
#[derive(Debug, Default)]
pub struct TradingSession {
    pub is_trading: bool,
    pub total_profit: f64,
    pub total_trades: u32,
    pub win_trades: u32,
    pub loss_trades: u32,
    /// Epoch ms of the last fired trade; `None` until the first fire.
    pub last_trade_time: Option<i64>,
    breaker_tripped: bool,
}

impl TradingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a trade as fired. Sets the in-flight flag and restarts the
    /// cooldown window.
    pub fn begin_trade(&mut self, now_ms: i64) {
        self.is_trading = true;
        self.last_trade_time = Some(now_ms);
    }

    /// Apply a resolved outcome and clear the in-flight flag.
    ///
    /// Returns `true` when this outcome pushed cumulative profit through the
    /// max-loss limit (a zero `max_loss` disables the breaker). Once tripped
    /// the session stays stopped until an operator intervenes externally.
    pub fn record_outcome(&mut self, won: bool, amount: f64, max_loss: f64) -> bool {
        if won {
            self.total_profit += amount * WIN_PAYOUT_RATE;
            self.win_trades += 1;
        } else {
            self.total_profit -= amount;
            self.loss_trades += 1;
        }
        self.total_trades += 1;
        self.is_trading = false;

        if max_loss > 0.0 && self.total_profit <= -max_loss {
            self.breaker_tripped = true;
        }
        self.breaker_tripped
    }

    /// Re-arm a tripped breaker.
    ///
    /// Called when an operator explicitly re-enables trading; cumulative
    /// profit and counters are kept, so the breaker trips again on the next
    /// loss unless the limit is raised.
    pub fn rearm_breaker(&mut self) {
        self.breaker_tripped = false;
    }

    /// Abort an in-flight trade after an execution failure.
    ///
    /// Clears the flag without touching profit or the win/loss counters; a
    /// failed attempt must never block subsequent trades or count as an
    /// outcome.
    pub fn abort_trade(&mut self) {
        self.is_trading = false;
    }

    pub fn breaker_tripped(&self) -> bool {
        self.breaker_tripped
    }

    /// Fraction of resolved trades won, as a percentage.
    pub fn win_rate_pct(&self) -> f64 {
        if self.total_trades == 0 {
            return 0.0;
        }
        self.win_trades as f64 / self.total_trades as f64 * 100.0
    }

    /// Observable gate state derived from the session.
    pub fn gate_state(&self, now_ms: i64, cooldown_ms: i64) -> GateState {
        if self.breaker_tripped {
            GateState::Stopped
        } else if self.is_trading {
            GateState::TradeInFlight
        } else if let Some(last) = self.last_trade_time {
            if now_ms - last < cooldown_ms {
                GateState::CoolingDown
            } else {
                GateState::Idle
            }
        } else {
            GateState::Idle
        }
    }
}
