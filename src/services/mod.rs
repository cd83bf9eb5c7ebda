pub mod engine;
pub mod gate;
pub mod history;
pub mod predictor;
pub mod session;

pub use engine::{ConfigCommand, Engine, EngineEvent};
pub use gate::{GateDecision, HoldReason};
pub use history::PriceHistory;
pub use session::TradingSession;
