use thiserror::Error;

/// Application error types.
///
/// An underfilled price buffer is not an error (the recompute is a defined
/// no-op), so there is no variant for it; indicator functions return `Option`
/// or a neutral default instead.
#[derive(Error, Debug)]
pub enum VaneError {
    #[error("Malformed tick: {0}")]
    MalformedTick(String),

    #[error("Trade execution failed: {0}")]
    ExecutionFailure(String),

    #[error("Trade control not found: {0}")]
    ExecutionNotFound(String),

    #[error("Trade execution timed out after {0}s")]
    ExecutionTimeout(u64),

    #[error("Max-loss breaker tripped at {0:.2}")]
    BreakerTripped(f64),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VaneError>;
