use serde::{Deserialize, Serialize};
use std::fmt;

/// Forecast direction for the next price movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Neutral,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Neutral => write!(f, "neutral"),
        }
    }
}

/// A directional forecast with a 0-100 confidence score and the
/// human-readable rationale accumulated from the rules that fired.
///
/// Recomputed wholesale on every qualifying tick; no state is carried
/// between predictions except through the price history buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub direction: Direction,
    pub confidence: u8,
    pub rationale: String,
}

impl Prediction {
    /// The forced result when no rule established a direction or the
    /// accumulated confidence stayed below the floor.
    pub fn neutral() -> Self {
        Self {
            direction: Direction::Neutral,
            confidence: 0,
            rationale: "No clear trend detected.".to_string(),
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.direction != Direction::Neutral
    }
}
