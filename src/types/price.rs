use serde::{Deserialize, Serialize};

/// A single price observation, immutable once created.
///
/// Timestamps are epoch milliseconds throughout the core; the wire adapter
/// converts whatever the platform sends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub price: f64,
    pub timestamp: i64,
}

impl PriceSample {
    pub fn new(price: f64, timestamp: i64) -> Self {
        Self { price, timestamp }
    }
}

/// A price update for one ticker, as delivered by a tick source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    pub ticker: String,
    pub price: f64,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl PriceTick {
    /// Validate the tick for ingestion. Non-finite or non-positive prices are
    /// dropped by the engine rather than crashing the pipeline.
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }

    pub fn sample(&self) -> PriceSample {
        PriceSample::new(self.price, self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_tick() {
        let tick = PriceTick {
            ticker: "EURUSD".to_string(),
            price: 1.0852,
            timestamp: 1_700_000_000_000,
        };
        assert!(tick.is_valid());
    }

    #[test]
    fn test_rejects_nan_and_nonpositive_prices() {
        let mut tick = PriceTick {
            ticker: "EURUSD".to_string(),
            price: f64::NAN,
            timestamp: 0,
        };
        assert!(!tick.is_valid());
        tick.price = 0.0;
        assert!(!tick.is_valid());
        tick.price = -1.0;
        assert!(!tick.is_valid());
    }

    #[test]
    fn test_sample_carries_price_and_timestamp() {
        let tick = PriceTick {
            ticker: "BTCUSD".to_string(),
            price: 43_500.5,
            timestamp: 1_700_000_000_000,
        };
        let sample = tick.sample();
        assert_eq!(sample.price, 43_500.5);
        assert_eq!(sample.timestamp, 1_700_000_000_000);
    }
}
