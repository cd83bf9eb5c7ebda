//! Rolling price-history buffer.

use crate::types::PriceSample;
use std::collections::VecDeque;

/// Fixed number of samples retained; the oldest is evicted first.
pub const HISTORY_CAP: usize = 100;

/// Minimum samples before the prediction engine runs.
pub const MIN_PREDICTION_SAMPLES: usize = 30;

/// Bounded, chronologically ordered sequence of price samples.
///
/// Owned exclusively by the engine; mutated only on the ingestion path.
#[derive(Debug, Default)]
pub struct PriceHistory {
    samples: VecDeque<PriceSample>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(HISTORY_CAP),
        }
    }

    /// Append a sample, evicting the oldest once the cap is exceeded.
    pub fn push(&mut self, sample: PriceSample) {
        self.samples.push_back(sample);
        while self.samples.len() > HISTORY_CAP {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether enough samples have accumulated to predict.
    pub fn is_warm(&self) -> bool {
        self.samples.len() >= MIN_PREDICTION_SAMPLES
    }

    pub fn latest(&self) -> Option<&PriceSample> {
        self.samples.back()
    }

    pub fn oldest(&self) -> Option<&PriceSample> {
        self.samples.front()
    }

    /// Snapshot of the prices in chronological order.
    pub fn prices(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.price).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceSample> {
        self.samples.iter()
    }
}
