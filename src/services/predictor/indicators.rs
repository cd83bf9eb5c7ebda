//! Pure numeric indicators over a chronological price slice.
//!
//! Insufficient data is never an error: `sma` and `momentum` return `None`,
//! `rsi` falls back to its neutral midpoint.

use crate::types::Direction;

/// Neutral RSI value returned when the window is too short or flat.
pub const RSI_NEUTRAL: f64 = 50.0;

/// Simple moving average of the last `period` prices.
///
/// Returns `None` when fewer than `period` prices are available.
pub fn sma(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }
    let sum: f64 = prices[prices.len() - period..].iter().sum();
    Some(sum / period as f64)
}

/// Relative strength index over the last `period` deltas.
///
/// A delta of exactly zero counts as a gain of zero, never a loss. When the
/// loss sum is zero the result is 100 only if some gain was observed; a
/// completely flat window reads as neutral rather than overbought.
pub fn rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return RSI_NEUTRAL;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in prices.len() - period..prices.len() {
        let change = prices[i] - prices[i - 1];
        if change >= 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    if losses == 0.0 {
        return if gains > 0.0 { 100.0 } else { RSI_NEUTRAL };
    }

    let relative_strength = gains / losses;
    100.0 - (100.0 / (1.0 + relative_strength))
}

/// Percent change of the last price against the price `lookback` samples
/// back (the base of the window, matching a `len - lookback` index).
///
/// Returns `None` when fewer than `lookback` prices are available or the
/// base price is zero.
pub fn momentum(prices: &[f64], lookback: usize) -> Option<f64> {
    if lookback == 0 || prices.len() < lookback {
        return None;
    }
    let base = prices[prices.len() - lookback];
    let last = *prices.last()?;
    if base == 0.0 {
        return None;
    }
    Some((last - base) / base * 100.0)
}

/// Direction of a strictly monotonic run over the last 5 prices, if any.
pub fn monotonic_run(prices: &[f64]) -> Option<Direction> {
    const RUN_LEN: usize = 5;
    if prices.len() < RUN_LEN {
        return None;
    }
    let tail = &prices[prices.len() - RUN_LEN..];

    let mut rising = true;
    let mut falling = true;
    for pair in tail.windows(2) {
        if pair[1] <= pair[0] {
            rising = false;
        }
        if pair[1] >= pair[0] {
            falling = false;
        }
    }

    if rising {
        Some(Direction::Up)
    } else if falling {
        Some(Direction::Down)
    } else {
        None
    }
}

/// Mean absolute percent change per sample over the last 20 prices.
///
/// Used by the trade gate's market-condition filter; windows shorter than 20
/// samples read as zero volatility (tradeable).
pub fn window_volatility(prices: &[f64]) -> f64 {
    const WINDOW: usize = 20;
    if prices.len() < WINDOW {
        return 0.0;
    }
    let tail = &prices[prices.len() - WINDOW..];

    let mut total = 0.0;
    for pair in tail.windows(2) {
        if pair[0] != 0.0 {
            total += ((pair[1] - pair[0]) / pair[0] * 100.0).abs();
        }
    }
    total / (WINDOW - 1) as f64
}
