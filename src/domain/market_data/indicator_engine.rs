//! Derived series over indexed positions.
//!
//! Every function returns points keyed by the position of the last sample in
//! its window, so outputs line up with the candles they were computed from.

use super::IndexedSeries;
use crate::domain::chart::{XBand, XY};

/// Width of Bollinger bands in standard deviations
pub const BOLLINGER_DEVIATIONS: f64 = 2.0;

/// Simple moving average of closes.
///
/// Every window is summed on its own, so a NaN close only affects the
/// windows that contain it.
pub fn simple_moving_average(series: &IndexedSeries, period: usize) -> Vec<XY> {
    let period = period.max(1);
    series
        .closes()
        .windows(period)
        .enumerate()
        .map(|(start, window)| XY::new((start + period - 1) as f64, window.iter().sum::<f64>() / period as f64))
        .collect()
}

/// Exponential moving average seeded with the SMA of the first window.
pub fn exponential_moving_average(series: &IndexedSeries, period: usize) -> Vec<XY> {
    let period = period.max(1);
    let closes = series.closes();
    if closes.len() < period {
        return Vec::new();
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let seed = closes[..period].iter().sum::<f64>() / period as f64;
    let mut out = Vec::with_capacity(closes.len() - period + 1);
    out.push(XY::new((period - 1) as f64, seed));

    let mut last = seed;
    for (x, close) in closes.iter().enumerate().skip(period) {
        last = alpha * close + (1.0 - alpha) * last;
        out.push(XY::new(x as f64, last));
    }
    out
}

/// Bollinger bands around the SMA of closes.
pub fn bollinger_bands(series: &IndexedSeries, period: usize) -> Vec<XBand> {
    let period = period.max(1);
    let closes = series.closes();
    if closes.len() < period {
        return Vec::new();
    }

    closes
        .windows(period)
        .enumerate()
        .map(|(start, window)| {
            let mean = window.iter().sum::<f64>() / period as f64;
            let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
            let spread = BOLLINGER_DEVIATIONS * variance.sqrt();
            XBand::new((start + period - 1) as f64, mean + spread, mean - spread)
        })
        .collect()
}

/// Relative strength index with Wilder smoothing, values in `[0, 100]`.
pub fn relative_strength_index(series: &IndexedSeries, period: usize) -> Vec<XY> {
    let period = period.max(1);
    let closes = series.closes();
    if closes.len() <= period {
        return Vec::new();
    }

    let change = |i: usize| closes[i] - closes[i - 1];
    let mut avg_gain = (1..=period).map(|i| change(i).max(0.0)).sum::<f64>() / period as f64;
    let mut avg_loss = (1..=period).map(|i| (-change(i)).max(0.0)).sum::<f64>() / period as f64;

    let mut out = Vec::with_capacity(closes.len() - period);
    out.push(XY::new(period as f64, rsi_value(avg_gain, avg_loss)));

    for i in (period + 1)..closes.len() {
        let delta = change(i);
        avg_gain = (avg_gain * (period - 1) as f64 + delta.max(0.0)) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + (-delta).max(0.0)) / period as f64;
        out.push(XY::new(i as f64, rsi_value(avg_gain, avg_loss)));
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { 50.0 } else { 100.0 }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// Volume as a stepped outline so an area series draws it as histogram bars.
///
/// For every point after the first, a step `(previous x, current volume)` is
/// inserted before the point itself.
pub fn volume_histogram(series: &IndexedSeries) -> Vec<XY> {
    let mut out = Vec::with_capacity(series.len() * 2);
    let mut previous: Option<XY> = None;
    for (x, point) in series.points().iter().enumerate() {
        let current = XY::new(x as f64, point.ohlcv.volume.value());
        if let Some(prev) = previous {
            out.push(XY::new(prev.x, current.y));
        }
        out.push(current);
        previous = Some(current);
    }
    out
}
