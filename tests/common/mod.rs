#![allow(dead_code)]

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::cell::RefCell;
use trading_chart_wasm::application::UserNotifier;
use trading_chart_wasm::domain::market_data::{IndexedSeries, RawOhlcv, RawSeries};

pub fn bar(close: f64, volume: f64) -> RawOhlcv {
    let (open, high, low) = (close - 0.5, close + 1.0, close - 1.0);
    RawOhlcv::new(
        &open.to_string(),
        &high.to_string(),
        &low.to_string(),
        &close.to_string(),
        &volume.to_string(),
    )
}

/// Series with the given keys and a gently oscillating close.
pub fn raw_from_keys<S: AsRef<str>>(keys: &[S]) -> RawSeries {
    keys.iter()
        .enumerate()
        .map(|(i, key)| {
            let close = 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1;
            (key.as_ref().to_string(), bar(close, 1_000.0 + i as f64))
        })
        .collect()
}

/// `count` consecutive weekdays starting at `start`, as daily keys.
pub fn weekday_keys(start: NaiveDate, count: usize) -> Vec<String> {
    let mut keys = Vec::with_capacity(count);
    let mut date = start;
    while keys.len() < count {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            keys.push(date.format("%Y-%m-%d").to_string());
        }
        date += Duration::days(1);
    }
    keys
}

/// 252 trading days of 2023, the usual one-year series.
pub fn trading_year() -> RawSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    raw_from_keys(&weekday_keys(start, 252))
}

/// Intraday keys for September 2019: one entry per element of `days`, each
/// 15 minutes after the previous entry of the same day.
pub fn intraday_keys(days: &[u32]) -> Vec<String> {
    let mut keys = Vec::with_capacity(days.len());
    let mut previous: Option<(u32, i64)> = None;
    for &day in days {
        let slot = match previous {
            Some((d, slot)) if d == day => slot + 1,
            _ => 0,
        };
        previous = Some((day, slot));
        let time = NaiveDate::from_ymd_opt(2019, 9, day)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
            + Duration::minutes(15 * slot);
        keys.push(time.format("%Y-%m-%d %H:%M:%S").to_string());
    }
    keys
}

pub fn indexed(keys: &[String]) -> IndexedSeries {
    IndexedSeries::build(&raw_from_keys(keys)).unwrap()
}

/// Collects alert messages instead of showing them.
#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: RefCell<Vec<String>>,
}

impl UserNotifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
