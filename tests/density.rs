mod common;

use common::{indexed, intraday_keys, trading_year};
use std::num::NonZeroUsize;
use trading_chart_wasm::domain::market_data::{DensityEstimator, IndexedSeries};

#[test]
fn distance_between_first_two_day_changes() {
    // day boundaries at positions 0, 5 and 11
    let days = [2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 4, 4];
    let series = indexed(&intraday_keys(&days));
    assert_eq!(DensityEstimator::estimate(&series), NonZeroUsize::new(6));
}

#[test]
fn single_calendar_day_has_unknown_density() {
    let series = indexed(&intraday_keys(&[5, 5, 5, 5]));
    assert_eq!(DensityEstimator::estimate(&series), None);
    assert_eq!(DensityEstimator::estimate(&IndexedSeries::default()), None);
}

#[test]
fn two_calendar_days_are_not_enough() {
    let series = indexed(&intraday_keys(&[5, 5, 6, 6, 6]));
    assert_eq!(DensityEstimator::estimate(&series), None);
}

#[test]
fn daily_history_has_one_point_per_day() {
    let series = IndexedSeries::build(&trading_year()).unwrap();
    assert_eq!(DensityEstimator::estimate(&series), NonZeroUsize::new(1));
}

#[test]
fn windows_scale_with_density_and_never_reach_zero() {
    assert_eq!(DensityEstimator::window_positions(13.0, None), 13);
    assert_eq!(DensityEstimator::window_positions(1.0, NonZeroUsize::new(26)), 26);
    assert_eq!(DensityEstimator::window_positions(0.5, NonZeroUsize::new(7)), 4);
    assert_eq!(DensityEstimator::window_positions(0.0, NonZeroUsize::new(26)), 1);
    assert_eq!(DensityEstimator::window_positions(f64::NAN, None), 1);
}
