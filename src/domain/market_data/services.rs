use super::IndexedSeries;
use std::num::NonZeroUsize;

/// Infers how many data points make up one calendar day.
pub struct DensityEstimator;

impl DensityEstimator {
    /// Length of the first complete interior day.
    ///
    /// The first day is skipped because the provider window usually starts
    /// part-way through it. Returns `None` when the series has fewer than two
    /// day transitions.
    pub fn estimate(series: &IndexedSeries) -> Option<NonZeroUsize> {
        let mut points = series.points().iter().enumerate();
        let (_, first) = points.next()?;
        let first_day = first.date.day_key();

        let mut boundary: Option<(usize, chrono::NaiveDate)> = None;
        for (position, point) in points {
            let day = point.date.day_key();
            match boundary {
                None if day != first_day => boundary = Some((position, day)),
                Some((start, current)) if day != current => {
                    return NonZeroUsize::new(position - start);
                }
                _ => {}
            }
        }
        None
    }

    /// Convert a window configured in days into a window in positions.
    ///
    /// Unknown density counts as one point per day; the result is never zero.
    pub fn window_positions(days: f64, density: Option<NonZeroUsize>) -> usize {
        let per_day = density.map_or(1, NonZeroUsize::get) as f64;
        let positions = (days * per_day).round();
        if positions.is_finite() && positions >= 1.0 {
            positions as usize
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_density_degrades_to_one_point_per_day() {
        assert_eq!(DensityEstimator::window_positions(13.0, None), 13);
        assert_eq!(DensityEstimator::window_positions(0.2, None), 1);
        assert_eq!(DensityEstimator::window_positions(f64::NAN, None), 1);
    }

    #[test]
    fn window_scales_with_density() {
        let density = NonZeroUsize::new(26);
        assert_eq!(DensityEstimator::window_positions(1.0, density), 26);
        assert_eq!(DensityEstimator::window_positions(0.5, density), 13);
    }
}
