pub use super::value_objects::{CalendarDate, Granularity, OHLCV, Price, Volume};
use crate::domain::errors::SeriesError;
use serde::{Deserialize, Serialize};

/// Numeric fields exactly as delivered by the data provider.
///
/// Accepts both plain field names and the numbered Alpha Vantage ones.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawOhlcv {
    #[serde(alias = "1. open")]
    pub open: String,
    #[serde(alias = "2. high")]
    pub high: String,
    #[serde(alias = "3. low")]
    pub low: String,
    #[serde(alias = "4. close")]
    pub close: String,
    #[serde(alias = "5. volume", alias = "6. volume")]
    pub volume: String,
}

impl RawOhlcv {
    pub fn new(open: &str, high: &str, low: &str, close: &str, volume: &str) -> Self {
        Self {
            open: open.to_string(),
            high: high.to_string(),
            low: low.to_string(),
            close: close.to_string(),
            volume: volume.to_string(),
        }
    }

    /// Parse every field; anything unparsable becomes NaN and is left for the caller.
    pub fn to_ohlcv(&self) -> OHLCV {
        OHLCV::new(
            Price::from(parse_number(&self.open)),
            Price::from(parse_number(&self.high)),
            Price::from(parse_number(&self.low)),
            Price::from(parse_number(&self.close)),
            Volume::from(parse_number(&self.volume)),
        )
    }
}

fn parse_number(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Date-keyed series in provider order (oldest first).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSeries {
    entries: Vec<(String, RawOhlcv)>,
}

impl RawSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, values: RawOhlcv) {
        self.entries.push((key.into(), values));
    }

    pub fn entries(&self) -> &[(String, RawOhlcv)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only entries whose key is accepted by `keep`, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|(key, _)| keep(key));
    }

    pub fn reverse(&mut self) {
        self.entries.reverse();
    }
}

impl FromIterator<(String, RawOhlcv)> for RawSeries {
    fn from_iter<I: IntoIterator<Item = (String, RawOhlcv)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

/// Domain entity - one period of market data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: CalendarDate,
    pub ohlcv: OHLCV,
}

impl TimeSeriesPoint {
    pub fn new(date: CalendarDate, ohlcv: OHLCV) -> Self {
        Self { date, ohlcv }
    }
}

/// Domain entity - dense, zero-based view over a date-keyed series.
///
/// Position `i` is the X coordinate every pane plots the `i`-th point at, so
/// this is the one place that answers "what date is this X".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndexedSeries {
    points: Vec<TimeSeriesPoint>,
}

impl IndexedSeries {
    /// Assign positions in raw order. Dates must be strictly increasing.
    pub fn build(raw: &RawSeries) -> Result<Self, SeriesError> {
        let mut points: Vec<TimeSeriesPoint> = Vec::with_capacity(raw.len());

        for (position, (key, values)) in raw.entries().iter().enumerate() {
            let date = CalendarDate::parse(key)
                .ok_or_else(|| SeriesError::InvalidDate { key: key.clone(), position })?;

            if let Some(previous) = points.last()
                && previous.date >= date
            {
                return Err(SeriesError::NotChronological { key: key.clone(), position });
            }

            points.push(TimeSeriesPoint::new(date, values.to_ohlcv()));
        }

        Ok(Self { points })
    }

    /// Date at a position, `None` outside `0..len`.
    pub fn date_of(&self, index: usize) -> Option<CalendarDate> {
        self.points.get(index).map(|p| p.date)
    }

    /// Date under a fractional axis coordinate, rounded to the nearest position.
    pub fn date_at(&self, x: f64) -> Option<CalendarDate> {
        if !x.is_finite() {
            return None;
        }
        let rounded = x.round();
        if rounded < 0.0 {
            return None;
        }
        self.date_of(rounded as usize)
    }

    /// Reverse lookup, exact match only.
    pub fn position_of(&self, date: CalendarDate) -> Option<usize> {
        self.points.binary_search_by(|p| p.date.cmp(&date)).ok()
    }

    /// Cursor / axis value text for a coordinate; empty when out of range.
    pub fn format_position(&self, x: f64, granularity: Granularity) -> String {
        self.date_at(x)
            .map(|date| crate::time_utils::format_axis_value(date, granularity))
            .unwrap_or_default()
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&TimeSeriesPoint> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last valid position, `None` for an empty series
    pub fn last_position(&self) -> Option<usize> {
        self.points.len().checked_sub(1)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.ohlcv.close.value()).collect()
    }
}
