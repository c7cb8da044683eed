use chrono::{Datelike, NaiveDate, NaiveDateTime};
use derive_more::{Constructor, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Value Object - Price
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, Constructor, Serialize, Deserialize)]
pub struct Price(f64);

impl Price {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

/// Value Object - Volume
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, Constructor, Serialize, Deserialize)]
pub struct Volume(f64);

impl Volume {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - OHLCV
#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct OHLCV {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Volume,
}

impl OHLCV {
    /// Every field parsed to a number (none is NaN)
    pub fn is_finite(&self) -> bool {
        [
            self.open.value(),
            self.high.value(),
            self.low.value(),
            self.close.value(),
            self.volume.value(),
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Value Object - ticker symbol, always upper case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: &str) -> Result<Self, String> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err("Symbol cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.trim().to_uppercase())
    }
}

/// Value Object - a zone-less date/time parsed from a series key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Serialize, Deserialize)]
pub struct CalendarDate(NaiveDateTime);

impl CalendarDate {
    const DATE_TIME_FORMATS: [&'static str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

    /// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]` or `YYYY-MM-DDTHH:MM:SS[offset]`.
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        for format in Self::DATE_TIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(key, format) {
                return Some(Self(dt));
            }
        }
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(key) {
            return Some(Self(dt.naive_local()));
        }
        NaiveDate::parse_from_str(key, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Self)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Self)
    }

    pub fn value(&self) -> NaiveDateTime {
        self.0
    }

    /// Calendar day without the time of day
    pub fn day_key(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }
}

/// Value Object - selected display range
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    #[strum(serialize = "month")]
    Month,
    #[default]
    #[strum(serialize = "year")]
    Year,
    #[strum(serialize = "ten-years")]
    TenYears,
}

impl Granularity {
    /// Intraday data for a month, daily history otherwise
    pub fn fetch_mode(&self) -> FetchMode {
        match self {
            Self::Month => FetchMode::Intraday,
            Self::Year | Self::TenYears => FetchMode::History,
        }
    }

    /// Human label used in the price pane title
    pub fn range_label(&self) -> &'static str {
        match self {
            Self::Month => "1 month",
            Self::Year => "1 year",
            Self::TenYears => "10 years",
        }
    }

    /// Span of daily history kept for this range, in years
    pub fn history_years(&self) -> Option<i32> {
        match self {
            Self::Month => None,
            Self::Year => Some(1),
            Self::TenYears => Some(10),
        }
    }
}

/// Value Object - which endpoint a granularity is served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, AsRefStr)]
pub enum FetchMode {
    #[strum(serialize = "intraday")]
    Intraday,
    #[strum(serialize = "history")]
    History,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_supported_key_formats() {
        let daily = CalendarDate::parse("2019-09-26").unwrap();
        assert_eq!((daily.year(), daily.month(), daily.day()), (2019, 9, 26));

        let intraday = CalendarDate::parse("2019-09-26 16:00:00").unwrap();
        assert_eq!(intraday.day_key(), daily.day_key());
        assert!(intraday > daily);

        assert!(CalendarDate::parse("2019-09-26 09:45").is_some());
        assert!(CalendarDate::parse("2019-09-26T09:45:00Z").is_some());
        assert!(CalendarDate::parse("26/09/2019").is_none());
    }

    #[test]
    fn granularity_round_trips_through_strings() {
        assert_eq!(Granularity::from_str("ten-years").unwrap(), Granularity::TenYears);
        assert_eq!(Granularity::Month.to_string(), "month");
        assert_eq!(Granularity::Month.fetch_mode().to_string(), "intraday");
        assert_eq!(Granularity::TenYears.fetch_mode(), FetchMode::History);
        assert_eq!(Granularity::default(), Granularity::Year);
    }

    #[test]
    fn symbol_is_trimmed_and_upper_cased() {
        assert_eq!(Symbol::new(" aapl ").unwrap().value(), "AAPL");
        assert!(Symbol::new("   ").is_err());
    }
}
