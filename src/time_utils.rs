use crate::domain::market_data::{CalendarDate, Granularity};

/// Label of a date tick for the given range.
///
/// - `Month` -> two-digit day, `05`
/// - `Year` -> short month name, `Sep`
/// - `TenYears` -> four-digit year, `2019`
pub fn format_tick_label(date: CalendarDate, granularity: Granularity) -> String {
    let format = match granularity {
        Granularity::Month => "%d",
        Granularity::Year => "%b",
        Granularity::TenYears => "%Y",
    };
    date.value().format(format).to_string()
}

/// Text for an arbitrary axis position (cursor readout, default axis labels).
///
/// Intraday ranges show the time of day, daily ranges the full date.
pub fn format_axis_value(date: CalendarDate, granularity: Granularity) -> String {
    let format = match granularity {
        Granularity::Month => "%-d %b %H:%M",
        Granularity::Year | Granularity::TenYears => "%-d %B %Y",
    };
    date.value().format(format).to_string()
}
