use crate::domain::errors::FetchError;
use crate::domain::market_data::{Granularity, RawSeries, Symbol};
use futures::future::LocalBoxFuture;

/// Future returned by every data source call. Owns everything it needs.
pub type FetchFuture = LocalBoxFuture<'static, Result<RawSeries, FetchError>>;

/// Source of raw OHLCV history.
///
/// Implementations return series in chronological order. Any error means
/// "no data" to callers.
pub trait DataSource {
    /// Daily history covering the given range (`Year` or `TenYears`).
    fn fetch_daily(&self, symbol: &Symbol, range: Granularity) -> FetchFuture;

    /// Intraday bars for roughly the last month.
    fn fetch_intraday(&self, symbol: &Symbol) -> FetchFuture;
}

/// Shown to the user whenever a search yields no data.
pub fn data_not_found_message(symbol: &str) -> String {
    format!(
        "Data for '{symbol}' not found. May be that:\n\
         1) Search symbol is not valid stock label.\n\
         2) Requested stock data is not available from data provider.\n\
         3) Data subscription limit has been reached for this day.\n"
    )
}
