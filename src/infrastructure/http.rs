use crate::config::DataSourceConfig;
use crate::domain::errors::{FetchError, FetchResult};
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::{
    CalendarDate, DataSource, FetchFuture, Granularity, RawOhlcv, RawSeries, Symbol,
};
use chrono::Months;
use futures::FutureExt;
use gloo_net::http::{Request, RequestBuilder};
use serde_json::Value;

/// Payload keys Alpha Vantage uses instead of an HTTP error status
const API_MESSAGE_KEYS: [&str; 3] = ["Error Message", "Note", "Information"];

/// REST client for the Alpha Vantage time series endpoints
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    config: DataSourceConfig,
}

impl AlphaVantageClient {
    pub fn new(config: DataSourceConfig) -> Self {
        Self { config }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/query", self.config.base_url.trim_end_matches('/'))
    }

    /// Query parameters of a daily history request. Both history ranges ask
    /// for the full output; the range is cut locally.
    pub fn daily_params(&self, symbol: &Symbol) -> Vec<(&'static str, String)> {
        self.with_key(vec![
            ("function", "TIME_SERIES_DAILY".to_string()),
            ("symbol", symbol.value().to_string()),
            ("outputsize", "full".to_string()),
        ])
    }

    pub fn intraday_params(&self, symbol: &Symbol) -> Vec<(&'static str, String)> {
        self.with_key(vec![
            ("function", "TIME_SERIES_INTRADAY".to_string()),
            ("symbol", symbol.value().to_string()),
            ("interval", self.config.intraday_interval.clone()),
            ("outputsize", "full".to_string()),
        ])
    }

    fn with_key(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        params.push(("apikey", self.config.api_key.clone()));
        params
    }

    /// GET request with every parameter URL-encoded.
    pub fn request(&self, params: &[(&'static str, String)]) -> RequestBuilder {
        Request::get(&self.endpoint()).query(params.iter().map(|(key, value)| (*key, value.as_str())))
    }

    async fn fetch_series(request: RequestBuilder, function: &'static str, symbol: Symbol) -> FetchResult<RawSeries> {
        get_logger().info(
            LogComponent::Infrastructure("AlphaVantage"),
            &format!("fetching {} for {}", function, symbol),
        );

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("{e:?}")))?;

        if !response.ok() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.text().await.map_err(|e| FetchError::Network(format!("{e:?}")))?;
        let series = parse_time_series(&body, &symbol)?;

        get_logger().info(
            LogComponent::Infrastructure("AlphaVantage"),
            &format!("loaded {} points for {}", series.len(), symbol),
        );
        Ok(series)
    }
}

impl DataSource for AlphaVantageClient {
    fn fetch_daily(&self, symbol: &Symbol, range: Granularity) -> FetchFuture {
        let request = self.request(&self.daily_params(symbol));
        let symbol = symbol.clone();
        async move {
            let mut series = Self::fetch_series(request, "TIME_SERIES_DAILY", symbol).await?;
            if let Some(years) = range.history_years() {
                trim_to_years(&mut series, years);
            }
            Ok(series)
        }
        .boxed_local()
    }

    fn fetch_intraday(&self, symbol: &Symbol) -> FetchFuture {
        let request = self.request(&self.intraday_params(symbol));
        Self::fetch_series(request, "TIME_SERIES_INTRADAY", symbol.clone()).boxed_local()
    }
}

fn find_series_key(json: &Value, starts_with: &str) -> Option<String> {
    json.as_object()
        .and_then(|obj| obj.keys().find(|k| k.starts_with(starts_with)).cloned())
}

/// Parse a time series response body into chronological order.
///
/// Alpha Vantage lists the newest entry first and reports quota or symbol
/// problems as a 200 response carrying a message.
pub fn parse_time_series(body: &str, symbol: &Symbol) -> FetchResult<RawSeries> {
    let json: Value = serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    if let Some(message) = API_MESSAGE_KEYS
        .iter()
        .find_map(|key| json.get(*key).and_then(Value::as_str))
    {
        return Err(FetchError::Api(message.to_string()));
    }

    let series_key = find_series_key(&json, "Time Series")
        .ok_or_else(|| FetchError::Parse("missing time series in response".to_string()))?;
    let entries = json
        .get(&series_key)
        .and_then(Value::as_object)
        .ok_or_else(|| FetchError::Parse("time series missing or invalid".to_string()))?;

    let mut series = entries
        .iter()
        .map(|(key, bar)| {
            serde_json::from_value::<RawOhlcv>(bar.clone())
                .map(|values| (key.clone(), values))
                .map_err(|e| FetchError::Parse(format!("{key}: {e}")))
        })
        .collect::<FetchResult<RawSeries>>()?;

    if series.is_empty() {
        return Err(FetchError::Empty(symbol.to_string()));
    }
    series.reverse();
    Ok(series)
}

/// Keep only entries at most `years` older than the newest one.
pub fn trim_to_years(series: &mut RawSeries, years: i32) {
    let newest = series.entries().last().and_then(|(key, _)| CalendarDate::parse(key));
    let cutoff = newest.and_then(|date| date.value().checked_sub_months(Months::new(12 * years.unsigned_abs())));

    if let Some(cutoff) = cutoff {
        series.retain(|key| CalendarDate::parse(key).is_none_or(|date| date.value() >= cutoff));
    }
}
