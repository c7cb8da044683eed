//! Application configuration: which panes exist, indicator windows and the
//! data provider. Every field has a default so partial JSON is accepted.

use crate::domain::errors::AppError;
use crate::domain::market_data::Granularity;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Presentation theme, selected by the `theme` URL query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Value of the decoded `theme` query parameter; `light` selects the
    /// light theme, anything else is dark.
    pub fn from_param(value: Option<&str>) -> Self {
        value.and_then(|value| value.parse().ok()).unwrap_or_default()
    }
}

/// Indicator window lengths in days, for daily history and intraday data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorWindow {
    pub show: bool,
    pub frame_days: f64,
    pub frame_days_intraday: f64,
}

impl Default for IndicatorWindow {
    fn default() -> Self {
        Self { show: true, frame_days: 13.0, frame_days_intraday: 1.0 }
    }
}

impl IndicatorWindow {
    pub fn days_for(&self, granularity: Granularity) -> f64 {
        match granularity {
            Granularity::Month => self.frame_days_intraday,
            Granularity::Year | Granularity::TenYears => self.frame_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceChartConfig {
    pub show: bool,
    pub vertical_spans: u32,
    pub sma: IndicatorWindow,
    /// Shares the SMA window lengths
    pub ema_show: bool,
    pub bollinger: IndicatorWindow,
}

impl Default for PriceChartConfig {
    fn default() -> Self {
        Self {
            show: true,
            vertical_spans: 3,
            sma: IndicatorWindow::default(),
            ema_show: true,
            bollinger: IndicatorWindow::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeChartConfig {
    pub show: bool,
    pub vertical_spans: u32,
}

impl Default for VolumeChartConfig {
    fn default() -> Self {
        Self { show: true, vertical_spans: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiChartConfig {
    pub show: bool,
    pub vertical_spans: u32,
    pub window: IndicatorWindow,
}

impl Default for RsiChartConfig {
    fn default() -> Self {
        Self { show: true, vertical_spans: 1, window: IndicatorWindow::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceConfig {
    pub api_key: String,
    pub base_url: String,
    pub intraday_interval: String,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            api_key: "demo".to_string(),
            base_url: "https://www.alphavantage.co".to_string(),
            intraday_interval: "15min".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub ohlc: PriceChartConfig,
    pub volume: VolumeChartConfig,
    pub rsi: RsiChartConfig,
    /// Number of symbols whose data is kept in memory
    pub cache_capacity: usize,
    pub data_source: DataSourceConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            ohlc: PriceChartConfig::default(),
            volume: VolumeChartConfig::default(),
            rsi: RsiChartConfig::default(),
            cache_capacity: 16,
            data_source: DataSourceConfig::default(),
        }
    }
}

impl ChartConfig {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let config: Self = serde_json::from_str(json).map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.ohlc.show || self.volume.show || self.rsi.show) {
            return Err(AppError::Config("at least one pane must be shown".to_string()));
        }
        let windows = [
            ("sma", &self.ohlc.sma),
            ("bollinger", &self.ohlc.bollinger),
            ("rsi", &self.rsi.window),
        ];
        for (name, window) in windows {
            if !(window.frame_days > 0.0 && window.frame_days_intraday > 0.0) {
                return Err(AppError::Config(format!("{name} frame lengths must be positive")));
            }
        }
        if self.cache_capacity == 0 {
            return Err(AppError::Config("cache_capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}
