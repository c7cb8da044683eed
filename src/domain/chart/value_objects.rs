use derive_more::{Constructor, Display, From, Into};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Value Object - pane identifier issued by a rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into, Serialize, Deserialize)]
#[display(fmt = "pane#{}", _0)]
pub struct PaneId(usize);

impl PaneId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Value Object - what a pane shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, AsRefStr, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaneKind {
    #[display(fmt = "Price")]
    #[strum(serialize = "price")]
    Price,
    #[display(fmt = "Volume")]
    #[strum(serialize = "volume")]
    Volume,
    #[display(fmt = "RSI")]
    #[strum(serialize = "rsi")]
    Rsi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisKind {
    X,
    Y,
}

/// Value Object - visible coordinate window of one axis
#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct AxisInterval {
    pub start: f64,
    pub end: f64,
}

impl Default for AxisInterval {
    fn default() -> Self {
        Self { start: 0.0, end: 10.0 }
    }
}

impl AxisInterval {
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// Smallest interval containing every value; `None` if no value is finite.
    pub fn enclosing(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<Self>, v| match acc {
                None => Some(Self::new(v, v)),
                Some(i) => Some(Self::new(i.start.min(v), i.end.max(v))),
            })
    }
}

/// Value Object - one labeled axis mark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub position: f64,
    pub label: String,
    pub show_gridline: bool,
}

impl Tick {
    pub fn new(position: f64, label: impl Into<String>, show_gridline: bool) -> Self {
        Self { position, label: label.into(), show_gridline }
    }
}

/// Value Object - handle for removing a tick from the surface that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Into)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn bits(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct XY {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct XOhlc {
    pub x: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct XBand {
    pub x: f64,
    pub high: f64,
    pub low: f64,
}

/// Full point set of one named series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "points", rename_all = "lowercase")]
pub enum SeriesData {
    Ohlc(Vec<XOhlc>),
    Line(Vec<XY>),
    Band(Vec<XBand>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            Self::Ohlc(points) => points.len(),
            Self::Line(points) => points.len(),
            Self::Band(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Horizontal extent of the data
    pub fn x_extent(&self) -> Option<AxisInterval> {
        match self {
            Self::Ohlc(points) => AxisInterval::enclosing(points.iter().map(|p| p.x)),
            Self::Line(points) => AxisInterval::enclosing(points.iter().map(|p| p.x)),
            Self::Band(points) => AxisInterval::enclosing(points.iter().map(|p| p.x)),
        }
    }

    /// Vertical extent of the data, ignoring NaN
    pub fn y_extent(&self) -> Option<AxisInterval> {
        match self {
            Self::Ohlc(points) => AxisInterval::enclosing(points.iter().flat_map(|p| [p.high, p.low])),
            Self::Line(points) => AxisInterval::enclosing(points.iter().map(|p| p.y)),
            Self::Band(points) => AxisInterval::enclosing(points.iter().flat_map(|p| [p.high, p.low])),
        }
    }
}
