use thiserror::Error;

/// Failures while turning a raw keyed series into an indexed one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("series is empty")]
    Empty,
    #[error("invalid date key '{key}' at position {position}")]
    InvalidDate { key: String, position: usize },
    #[error("date key '{key}' at position {position} is not after its predecessor")]
    NotChronological { key: String, position: usize },
}

/// Anything that can go wrong between asking for data and receiving it.
///
/// Cloneable because one in-flight fetch result is shared by every caller
/// waiting on the same cache entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("HTTP error: {0}")]
    Status(u16),
    #[error("data provider error: {0}")]
    Api(String),
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("no data returned for {0}")]
    Empty(String),
    #[error("request superseded")]
    Aborted,
}

/// Errors raised by a rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("unknown pane #{0}")]
    UnknownPane(usize),
    #[error("unknown tick")]
    UnknownTick,
    #[error("no panes configured")]
    NoPanes,
}

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("DOM element not found: {0}")]
    MissingAnchor(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Series(#[from] SeriesError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Chart(#[from] ChartError),
}

pub type FetchResult<T> = Result<T, FetchError>;
pub type ChartResult<T> = Result<T, ChartError>;
pub type AppResult<T> = Result<T, AppError>;
