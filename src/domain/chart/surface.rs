use super::{AxisInterval, AxisKind, PaneId, PaneKind, SeriesData, Tick, TickHandle};
use crate::domain::errors::ChartResult;

/// Raised by a surface whenever a pane's horizontal interval changes,
/// whether the user dragged it or a program wrote it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisNotification {
    pub pane: PaneId,
    pub interval: AxisInterval,
}

/// Everything the engine needs from whatever draws the panes.
///
/// All panes share one logical X coordinate space (indexed positions). The
/// engine makes no assumption about pixels or styling.
pub trait RenderSurface {
    fn create_pane(&mut self, kind: PaneKind, vertical_spans: u32) -> PaneId;

    fn panes(&self) -> Vec<PaneId>;

    fn x_interval(&self, pane: PaneId) -> ChartResult<AxisInterval>;

    /// Writes the interval and queues an [`AxisNotification`], even when the
    /// value is unchanged. Callers compare first.
    fn set_x_interval(&mut self, pane: PaneId, interval: AxisInterval) -> ChartResult<()>;

    fn y_interval(&self, pane: PaneId) -> ChartResult<AxisInterval>;

    fn set_y_interval(&mut self, pane: PaneId, interval: AxisInterval) -> ChartResult<()>;

    /// Fit an axis to the extent of the pane's data. Fitting X notifies like
    /// `set_x_interval`.
    fn fit(&mut self, pane: PaneId, axis: AxisKind) -> ChartResult<()>;

    fn replace_series(&mut self, pane: PaneId, name: &str, data: SeriesData) -> ChartResult<()>;

    /// Display name of a series, independent of the key it was stored under.
    fn set_series_label(&mut self, pane: PaneId, name: &str, label: &str) -> ChartResult<()>;

    fn add_tick(&mut self, pane: PaneId, axis: AxisKind, tick: Tick) -> ChartResult<TickHandle>;

    fn remove_tick(&mut self, handle: TickHandle) -> ChartResult<()>;

    fn set_title(&mut self, pane: PaneId, title: &str) -> ChartResult<()>;

    /// Start collecting changes that must appear together in one frame.
    fn begin_batch(&mut self);

    fn commit_batch(&mut self);

    /// Drain interval-change notifications raised since the last call.
    fn take_notifications(&mut self) -> Vec<AxisNotification>;
}
