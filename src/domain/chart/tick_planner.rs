use super::{AxisKind, PaneId, RenderSurface, Tick, TickHandle};
use crate::domain::errors::ChartResult;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{CalendarDate, Granularity, IndexedSeries};
use crate::log_debug;
use crate::time_utils::format_tick_label;

/// Calendar field whose change marks a tick boundary for a granularity.
fn boundary_key(date: CalendarDate, granularity: Granularity) -> (i32, u32, u32) {
    match granularity {
        Granularity::Month => (date.year(), date.month(), date.day()),
        Granularity::Year => (date.year(), date.month(), 0),
        Granularity::TenYears => (date.year(), 0, 0),
    }
}

/// Plans date ticks for the shared time axis and owns the ticks it installed.
#[derive(Debug, Default)]
pub struct TickPlanner {
    installed: Vec<TickHandle>,
}

impl TickPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// One tick at the first position of every day, month or year.
    ///
    /// Depends only on its inputs. The first and last positions of the
    /// series carry no gridline.
    pub fn plan(series: &IndexedSeries, granularity: Granularity) -> Vec<Tick> {
        let last = series.last_position();
        let mut ticks = Vec::new();
        let mut previous = None;

        for (position, point) in series.points().iter().enumerate() {
            let key = boundary_key(point.date, granularity);
            if previous != Some(key) {
                let at_edge = position == 0 || Some(position) == last;
                ticks.push(Tick::new(
                    position as f64,
                    format_tick_label(point.date, granularity),
                    !at_edge,
                ));
                previous = Some(key);
            }
        }
        ticks
    }

    /// Replace whatever this planner installed before with `ticks`.
    pub fn install<S: RenderSurface>(&mut self, surface: &mut S, pane: PaneId, ticks: Vec<Tick>) -> ChartResult<usize> {
        self.clear(surface)?;
        for tick in ticks {
            let handle = surface.add_tick(pane, AxisKind::X, tick)?;
            self.installed.push(handle);
        }
        log_debug!(
            LogComponent::Domain("TickPlanner"),
            "installed {} ticks on {}",
            self.installed.len(),
            pane
        );
        Ok(self.installed.len())
    }

    /// Remove every installed tick.
    pub fn clear<S: RenderSurface>(&mut self, surface: &mut S) -> ChartResult<()> {
        for handle in self.installed.drain(..) {
            surface.remove_tick(handle)?;
        }
        Ok(())
    }

    pub fn installed_count(&self) -> usize {
        self.installed.len()
    }
}
