use crate::domain::chart::{AxisInterval, AxisKind, PaneId, PaneKind, SeriesData, Tick};
use serde::Serialize;

/// ECS component describing one chart pane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaneComponent {
    pub id: PaneId,
    pub kind: PaneKind,
    pub vertical_spans: u32,
    pub title: String,
}

/// ECS component for the visible window of both pane axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AxesComponent {
    pub x: AxisInterval,
    pub y: AxisInterval,
}

/// One named series stored on a pane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries {
    pub name: String,
    pub label: String,
    pub data: SeriesData,
}

/// ECS component holding every series of a pane, in insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SeriesSetComponent(pub Vec<NamedSeries>);

impl SeriesSetComponent {
    pub fn get(&self, name: &str) -> Option<&NamedSeries> {
        self.0.iter().find(|series| series.name == name)
    }

    pub fn replace(&mut self, name: &str, data: SeriesData) {
        match self.0.iter_mut().find(|series| series.name == name) {
            Some(existing) => existing.data = data,
            None => self.0.push(NamedSeries { name: name.to_string(), label: name.to_string(), data }),
        }
    }
}

/// ECS component for a custom axis tick. Lives on its own entity.
#[derive(Debug, Clone, PartialEq)]
pub struct TickComponent {
    pub pane: PaneId,
    pub axis: AxisKind,
    pub tick: Tick,
}
