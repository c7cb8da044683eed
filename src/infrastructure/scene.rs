//! Headless rendering surface.
//!
//! Keeps every pane, series and tick as ECS entities and exports the whole
//! scene as one JSON frame for a JavaScript renderer to draw.

use crate::domain::chart::{
    AxisInterval, AxisKind, AxisNotification, PaneId, PaneKind, RenderSurface, SeriesData, Tick, TickHandle,
};
use crate::domain::errors::{ChartError, ChartResult};
use crate::ecs::EcsWorld;
use crate::ecs::components::{AxesComponent, NamedSeries, PaneComponent, SeriesSetComponent, TickComponent};
use hecs::Entity;
use serde::Serialize;

/// Serializable view of one pane
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaneSnapshot {
    #[serde(flatten)]
    pub pane: PaneComponent,
    pub x: AxisInterval,
    pub y: AxisInterval,
    pub series: Vec<NamedSeries>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
}

/// Serializable view of the whole scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneFrame {
    pub frame: u64,
    pub panes: Vec<PaneSnapshot>,
}

#[derive(Default)]
pub struct SceneSurface {
    ecs: EcsWorld,
    panes: Vec<Entity>,
    notifications: Vec<AxisNotification>,
    batch_depth: u32,
    frame: u64,
}

impl SceneSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn pane_entity(&self, pane: PaneId) -> ChartResult<Entity> {
        self.panes.get(pane.index()).copied().ok_or(ChartError::UnknownPane(pane.index()))
    }

    fn axes(&self, pane: PaneId) -> ChartResult<AxesComponent> {
        let entity = self.pane_entity(pane)?;
        self.ecs
            .world
            .get::<&AxesComponent>(entity)
            .map(|axes| *axes)
            .map_err(|_| ChartError::UnknownPane(pane.index()))
    }

    fn update_axes(&mut self, pane: PaneId, update: impl FnOnce(&mut AxesComponent)) -> ChartResult<()> {
        let entity = self.pane_entity(pane)?;
        {
            let mut axes = self
                .ecs
                .world
                .get::<&mut AxesComponent>(entity)
                .map_err(|_| ChartError::UnknownPane(pane.index()))?;
            update(&mut axes);
        }
        self.touch();
        Ok(())
    }

    /// A change outside a batch is a frame of its own.
    fn touch(&mut self) {
        if self.batch_depth == 0 {
            self.frame += 1;
        }
    }

    /// Number of frames a renderer would have drawn so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    pub fn pane_kind(&self, pane: PaneId) -> Option<PaneKind> {
        let entity = self.pane_entity(pane).ok()?;
        self.ecs.world.get::<&PaneComponent>(entity).ok().map(|p| p.kind)
    }

    pub fn title(&self, pane: PaneId) -> Option<String> {
        let entity = self.pane_entity(pane).ok()?;
        self.ecs.world.get::<&PaneComponent>(entity).ok().map(|p| p.title.clone())
    }

    pub fn series(&self, pane: PaneId, name: &str) -> Option<NamedSeries> {
        let entity = self.pane_entity(pane).ok()?;
        let set = self.ecs.world.get::<&SeriesSetComponent>(entity).ok()?;
        (*set).get(name).cloned()
    }

    /// Ticks on one axis of a pane, ordered by position.
    pub fn ticks(&self, pane: PaneId, axis: AxisKind) -> Vec<Tick> {
        let mut ticks: Vec<Tick> = self
            .ecs
            .world
            .query::<&TickComponent>()
            .iter()
            .filter(|(_, t)| t.pane == pane && t.axis == axis)
            .map(|(_, t)| t.tick.clone())
            .collect();
        ticks.sort_by(|a, b| a.position.total_cmp(&b.position));
        ticks
    }

    pub fn tick_count(&self) -> usize {
        self.ecs.tick_count()
    }

    pub fn pending_notifications(&self) -> usize {
        self.notifications.len()
    }

    pub fn snapshot(&self) -> SceneFrame {
        let panes = self
            .panes
            .iter()
            .enumerate()
            .filter_map(|(index, &entity)| {
                let id = PaneId::from(index);
                let pane = PaneComponent::clone(&*self.ecs.world.get::<&PaneComponent>(entity).ok()?);
                let axes = *self.ecs.world.get::<&AxesComponent>(entity).ok()?;
                let series = self.ecs.world.get::<&SeriesSetComponent>(entity).ok()?.0.clone();
                Some(PaneSnapshot {
                    pane,
                    x: axes.x,
                    y: axes.y,
                    series,
                    x_ticks: self.ticks(id, AxisKind::X),
                    y_ticks: self.ticks(id, AxisKind::Y),
                })
            })
            .collect();
        SceneFrame { frame: self.frame, panes }
    }

    pub fn frame_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }
}

impl RenderSurface for SceneSurface {
    fn create_pane(&mut self, kind: PaneKind, vertical_spans: u32) -> PaneId {
        let id = PaneId::from(self.panes.len());
        let entity = self.ecs.spawn_pane(PaneComponent { id, kind, vertical_spans, title: String::new() });
        self.panes.push(entity);
        self.touch();
        id
    }

    fn panes(&self) -> Vec<PaneId> {
        (0..self.panes.len()).map(PaneId::from).collect()
    }

    fn x_interval(&self, pane: PaneId) -> ChartResult<AxisInterval> {
        Ok(self.axes(pane)?.x)
    }

    fn set_x_interval(&mut self, pane: PaneId, interval: AxisInterval) -> ChartResult<()> {
        self.update_axes(pane, |axes| axes.x = interval)?;
        self.notifications.push(AxisNotification { pane, interval });
        Ok(())
    }

    fn y_interval(&self, pane: PaneId) -> ChartResult<AxisInterval> {
        Ok(self.axes(pane)?.y)
    }

    fn set_y_interval(&mut self, pane: PaneId, interval: AxisInterval) -> ChartResult<()> {
        self.update_axes(pane, |axes| axes.y = interval)
    }

    fn fit(&mut self, pane: PaneId, axis: AxisKind) -> ChartResult<()> {
        let entity = self.pane_entity(pane)?;
        let extent = {
            let set = self
                .ecs
                .world
                .get::<&SeriesSetComponent>(entity)
                .map_err(|_| ChartError::UnknownPane(pane.index()))?;
            let extents = set.0.iter().filter_map(|series| match axis {
                AxisKind::X => series.data.x_extent(),
                AxisKind::Y => series.data.y_extent(),
            });
            AxisInterval::enclosing(extents.flat_map(|e| [e.start, e.end]))
        };

        match (axis, extent) {
            (AxisKind::X, Some(interval)) => self.set_x_interval(pane, interval),
            (AxisKind::Y, Some(interval)) => self.set_y_interval(pane, interval),
            (_, None) => Ok(()),
        }
    }

    fn replace_series(&mut self, pane: PaneId, name: &str, data: SeriesData) -> ChartResult<()> {
        let entity = self.pane_entity(pane)?;
        {
            let mut set = self
                .ecs
                .world
                .get::<&mut SeriesSetComponent>(entity)
                .map_err(|_| ChartError::UnknownPane(pane.index()))?;
            set.replace(name, data);
        }
        self.touch();
        Ok(())
    }

    fn set_series_label(&mut self, pane: PaneId, name: &str, label: &str) -> ChartResult<()> {
        let entity = self.pane_entity(pane)?;
        {
            let mut set = self
                .ecs
                .world
                .get::<&mut SeriesSetComponent>(entity)
                .map_err(|_| ChartError::UnknownPane(pane.index()))?;
            if let Some(series) = set.0.iter_mut().find(|series| series.name == name) {
                series.label = label.to_string();
            }
        }
        self.touch();
        Ok(())
    }

    fn add_tick(&mut self, pane: PaneId, axis: AxisKind, tick: Tick) -> ChartResult<TickHandle> {
        self.pane_entity(pane)?;
        let entity = self.ecs.spawn_tick(TickComponent { pane, axis, tick });
        self.touch();
        Ok(TickHandle::from(entity.to_bits().get()))
    }

    fn remove_tick(&mut self, handle: TickHandle) -> ChartResult<()> {
        let entity = Entity::from_bits(handle.bits()).ok_or(ChartError::UnknownTick)?;
        if self.ecs.world.get::<&TickComponent>(entity).is_err() {
            return Err(ChartError::UnknownTick);
        }
        self.ecs.world.despawn(entity).map_err(|_| ChartError::UnknownTick)?;
        self.touch();
        Ok(())
    }

    fn set_title(&mut self, pane: PaneId, title: &str) -> ChartResult<()> {
        let entity = self.pane_entity(pane)?;
        {
            let mut component = self
                .ecs
                .world
                .get::<&mut PaneComponent>(entity)
                .map_err(|_| ChartError::UnknownPane(pane.index()))?;
            component.title = title.to_string();
        }
        self.touch();
        Ok(())
    }

    fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    fn commit_batch(&mut self) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            self.frame += 1;
        }
    }

    fn take_notifications(&mut self) -> Vec<AxisNotification> {
        std::mem::take(&mut self.notifications)
    }
}
