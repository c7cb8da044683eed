use hecs::{Entity, World};

pub mod components;

use components::{AxesComponent, PaneComponent, SeriesSetComponent, TickComponent};

/// ECS world backing the headless chart scene.
#[derive(Default)]
pub struct EcsWorld {
    pub world: World,
}

impl EcsWorld {
    /// Create a new empty ECS world.
    pub fn new() -> Self {
        Self { world: World::new() }
    }

    /// Spawn a pane entity with empty axes and no series.
    pub fn spawn_pane(&mut self, pane: PaneComponent) -> Entity {
        self.world.spawn((pane, AxesComponent::default(), SeriesSetComponent::default()))
    }

    pub fn spawn_tick(&mut self, tick: TickComponent) -> Entity {
        self.world.spawn((tick,))
    }

    pub fn tick_count(&self) -> usize {
        self.world.query::<&TickComponent>().iter().count()
    }
}
