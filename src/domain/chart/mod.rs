//! Chart aggregate: panes, axes, ticks and the surface contract.

pub mod axis_sync;
pub mod surface;
pub mod tick_planner;
pub mod value_objects;

pub use axis_sync::*;
pub use surface::*;
pub use tick_planner::*;
pub use value_objects::*;
