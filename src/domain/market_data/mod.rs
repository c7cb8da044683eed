//! Market data aggregate containing entities, services and value objects.

pub mod entities;
pub mod indicator_engine;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use repositories::{DataSource, FetchFuture};
pub use services::DensityEstimator;
pub use value_objects::*;
