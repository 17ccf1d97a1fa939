//! Data model, configuration and input-side passes for turning CAD floor plan
//! linework into walls, rooms and openings.

pub mod building;
pub mod collect;
pub mod config;
pub mod error;
pub mod geom;
pub mod material;
pub mod model;
pub mod normalize;
pub mod report;
pub mod units;

pub use config::BuildConfig;
pub use error::{BuildError, BuildResult};
