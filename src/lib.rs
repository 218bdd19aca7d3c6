//! Terrain-adaptive courtyard house planner
//!
//! Re-exports modules for use by binaries and tools.

pub mod backend;
pub mod config;
pub mod error;
pub mod heightmap;
pub mod plan;
pub mod seeds;
pub mod site_plot;
pub mod structures;
pub mod tilemap;

pub use config::PlannerConfig;
pub use error::{BackendError, PlanError};
pub use heightmap::{BuildArea, ElevationGrid};
pub use plan::StructurePlan;
pub use seeds::PlanSeeds;
pub use structures::{plan_structure, PlannedStructure};
