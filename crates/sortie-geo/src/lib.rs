//! Geometry for SORTIE.
//!
//! Area-of-influence projection, polygon erosion, broad-phase spatial
//! indexing, and the water-region predicate.

pub use sortie_core as core;

pub mod index;
pub mod projection;
pub mod shrink;
pub mod water;

// Re-export key types for convenience.
pub use index::SpatialIndex;
pub use projection::{project, AzimuthalProjection};
pub use shrink::{erode, shrink};
pub use water::{NoWater, WaterBodies, WaterSource};
