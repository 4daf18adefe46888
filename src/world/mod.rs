//! World generation and management modules
//! Contains noise sources, chunk generation, loading, and world state.

use std::sync::Arc;

pub mod generator;
pub mod loader;
pub mod noise;
pub mod terrain;

// Re-export commonly used types
pub use generator::{ChunkGenerator, ColumnSampling, GeneratorConfig};
pub use loader::{ChunkGenResult, ChunkLoader};
pub use noise::{NoiseSource, SimplexNoise};
pub use terrain::{PickHit, World};

/// World handle shared between the frame thread and chunk workers.
pub type SharedWorld = Arc<parking_lot::RwLock<World>>;
