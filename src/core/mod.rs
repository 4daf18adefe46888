//! Core data structures for the sandbox
//! Contains block types, placed blocks and chunk coordinates.

pub mod block;
pub mod chunk;

// Re-export commonly used types
pub use block::{Block, BlockType};
pub use chunk::ChunkCoord;
