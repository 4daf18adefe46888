// Core module with fundamental types
pub mod core;

// Player module with inventory and input
pub mod player;

// World module with generation and terrain
pub mod world;

// Renderer and inventory display seams
pub mod render;

// Other modules
pub mod constants;
pub mod edit;
pub mod error;
pub mod session;
pub mod settings;

// Re-exports
pub use constants::*;
pub use core::{Block, BlockType, ChunkCoord};
pub use edit::{FrameEdits, PlacementMode, apply_frame, break_block, place_block};
pub use error::{SandboxError, SandboxResult};
pub use player::{InputEvent, InputState, Inventory, InventorySnapshot};
pub use render::{CameraView, InventoryDisplay, LogInventoryDisplay, LogRenderer, Renderer};
pub use session::{FrameReport, PlayerView, Session};
pub use settings::{SandboxSettings, default_settings_path, load_settings, save_settings};
pub use world::{
    ChunkGenResult, ChunkGenerator, ChunkLoader, ColumnSampling, GeneratorConfig, NoiseSource,
    PickHit, SharedWorld, SimplexNoise, World,
};
