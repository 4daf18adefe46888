//! Player-related modules
//! Contains the block inventory and input state.

pub mod input;
pub mod inventory;

// Re-export commonly used types
pub use input::{InputEvent, InputState};
pub use inventory::{Inventory, InventorySnapshot};
