//! Seams to the external renderer and inventory display
//!
//! The sandbox never draws anything itself. A host engine implements these
//! traits and receives the changes to the block map plus inventory
//! snapshots. The logging implementations are used by the headless binary.

use glam::{IVec3, Vec3};

use crate::core::block::Block;
use crate::player::inventory::InventorySnapshot;

/// Camera placement for the frame being rendered.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CameraView {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraView {
    pub fn look_direction(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }
}

pub trait Renderer {
    /// Create meshes for newly existing blocks.
    fn add_blocks(&mut self, blocks: &[Block]);
    fn remove_block(&mut self, position: IVec3);
    fn render_frame(&mut self, camera: &CameraView);
}

pub trait InventoryDisplay {
    fn show(&mut self, snapshot: &InventorySnapshot);
}

/// Renderer that only keeps counters and logs through `tracing`.
#[derive(Default, Debug)]
pub struct LogRenderer {
    pub meshes: usize,
    pub frames: u64,
}

impl Renderer for LogRenderer {
    fn add_blocks(&mut self, blocks: &[Block]) {
        if blocks.is_empty() {
            return;
        }
        self.meshes += blocks.len();
        tracing::debug!(added = blocks.len(), total = self.meshes, "Meshes created");
    }

    fn remove_block(&mut self, position: IVec3) {
        self.meshes = self.meshes.saturating_sub(1);
        tracing::debug!(?position, total = self.meshes, "Mesh removed");
    }

    fn render_frame(&mut self, camera: &CameraView) {
        self.frames += 1;
        tracing::trace!(frame = self.frames, eye = ?camera.eye, "Frame rendered");
    }
}

#[derive(Default, Debug)]
pub struct LogInventoryDisplay {
    pub last: Option<InventorySnapshot>,
}

impl InventoryDisplay for LogInventoryDisplay {
    fn show(&mut self, snapshot: &InventorySnapshot) {
        let line = snapshot
            .counts
            .iter()
            .map(|(block, count)| format!("{}: {}", block, count))
            .collect::<Vec<_>>()
            .join(", ");
        tracing::info!(selected = %snapshot.selected, "Inventory [{}]", line);
        self.last = Some(snapshot.clone());
    }
}
