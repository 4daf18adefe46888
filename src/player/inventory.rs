//! Block inventory held by the player
//!
//! One counter per block type slot plus the block type selected for
//! placing. Counts are unsigned and placing with an empty slot is a no-op.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::block::{Block, BlockType};
use crate::error::{SandboxError, SandboxResult};

/// Read-only view handed to the inventory display after every change.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub counts: BTreeMap<BlockType, u32>,
    pub selected: BlockType,
}

impl InventorySnapshot {
    pub fn count(&self, block_type: BlockType) -> u32 {
        self.counts.get(&block_type).copied().unwrap_or(0)
    }
}

#[derive(Clone, Debug)]
pub struct Inventory {
    counts: BTreeMap<BlockType, u32>,
    selected: BlockType,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// Inventory with a slot for every block type, all empty, Grass selected
    pub fn new() -> Self {
        Self {
            counts: BlockType::ALL.into_iter().map(|block| (block, 0)).collect(),
            selected: BlockType::Grass,
        }
    }

    /// Inventory restricted to the given slots. The first slot is selected.
    pub fn with_slots(slots: &[BlockType]) -> SandboxResult<Self> {
        let first = slots
            .first()
            .copied()
            .ok_or_else(|| SandboxError::invalid("inventory needs at least one slot"))?;
        Ok(Self {
            counts: slots.iter().map(|&block| (block, 0)).collect(),
            selected: first,
        })
    }

    pub fn has_slot(&self, block_type: BlockType) -> bool {
        self.counts.contains_key(&block_type)
    }

    pub fn count(&self, block_type: BlockType) -> u32 {
        self.counts.get(&block_type).copied().unwrap_or(0)
    }

    pub fn selected(&self) -> BlockType {
        self.selected
    }

    fn slot_mut(&mut self, block_type: BlockType) -> SandboxResult<&mut u32> {
        self.counts
            .get_mut(&block_type)
            .ok_or_else(|| SandboxError::invalid(format!("no inventory slot for {}", block_type)))
    }

    /// Add one block to its slot and return the new count.
    pub fn collect(&mut self, block_type: BlockType) -> SandboxResult<u32> {
        let slot = self.slot_mut(block_type)?;
        *slot = slot.saturating_add(1);
        Ok(*slot)
    }

    pub fn collect_named(&mut self, name: &str) -> SandboxResult<u32> {
        self.collect(name.parse()?)
    }

    /// Take one block out of the slot and return it snapped to the grid at
    /// `position`. Returns `Ok(None)` when the slot is empty.
    pub fn place(&mut self, block_type: BlockType, position: Vec3) -> SandboxResult<Option<Block>> {
        if !position.is_finite() {
            return Err(SandboxError::invalid(format!(
                "non-finite placement position {:?}",
                position
            )));
        }
        let slot = self.slot_mut(block_type)?;
        if *slot == 0 {
            return Ok(None);
        }
        *slot -= 1;
        Ok(Some(Block::new(position.floor().as_ivec3(), block_type)))
    }

    pub fn place_selected(&mut self, position: Vec3) -> SandboxResult<Option<Block>> {
        self.place(self.selected, position)
    }

    pub fn select_block(&mut self, block_type: BlockType) -> SandboxResult<()> {
        if !self.has_slot(block_type) {
            return Err(SandboxError::invalid(format!(
                "cannot select {}, no inventory slot",
                block_type
            )));
        }
        self.selected = block_type;
        Ok(())
    }

    pub fn select_named(&mut self, name: &str) -> SandboxResult<()> {
        self.select_block(name.parse()?)
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            counts: self.counts.clone(),
            selected: self.selected,
        }
    }
}
