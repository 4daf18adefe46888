//! Break and place edits
//!
//! Glue between pick results / place intents and the world + inventory.
//! The world is the source of truth for what exists; the inventory only
//! moves counts.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::block::Block;
use crate::error::{SandboxError, SandboxResult};
use crate::player::input::InputState;
use crate::player::inventory::Inventory;
use crate::world::terrain::{PickHit, World};

/// Where a place request puts the block.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum PlacementMode {
    /// The empty cell the pick ray crossed just before its hit, or the
    /// player position when nothing is hit.
    #[default]
    InFrontOfHit,
    /// Always the player position, snapped down to the grid.
    AtPlayer,
}

impl PlacementMode {
    pub fn target(&self, hit: Option<PickHit>, player_position: Vec3) -> Vec3 {
        match (self, hit) {
            (PlacementMode::InFrontOfHit, Some(hit)) => hit.previous.as_vec3() + Vec3::splat(0.5),
            _ => player_position,
        }
    }
}

/// What a frame's edits changed.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FrameEdits {
    pub broken: Option<Block>,
    pub placed: Option<Block>,
}

impl FrameEdits {
    pub fn is_empty(&self) -> bool {
        self.broken.is_none() && self.placed.is_none()
    }
}

/// Remove the picked block and collect it.
///
/// The block keeps the type stored in the world, so a player-placed block is
/// collected as what it is rather than what its layer would generate.
pub fn break_block(
    world: &mut World,
    inventory: &mut Inventory,
    hit: Option<PickHit>,
) -> SandboxResult<Option<Block>> {
    let Some(hit) = hit else {
        return Ok(None);
    };
    let Some(block_type) = world.block_at(hit.position) else {
        return Ok(None);
    };
    // Validate the slot before touching the world
    inventory.collect(block_type)?;
    Ok(world.remove_block(hit.position))
}

/// Place the selected block at `position`, snapped to the grid.
/// Occupied cells are left alone and the count is not spent.
pub fn place_block(
    world: &mut World,
    inventory: &mut Inventory,
    position: Vec3,
) -> SandboxResult<Option<Block>> {
    if position.is_finite() && world.is_solid(position.floor().as_ivec3()) {
        return Ok(None);
    }
    let Some(block) = inventory.place_selected(position)? else {
        return Ok(None);
    };
    world.insert_block(block);
    Ok(Some(block))
}

/// Run one frame of edits: break while the pointer is held, then place if
/// requested. A failing break does not prevent the place.
pub fn apply_frame(
    world: &mut World,
    inventory: &mut Inventory,
    input: &mut InputState,
    hit: Option<PickHit>,
    place_position: Vec3,
) -> (FrameEdits, Vec<SandboxError>) {
    let mut edits = FrameEdits::default();
    let mut errors = Vec::new();

    if input.breaking {
        match break_block(world, inventory, hit) {
            Ok(broken) => edits.broken = broken,
            Err(err) => errors.push(err),
        }
    }

    if input.take_place_request() {
        match place_block(world, inventory, place_position) {
            Ok(placed) => edits.placed = placed,
            Err(err) => errors.push(err),
        }
    }

    (edits, errors)
}
