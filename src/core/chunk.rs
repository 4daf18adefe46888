use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{SandboxError, SandboxResult};

/// Position of a chunk on the `CHUNK_SIZE` grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing a world-space position. Only x and z matter.
    pub fn containing(position: Vec3) -> SandboxResult<Self> {
        if !position.is_finite() {
            return Err(SandboxError::invalid(format!(
                "non-finite world position {:?}",
                position
            )));
        }
        if position.x.abs() > WORLD_BORDER || position.z.abs() > WORLD_BORDER {
            return Err(SandboxError::invalid(format!(
                "world position {:?} is outside the world border",
                position
            )));
        }
        Ok(Self {
            x: (position.x / CHUNK_SIZE as f32).floor() as i32,
            z: (position.z / CHUNK_SIZE as f32).floor() as i32,
        })
    }

    /// World-space column of the chunk's minimum corner.
    pub fn origin(&self) -> SandboxResult<(i32, i32)> {
        match (self.x.checked_mul(CHUNK_SIZE), self.z.checked_mul(CHUNK_SIZE)) {
            (Some(x), Some(z)) => Ok((x, z)),
            _ => Err(SandboxError::invalid(format!(
                "chunk ({}, {}) has no world origin",
                self.x, self.z
            ))),
        }
    }

    /// All coordinates within `radius` chunks on both axes, x-major.
    /// Clipped at the edges of the `i32` range.
    pub fn neighborhood(self, radius: i32) -> impl Iterator<Item = ChunkCoord> {
        let (cx, cz) = (self.x, self.z);
        (cx.saturating_sub(radius)..=cx.saturating_add(radius)).flat_map(move |x| {
            (cz.saturating_sub(radius)..=cz.saturating_add(radius)).map(move |z| ChunkCoord::new(x, z))
        })
    }

    pub fn distance_squared(&self, other: ChunkCoord) -> i32 {
        let dx = self.x.saturating_sub(other.x);
        let dz = self.z.saturating_sub(other.z);
        dx.saturating_mul(dx).saturating_add(dz.saturating_mul(dz))
    }
}
