use std::fmt;
use std::str::FromStr;

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::error::{SandboxError, SandboxResult};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub enum BlockType {
    #[default]
    Grass,
    Dirt,
    Stone,
}

impl BlockType {
    /// Display order used by inventory snapshots.
    pub const ALL: [BlockType; 3] = [BlockType::Grass, BlockType::Dirt, BlockType::Stone];

    /// Block type for a vertical layer of generated terrain.
    pub fn for_layer(y: i32) -> Self {
        match y {
            0 => BlockType::Dirt,
            1 => BlockType::Grass,
            _ => BlockType::Stone,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BlockType::Grass => "grass",
            BlockType::Dirt => "dirt",
            BlockType::Stone => "stone",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockType {
    type Err = SandboxError;

    fn from_str(s: &str) -> SandboxResult<Self> {
        BlockType::ALL
            .into_iter()
            .find(|block| block.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SandboxError::invalid(format!("unknown block type `{}`", s)))
    }
}

/// A placed unit of the world.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Block {
    pub position: IVec3,
    pub block_type: BlockType,
}

impl Block {
    pub fn new(position: IVec3, block_type: BlockType) -> Self {
        Self {
            position,
            block_type,
        }
    }
}
