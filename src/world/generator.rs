//! Height-map chunk generation
//!
//! Generation is a pure function of the chunk coordinate and the noise
//! source, so the same generator can run on the main thread or be cloned
//! into background workers.

use std::sync::Arc;

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::core::block::{Block, BlockType};
use crate::core::chunk::ChunkCoord;
use crate::error::{SandboxError, SandboxResult};
use crate::world::noise::{NoiseSource, SimplexNoise};

/// Where noise is sampled inside a chunk.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum ColumnSampling {
    /// One height per world column, filling the whole 16x16 footprint.
    #[default]
    PerColumn,
    /// One height sampled at the chunk origin, emitting a single column there.
    ChunkOrigin,
}

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub chunk_height: i32,
    pub noise_scale: f32,
    #[serde(default)]
    pub sampling: ColumnSampling,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            chunk_height: CHUNK_HEIGHT,
            noise_scale: NOISE_SCALE,
            sampling: ColumnSampling::PerColumn,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> SandboxResult<()> {
        if !(1..=WORLD_HEIGHT).contains(&self.chunk_height) {
            return Err(SandboxError::invalid(format!(
                "chunk height must be in 1..={}, got {}",
                WORLD_HEIGHT, self.chunk_height
            )));
        }
        if !self.noise_scale.is_finite() || self.noise_scale <= 0.0 {
            return Err(SandboxError::invalid(format!(
                "noise scale must be finite and positive, got {}",
                self.noise_scale
            )));
        }
        Ok(())
    }
}

/// Chunk generator with a shared noise source
#[derive(Clone)]
pub struct ChunkGenerator {
    noise: Arc<dyn NoiseSource>,
    config: GeneratorConfig,
}

impl ChunkGenerator {
    /// Create a generator backed by seeded simplex noise
    pub fn new(seed: u32, config: GeneratorConfig) -> SandboxResult<Self> {
        Self::with_noise(SimplexNoise::new(seed), config)
    }

    /// Create a generator with any noise source (mocks included)
    pub fn with_noise<N>(noise: N, config: GeneratorConfig) -> SandboxResult<Self>
    where
        N: NoiseSource + 'static,
    {
        config.validate()?;
        Ok(ChunkGenerator {
            noise: Arc::new(noise),
            config,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Terrain height of a world column: the highest layer that gets a block.
    /// Negative heights leave the column empty.
    pub fn column_height(&self, world_x: i32, world_z: i32) -> SandboxResult<i32> {
        let scale = self.config.noise_scale;
        let sample = self
            .noise
            .noise_2d(world_x as f32 * scale, world_z as f32 * scale);
        if !sample.is_finite() {
            return Err(SandboxError::invalid(format!(
                "noise produced {} at column ({}, {})",
                sample, world_x, world_z
            )));
        }
        Ok((sample * self.config.chunk_height as f32).floor() as i32)
    }

    /// Generate every block of a chunk
    pub fn generate_chunk(&self, coord: ChunkCoord) -> SandboxResult<Vec<Block>> {
        let (base_x, base_z) = coord.origin()?;
        let mut blocks = Vec::new();

        match self.config.sampling {
            ColumnSampling::PerColumn => {
                for lx in 0..CHUNK_SIZE {
                    for lz in 0..CHUNK_SIZE {
                        self.push_column(&mut blocks, base_x + lx, base_z + lz)?;
                    }
                }
            }
            ColumnSampling::ChunkOrigin => self.push_column(&mut blocks, base_x, base_z)?,
        }

        tracing::debug!(
            cx = coord.x,
            cz = coord.z,
            blocks = blocks.len(),
            "Generated chunk"
        );
        Ok(blocks)
    }

    fn push_column(&self, blocks: &mut Vec<Block>, world_x: i32, world_z: i32) -> SandboxResult<()> {
        let height = self.column_height(world_x, world_z)?;
        // Negative heights give an empty range
        let top = height.min(self.config.chunk_height - 1);
        for y in 0..=top {
            blocks.push(Block::new(
                IVec3::new(world_x, y, world_z),
                BlockType::for_layer(y),
            ));
        }
        Ok(())
    }
}
