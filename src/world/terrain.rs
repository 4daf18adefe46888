use glam::{IVec3, Vec3};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::constants::*;
use crate::core::block::{Block, BlockType};
use crate::core::chunk::ChunkCoord;
use crate::error::{SandboxError, SandboxResult};
use crate::world::generator::ChunkGenerator;

/// Result of casting a ray into the world.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PickHit {
    pub position: IVec3,
    pub block_type: BlockType,
    /// Last empty cell the ray crossed before the hit.
    pub previous: IVec3,
}

/// Authoritative world state: which chunks exist and which blocks are placed.
pub struct World {
    blocks: FxHashMap<IVec3, BlockType>,
    generated: FxHashSet<ChunkCoord>,
    generator: ChunkGenerator,
    generation_radius: i32,
}

impl World {
    pub fn new(generator: ChunkGenerator) -> Self {
        World {
            blocks: FxHashMap::default(),
            generated: FxHashSet::default(),
            generator,
            generation_radius: GENERATION_RADIUS,
        }
    }

    pub fn with_generation_radius(mut self, radius: i32) -> SandboxResult<Self> {
        if !(0..=MAX_GENERATION_RADIUS).contains(&radius) {
            return Err(SandboxError::invalid(format!(
                "generation radius must be in 0..={}, got {}",
                MAX_GENERATION_RADIUS, radius
            )));
        }
        self.generation_radius = radius;
        Ok(self)
    }

    pub fn generator(&self) -> &ChunkGenerator {
        &self.generator
    }

    pub fn generation_radius(&self) -> i32 {
        self.generation_radius
    }

    /// Generate every chunk around `center` that does not exist yet and
    /// return the blocks created by this call.
    pub fn ensure_chunks_near(&mut self, center: ChunkCoord) -> SandboxResult<Vec<Block>> {
        let mut created = Vec::new();
        for coord in center.neighborhood(self.generation_radius) {
            created.extend(self.ensure_chunk_generated(coord)?);
        }
        Ok(created)
    }

    /// Same as [`World::ensure_chunks_near`] for a world-space position.
    pub fn ensure_chunks_near_position(&mut self, position: Vec3) -> SandboxResult<Vec<Block>> {
        self.ensure_chunks_near(ChunkCoord::containing(position)?)
    }

    pub fn ensure_chunk_generated(&mut self, coord: ChunkCoord) -> SandboxResult<Vec<Block>> {
        if self.generated.contains(&coord) {
            return Ok(Vec::new());
        }
        let blocks = self.generator.generate_chunk(coord)?;
        Ok(self.commit_chunk(coord, blocks))
    }

    /// Store a generated chunk unless one was committed first.
    ///
    /// Returns the blocks actually added. Cells already holding a block keep
    /// it, and a second commit of the same coordinate adds nothing.
    pub fn commit_chunk(&mut self, coord: ChunkCoord, blocks: Vec<Block>) -> Vec<Block> {
        if !self.generated.insert(coord) {
            return Vec::new();
        }
        blocks
            .into_iter()
            .filter(|block| self.insert_block(*block))
            .collect()
    }

    pub fn is_generated(&self, coord: ChunkCoord) -> bool {
        self.generated.contains(&coord)
    }

    pub fn generated_chunks(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.generated.iter().copied()
    }

    pub fn block_at(&self, position: IVec3) -> Option<BlockType> {
        self.blocks.get(&position).copied()
    }

    pub fn is_solid(&self, position: IVec3) -> bool {
        self.blocks.contains_key(&position)
    }

    /// Insert a block into an empty cell. Returns false if the cell is taken.
    pub fn insert_block(&mut self, block: Block) -> bool {
        if self.blocks.contains_key(&block.position) {
            return false;
        }
        self.blocks.insert(block.position, block.block_type);
        true
    }

    pub fn remove_block(&mut self, position: IVec3) -> Option<Block> {
        self.blocks
            .remove(&position)
            .map(|block_type| Block::new(position, block_type))
    }

    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        self.blocks
            .iter()
            .map(|(&position, &block_type)| Block::new(position, block_type))
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// March a ray through the grid and return the first occupied cell.
    pub fn pick(&self, origin: Vec3, direction: Vec3, max_dist: f32) -> Option<PickHit> {
        if !origin.is_finite() || !direction.is_finite() || !max_dist.is_finite() {
            return None;
        }
        let dir = direction.try_normalize()?;
        let mut pos = origin;
        let mut prev = pos.floor().as_ivec3();

        if let Some(block_type) = self.block_at(prev) {
            return Some(PickHit {
                position: prev,
                block_type,
                previous: prev,
            });
        }

        for _ in 0..(max_dist / PICK_STEP) as i32 {
            pos += dir * PICK_STEP;
            let current = pos.floor().as_ivec3();
            if current != prev {
                if let Some(block_type) = self.block_at(current) {
                    return Some(PickHit {
                        position: current,
                        block_type,
                        previous: prev,
                    });
                }
                prev = current;
            }
        }
        None
    }
}
