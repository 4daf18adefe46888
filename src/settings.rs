use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::core::block::BlockType;
use crate::core::chunk::ChunkCoord;
use crate::edit::PlacementMode;
use crate::error::{SandboxError, SandboxResult};
use crate::world::generator::GeneratorConfig;

pub const SETTINGS_FILE: &str = "settings.bin";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct SandboxSettings {
    pub world: WorldSettings,
    pub player: PlayerSettings,
    pub loader: LoaderSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorldSettings {
    /// `None` picks a random seed at startup.
    pub seed: Option<u32>,
    pub generator: GeneratorConfig,
    pub generation_radius: i32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            seed: Some(DEFAULT_SEED),
            generator: GeneratorConfig::default(),
            generation_radius: GENERATION_RADIUS,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlayerSettings {
    pub position: Vec3,
    pub eye_offset: Vec3,
    pub reach: f32,
    pub slots: Vec<BlockType>,
    pub placement: PlacementMode,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            eye_offset: Vec3::from(PLAYER_EYE_OFFSET),
            reach: PICK_DISTANCE,
            slots: BlockType::ALL.to_vec(),
            placement: PlacementMode::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct LoaderSettings {
    /// Background generation workers; 0 generates inline on the frame thread.
    pub workers: usize,
}

impl SandboxSettings {
    pub fn validate(&self) -> SandboxResult<()> {
        self.world.generator.validate()?;
        if !(0..=MAX_GENERATION_RADIUS).contains(&self.world.generation_radius) {
            return Err(SandboxError::invalid(format!(
                "generation radius must be in 0..={}",
                MAX_GENERATION_RADIUS
            )));
        }
        if !self.player.position.is_finite() || !self.player.eye_offset.is_finite() {
            return Err(SandboxError::invalid("player position must be finite"));
        }
        // Rejects positions past the world border
        ChunkCoord::containing(self.player.position)?;
        if !self.player.reach.is_finite() || self.player.reach <= 0.0 {
            return Err(SandboxError::invalid(format!(
                "reach must be finite and positive, got {}",
                self.player.reach
            )));
        }
        if self.player.slots.is_empty() {
            return Err(SandboxError::invalid("inventory needs at least one slot"));
        }
        Ok(())
    }
}

/// Per-user settings location, e.g. `~/.config/voxelbox/settings.bin`.
pub fn default_settings_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "voxelbox")
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}

pub fn save_settings(path: &Path, settings: &SandboxSettings) -> SandboxResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, settings)?;
    Ok(())
}

pub fn load_settings(path: &Path) -> SandboxResult<SandboxSettings> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let settings: SandboxSettings = bincode::deserialize_from(&mut reader)?;
    settings.validate()?;
    Ok(settings)
}
