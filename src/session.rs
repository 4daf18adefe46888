//! Per-frame driver
//!
//! A [`Session`] owns the world, the inventory and the stationary player and
//! is ticked once per frame by the host. Every step runs to completion; an
//! error in one step is logged and the frame carries on.

use std::sync::Arc;

use glam::Vec3;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::constants::*;
use crate::core::block::{Block, BlockType};
use crate::core::chunk::ChunkCoord;
use crate::edit::{self, FrameEdits, PlacementMode};
use crate::error::SandboxResult;
use crate::player::input::{InputEvent, InputState};
use crate::player::inventory::Inventory;
use crate::render::{CameraView, InventoryDisplay, Renderer};
use crate::settings::SandboxSettings;
use crate::world::generator::ChunkGenerator;
use crate::world::loader::ChunkLoader;
use crate::world::terrain::World;
use crate::world::{PickHit, SharedWorld};

/// Stationary player with a camera looking at it.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PlayerView {
    pub position: Vec3,
    pub eye_offset: Vec3,
    pub reach: f32,
    pub placement: PlacementMode,
}

impl Default for PlayerView {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            eye_offset: Vec3::from(PLAYER_EYE_OFFSET),
            reach: PICK_DISTANCE,
            placement: PlacementMode::default(),
        }
    }
}

impl PlayerView {
    pub fn camera(&self) -> CameraView {
        CameraView {
            eye: self.position + self.eye_offset,
            target: self.position,
        }
    }
}

enum Generation {
    Inline,
    Background(ChunkLoader),
}

/// Summary of one tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameReport {
    pub frame: u64,
    pub blocks_created: usize,
    pub hit: Option<PickHit>,
    pub edits: FrameEdits,
    pub errors: usize,
}

pub struct Session<R: Renderer, D: InventoryDisplay> {
    world: SharedWorld,
    inventory: Inventory,
    player: PlayerView,
    input: InputState,
    generation: Generation,
    /// Chunks that failed to generate, with the frame they may be retried on.
    retry_at: FxHashMap<ChunkCoord, u64>,
    renderer: R,
    display: D,
    frame: u64,
}

impl<R: Renderer, D: InventoryDisplay> Session<R, D> {
    /// Build a session from settings, using seeded simplex noise.
    pub fn new(settings: &SandboxSettings, seed: u32, renderer: R, display: D) -> SandboxResult<Self> {
        settings.validate()?;
        let generator = ChunkGenerator::new(seed, settings.world.generator)?;
        let world = World::new(generator).with_generation_radius(settings.world.generation_radius)?;
        let inventory = Inventory::with_slots(&settings.player.slots)?;
        let player = PlayerView {
            position: settings.player.position,
            eye_offset: settings.player.eye_offset,
            reach: settings.player.reach,
            placement: settings.player.placement,
        };

        let session = Self::from_parts(world, inventory, player, renderer, display);
        tracing::info!(seed, "Session created");
        match settings.loader.workers {
            0 => Ok(session),
            workers => session.with_loader(workers),
        }
    }

    pub fn from_parts(
        world: World,
        inventory: Inventory,
        player: PlayerView,
        renderer: R,
        mut display: D,
    ) -> Self {
        display.show(&inventory.snapshot());
        Session {
            world: Arc::new(RwLock::new(world)),
            inventory,
            player,
            input: InputState::default(),
            generation: Generation::Inline,
            retry_at: FxHashMap::default(),
            renderer,
            display,
            frame: 0,
        }
    }

    /// Move chunk generation to background workers.
    pub fn with_loader(mut self, workers: usize) -> SandboxResult<Self> {
        let generator = self.world.read().generator().clone();
        let loader = ChunkLoader::with_worker_count(workers, generator, self.world.clone())?;
        self.generation = Generation::Background(loader);
        Ok(self)
    }

    pub fn world(&self) -> &SharedWorld {
        &self.world
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn player(&self) -> &PlayerView {
        &self.player
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        self.input.handle(event);
    }

    pub fn select_block(&mut self, block_type: BlockType) -> SandboxResult<()> {
        self.inventory.select_block(block_type)?;
        self.display.show(&self.inventory.snapshot());
        Ok(())
    }

    /// Number of chunk requests still being generated in the background.
    pub fn pending_chunks(&self) -> usize {
        match &self.generation {
            Generation::Inline => 0,
            Generation::Background(loader) => loader.pending_count(),
        }
    }

    pub fn tick(&mut self) -> FrameReport {
        self.frame += 1;
        let mut report = FrameReport {
            frame: self.frame,
            ..FrameReport::default()
        };

        match self.update_chunks() {
            Ok((created, failed)) => {
                report.blocks_created = created.len();
                report.errors += failed;
                self.renderer.add_blocks(&created);
            }
            Err(err) => {
                tracing::warn!(frame = self.frame, %err, "Chunk update failed");
                report.errors += 1;
            }
        }

        let camera = self.player.camera();
        let hit = self
            .world
            .read()
            .pick(camera.eye, camera.look_direction(), self.player.reach);
        report.hit = hit;

        let place_position = self.player.placement.target(hit, self.player.position);

        let (edits, errors) = {
            let mut world = self.world.write();
            edit::apply_frame(
                &mut world,
                &mut self.inventory,
                &mut self.input,
                hit,
                place_position,
            )
        };
        for err in &errors {
            tracing::warn!(frame = self.frame, %err, "Edit rejected");
        }
        report.errors += errors.len();
        report.edits = edits;

        if let Some(broken) = edits.broken {
            self.renderer.remove_block(broken.position);
        }
        if let Some(placed) = edits.placed {
            self.renderer.add_blocks(&[placed]);
        }
        if !edits.is_empty() {
            self.display.show(&self.inventory.snapshot());
        }

        self.renderer.render_frame(&camera);
        report
    }

    /// Generate or request the chunks around the player. Returns the blocks
    /// that now exist and the number of chunks that failed this frame.
    fn update_chunks(&mut self) -> SandboxResult<(Vec<Block>, usize)> {
        let center = ChunkCoord::containing(self.player.position)?;
        let frame = self.frame;
        self.retry_at.retain(|_, at| *at > frame);

        let missing: Vec<_> = {
            let world = self.world.read();
            center
                .neighborhood(world.generation_radius())
                .filter(|coord| !world.is_generated(*coord) && !self.retry_at.contains_key(coord))
                .collect()
        };

        let mut created = Vec::new();
        let mut failed = Vec::new();
        match &mut self.generation {
            Generation::Inline => {
                let mut world = self.world.write();
                for coord in missing {
                    match world.ensure_chunk_generated(coord) {
                        Ok(blocks) => created.extend(blocks),
                        Err(err) => failed.push((coord, err)),
                    }
                }
            }
            Generation::Background(loader) => {
                let requests: Vec<_> = missing
                    .into_iter()
                    .filter(|coord| !loader.is_pending(*coord))
                    .map(|coord| (coord, coord.distance_squared(center)))
                    .collect();
                loader.request_chunks(&requests);

                for result in loader.poll_results(MAX_CHUNKS_PER_FRAME) {
                    match result.outcome {
                        Ok(blocks) => created.extend(blocks),
                        Err(err) => failed.push((result.coord, err)),
                    }
                }
            }
        }

        for (coord, err) in &failed {
            tracing::warn!(
                cx = coord.x,
                cz = coord.z,
                %err,
                retry_frame = frame + CHUNK_RETRY_FRAMES,
                "Chunk generation failed"
            );
            self.retry_at.insert(*coord, frame + CHUNK_RETRY_FRAMES);
        }
        Ok((created, failed.len()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use glam::IVec3;

    use super::*;
    use crate::player::inventory::InventorySnapshot;
    use crate::world::generator::{ColumnSampling, GeneratorConfig};

    #[derive(Default)]
    struct RecordingRenderer {
        added: Vec<Block>,
        removed: Vec<IVec3>,
        frames: usize,
    }

    impl Renderer for RecordingRenderer {
        fn add_blocks(&mut self, blocks: &[Block]) {
            self.added.extend_from_slice(blocks);
        }

        fn remove_block(&mut self, position: IVec3) {
            self.removed.push(position);
        }

        fn render_frame(&mut self, _camera: &CameraView) {
            self.frames += 1;
        }
    }

    #[derive(Default)]
    struct RecordingDisplay {
        shown: Vec<InventorySnapshot>,
    }

    impl InventoryDisplay for RecordingDisplay {
        fn show(&mut self, snapshot: &InventorySnapshot) {
            self.shown.push(snapshot.clone());
        }
    }

    fn column_session() -> Session<RecordingRenderer, RecordingDisplay> {
        let config = GeneratorConfig {
            sampling: ColumnSampling::ChunkOrigin,
            ..GeneratorConfig::default()
        };
        let world = World::new(ChunkGenerator::with_noise(|_: f32, _: f32| 0.5_f32, config).unwrap());
        // Camera straight above the origin column
        let player = PlayerView {
            position: Vec3::new(0.5, 0.0, 0.5),
            eye_offset: Vec3::new(0.0, 9.0, 0.0),
            reach: PICK_DISTANCE,
            placement: PlacementMode::InFrontOfHit,
        };
        Session::from_parts(
            world,
            Inventory::new(),
            player,
            RecordingRenderer::default(),
            RecordingDisplay::default(),
        )
    }

    #[test]
    fn test_first_tick_generates_neighborhood_once() {
        let mut session = column_session();
        let first = session.tick();
        assert_eq!(first.blocks_created, 9 * 6);
        assert_eq!(session.renderer().added.len(), 9 * 6);

        let second = session.tick();
        assert_eq!(second.blocks_created, 0);
        assert_eq!(session.renderer().added.len(), 9 * 6);
        assert_eq!(session.renderer().frames, 2);
    }

    #[test]
    fn test_breaking_collects_top_block() {
        let mut session = column_session();
        session.handle_input(InputEvent::PointerDown);

        let report = session.tick();
        assert_eq!(report.edits.broken.unwrap().position, IVec3::new(0, 5, 0));
        assert_eq!(session.inventory().count(BlockType::Stone), 1);

        let report = session.tick();
        assert_eq!(report.edits.broken.unwrap().position, IVec3::new(0, 4, 0));
        session.handle_input(InputEvent::PointerUp);
        assert!(session.tick().edits.is_empty());

        assert_eq!(session.inventory().count(BlockType::Stone), 2);
        assert_eq!(
            session.renderer().removed,
            vec![IVec3::new(0, 5, 0), IVec3::new(0, 4, 0)]
        );
        let last = session.display().shown.last().unwrap();
        assert_eq!(last.count(BlockType::Stone), 2);
    }

    #[test]
    fn test_place_uses_selected_block() {
        let mut session = column_session();
        session.handle_input(InputEvent::PointerDown);
        session.tick();
        session.handle_input(InputEvent::PointerUp);

        // Grass is selected and empty: nothing happens
        session.handle_input(InputEvent::PlacePressed);
        let report = session.tick();
        assert!(report.edits.placed.is_none());
        assert_eq!(report.errors, 0);

        session.select_block(BlockType::Stone).unwrap();
        session.handle_input(InputEvent::PlacePressed);
        let report = session.tick();
        let placed = report.edits.placed.unwrap();
        assert_eq!(placed.position, IVec3::new(0, 5, 0));
        assert_eq!(placed.block_type, BlockType::Stone);
        assert_eq!(session.inventory().count(BlockType::Stone), 0);
        assert_eq!(
            session.world().read().block_at(IVec3::new(0, 5, 0)),
            Some(BlockType::Stone)
        );
    }

    #[test]
    fn test_errors_do_not_stop_the_frame() {
        let mut session = column_session();
        session.player.position = Vec3::new(f32::NAN, 0.0, 0.0);
        let report = session.tick();
        assert!(report.errors >= 1);
        assert_eq!(session.renderer().frames, 1);
    }

    #[test]
    fn test_far_position_is_reported_not_fatal() {
        let mut session = column_session();
        session.player.position = Vec3::new(3.0e9, 0.0, 0.0);
        let report = session.tick();
        assert!(report.errors >= 1);
        assert_eq!(session.world().read().generated_chunks().count(), 0);
        assert_eq!(session.renderer().frames, 1);
    }

    #[test]
    fn test_place_at_player_snaps_down() {
        let mut session = column_session();
        session.player.placement = PlacementMode::AtPlayer;
        session.player.position = Vec3::new(3.7, 2.6, 4.2);
        session.tick();

        session.select_block(BlockType::Dirt).unwrap();
        session.inventory.collect(BlockType::Dirt).unwrap();
        session.handle_input(InputEvent::PlacePressed);
        let placed = session.tick().edits.placed.unwrap();
        assert_eq!(placed.position, IVec3::new(3, 2, 4));
        assert_eq!(placed.block_type, BlockType::Dirt);
    }

    fn broken_noise_session() -> Session<RecordingRenderer, RecordingDisplay> {
        let config = GeneratorConfig {
            sampling: ColumnSampling::ChunkOrigin,
            ..GeneratorConfig::default()
        };
        let world =
            World::new(ChunkGenerator::with_noise(|_: f32, _: f32| f32::NAN, config).unwrap());
        Session::from_parts(
            world,
            Inventory::new(),
            PlayerView::default(),
            RecordingRenderer::default(),
            RecordingDisplay::default(),
        )
    }

    #[test]
    fn test_failed_chunks_are_counted_and_retried_later() {
        let mut session = broken_noise_session();
        assert_eq!(session.tick().errors, 9);

        for _ in 1..CHUNK_RETRY_FRAMES {
            assert_eq!(session.tick().errors, 0);
        }
        // Retry frame reached: all nine are attempted again
        let report = session.tick();
        assert_eq!(report.frame, 1 + CHUNK_RETRY_FRAMES);
        assert_eq!(report.errors, 9);
        assert_eq!(session.world().read().generated_chunks().count(), 0);
    }

    #[test]
    fn test_failed_background_chunks_are_counted_once() {
        let mut session = broken_noise_session().with_loader(2).unwrap();
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut errors = 0;
        while errors < 9 && Instant::now() < deadline {
            errors += session.tick().errors;
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(errors, 9);
        assert_eq!(session.pending_chunks(), 0);

        // Backed off: nothing is requested or reported for a while
        for _ in 0..5 {
            assert_eq!(session.tick().errors, 0);
            assert_eq!(session.pending_chunks(), 0);
        }
    }

    #[test]
    fn test_background_generation_reaches_same_world() {
        let mut session = column_session().with_loader(2).unwrap();
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut created = 0;
        loop {
            created += session.tick().blocks_created;
            if created == 9 * 6 || Instant::now() > deadline {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(created, 9 * 6);
        assert_eq!(session.world().read().block_count(), 9 * 6);
        assert_eq!(session.pending_chunks(), 0);
    }

    #[test]
    fn test_new_from_settings() {
        let mut settings = SandboxSettings::default();
        settings.world.generation_radius = 0;
        let mut session = Session::new(
            &settings,
            DEFAULT_SEED,
            RecordingRenderer::default(),
            RecordingDisplay::default(),
        )
        .unwrap();
        session.tick();
        assert!(session.world().read().is_generated(ChunkCoord::new(0, 0)));
        assert_eq!(session.world().read().generated_chunks().count(), 1);
        assert_eq!(session.display().shown.len(), 1);
    }
}
