//! Background chunk generation with worker threads
//!
//! Workers generate chunks off the frame thread and commit them straight
//! into the shared world. The commit is a check-and-set under the world's
//! write lock, so a chunk requested twice (or generated inline meanwhile) is
//! still only stored once. Uses crossbeam channels for inter-thread
//! communication.

use std::thread;

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};
use rustc_hash::FxHashSet;

use crate::SharedWorld;
use crate::constants::*;
use crate::core::block::Block;
use crate::core::chunk::ChunkCoord;
use crate::error::SandboxResult;
use crate::world::generator::ChunkGenerator;

/// Request for chunk generation. Requests are served in the order sent.
#[derive(Clone, Copy, Debug)]
pub struct ChunkGenRequest {
    pub coord: ChunkCoord,
}

/// Result of background chunk generation
pub struct ChunkGenResult {
    pub coord: ChunkCoord,
    /// Blocks this worker added; empty if the chunk already existed.
    pub outcome: SandboxResult<Vec<Block>>,
}

/// Manages background chunk generation with worker threads
pub struct ChunkLoader {
    request_tx: Sender<ChunkGenRequest>,
    result_rx: Receiver<ChunkGenResult>,
    pending: FxHashSet<ChunkCoord>,
    worker_count: usize,
}

impl ChunkLoader {
    /// Create a ChunkLoader with a specific number of workers
    pub fn with_worker_count(
        num_workers: usize,
        generator: ChunkGenerator,
        world: SharedWorld,
    ) -> SandboxResult<Self> {
        let num_workers = num_workers.max(1);
        // Bounded channels prevent unbounded memory growth
        let (request_tx, request_rx) = bounded::<ChunkGenRequest>(REQUEST_QUEUE_CAPACITY);
        let (result_tx, result_rx) = bounded::<ChunkGenResult>(RESULT_QUEUE_CAPACITY);

        for worker_id in 0..num_workers {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            let generator = generator.clone();
            let world = world.clone();

            thread::Builder::new()
                .name(format!("chunk-gen-{}", worker_id))
                .spawn(move || {
                    while let Ok(req) = rx.recv() {
                        let outcome = generate_and_commit(&generator, &world, req.coord);
                        if tx
                            .send(ChunkGenResult {
                                coord: req.coord,
                                outcome,
                            })
                            .is_err()
                        {
                            // Receiver dropped, loader is gone
                            break;
                        }
                    }
                })?;
        }

        tracing::info!(workers = num_workers, "Chunk loader started");

        Ok(ChunkLoader {
            request_tx,
            result_rx,
            pending: FxHashSet::default(),
            worker_count: num_workers,
        })
    }

    /// Request a chunk to be generated.
    /// Returns false if the request was dropped because the queue is full.
    pub fn request_chunk(&mut self, coord: ChunkCoord) -> bool {
        if self.pending.contains(&coord) {
            return true; // Already requested
        }

        // Non-blocking send - if the queue is full, skip this request for now
        if self
            .request_tx
            .try_send(ChunkGenRequest { coord })
            .is_err()
        {
            return false;
        }
        self.pending.insert(coord);
        true
    }

    /// Request multiple chunks, lowest priority value (distance squared) first
    pub fn request_chunks(&mut self, requests: &[(ChunkCoord, i32)]) -> usize {
        let mut sorted: Vec<_> = requests
            .iter()
            .filter(|(coord, _)| !self.pending.contains(coord))
            .copied()
            .collect();
        sorted.sort_by_key(|&(_, priority)| priority);

        let mut sent = 0;
        for (coord, _) in sorted {
            if !self.request_chunk(coord) {
                break;
            }
            sent += 1;
        }
        sent
    }

    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.pending.contains(&coord)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Poll for completed chunks (non-blocking)
    pub fn poll_results(&mut self, max_results: usize) -> Vec<ChunkGenResult> {
        let mut results = Vec::with_capacity(max_results);

        for _ in 0..max_results {
            match self.result_rx.try_recv() {
                Ok(result) => {
                    self.pending.remove(&result.coord);
                    results.push(result);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        results
    }

    /// Block until one result arrives; used when the caller has nothing else to do
    pub fn wait_result(&mut self) -> Option<ChunkGenResult> {
        if self.pending.is_empty() {
            return None;
        }
        let result = self.result_rx.recv().ok()?;
        self.pending.remove(&result.coord);
        Some(result)
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }
}

fn generate_and_commit(
    generator: &ChunkGenerator,
    world: &SharedWorld,
    coord: ChunkCoord,
) -> SandboxResult<Vec<Block>> {
    if world.read().is_generated(coord) {
        return Ok(Vec::new());
    }
    let blocks = generator.generate_chunk(coord)?;
    Ok(world.write().commit_chunk(coord, blocks))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::RwLock;

    use super::*;
    use crate::world::generator::{ColumnSampling, GeneratorConfig};
    use crate::world::terrain::World;

    fn setup(workers: usize) -> (SharedWorld, ChunkLoader) {
        let config = GeneratorConfig {
            sampling: ColumnSampling::ChunkOrigin,
            ..GeneratorConfig::default()
        };
        let generator = ChunkGenerator::with_noise(|_: f32, _: f32| 0.5_f32, config).unwrap();
        let world = Arc::new(RwLock::new(World::new(generator.clone())));
        let loader = ChunkLoader::with_worker_count(workers, generator, world.clone()).unwrap();
        (world, loader)
    }

    fn drain(loader: &mut ChunkLoader) -> Vec<ChunkGenResult> {
        let mut results = Vec::new();
        while let Some(result) = loader.wait_result() {
            results.push(result);
        }
        results
    }

    #[test]
    fn test_background_generation_commits_chunks() {
        let (world, mut loader) = setup(2);
        let requests: Vec<_> = ChunkCoord::new(0, 0)
            .neighborhood(1)
            .map(|coord| (coord, coord.distance_squared(ChunkCoord::new(0, 0))))
            .collect();
        assert_eq!(loader.request_chunks(&requests), 9);

        let results = drain(&mut loader);
        assert_eq!(results.len(), 9);
        let created: usize = results
            .iter()
            .map(|result| result.outcome.as_ref().unwrap().len())
            .sum();
        assert_eq!(created, 9 * 6);
        assert_eq!(world.read().block_count(), 9 * 6);
        assert_eq!(loader.pending_count(), 0);
    }

    #[test]
    fn test_requests_are_sent_nearest_first() {
        let (_world, mut loader) = setup(1);
        let requests = [
            (ChunkCoord::new(3, 0), 9),
            (ChunkCoord::new(1, 0), 1),
            (ChunkCoord::new(2, 0), 4),
        ];
        assert_eq!(loader.request_chunks(&requests), 3);

        // A single worker serves requests in the order they were sent
        let order: Vec<_> = drain(&mut loader).iter().map(|result| result.coord.x).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_duplicate_requests_are_deduplicated() {
        let (_world, mut loader) = setup(1);
        let coord = ChunkCoord::new(3, 3);
        assert!(loader.request_chunk(coord));
        assert!(loader.request_chunk(coord));
        assert!(loader.is_pending(coord));
        assert_eq!(drain(&mut loader).len(), 1);
    }

    #[test]
    fn test_generate_once_across_loader_and_inline() {
        let (world, mut loader) = setup(4);
        let coord = ChunkCoord::new(-2, 1);

        let inline = world.write().ensure_chunk_generated(coord).unwrap();
        assert_eq!(inline.len(), 6);

        loader.request_chunk(coord);
        let results = drain(&mut loader);
        assert_eq!(results.len(), 1);
        assert!(results[0].outcome.as_ref().unwrap().is_empty());
        assert_eq!(world.read().block_count(), 6);
    }

    #[test]
    fn test_many_workers_race_on_same_chunks() {
        let config = GeneratorConfig::default();
        let generator = ChunkGenerator::with_noise(|_: f32, _: f32| 0.25_f32, config).unwrap();
        let world: SharedWorld = Arc::new(RwLock::new(World::new(generator.clone())));
        let mut loaders: Vec<_> = (0..3)
            .map(|_| ChunkLoader::with_worker_count(2, generator.clone(), world.clone()).unwrap())
            .collect();

        let coords: Vec<_> = ChunkCoord::new(0, 0).neighborhood(1).collect();
        for loader in &mut loaders {
            for coord in &coords {
                loader.request_chunk(*coord);
            }
        }

        let mut created = 0;
        for loader in &mut loaders {
            for result in drain(loader) {
                created += result.outcome.unwrap().len();
            }
        }
        // floor(0.25 * 10) = 2 -> three layers per column
        let expected = 9 * (CHUNK_SIZE * CHUNK_SIZE) as usize * 3;
        assert_eq!(created, expected);
        assert_eq!(world.read().block_count(), expected);
    }
}
