// World constants
pub const CHUNK_SIZE: i32 = 16;
pub const CHUNK_HEIGHT: i32 = 10;
pub const NOISE_SCALE: f32 = 0.1;
pub const GENERATION_RADIUS: i32 = 1;
pub const MAX_GENERATION_RADIUS: i32 = 32;
pub const WORLD_HEIGHT: i32 = 256;
// Horizontal world border, in blocks from the origin
pub const WORLD_BORDER: f32 = 30_000_000.0;
pub const DEFAULT_SEED: u32 = 2137;

// Player constants
pub const PLAYER_EYE_OFFSET: [f32; 3] = [0.0, 5.0, 10.0];
pub const PICK_DISTANCE: f32 = 64.0;
pub const PICK_STEP: f32 = 0.1;

// Optimization constants
pub const MAX_CHUNKS_PER_FRAME: usize = 4;
pub const ASYNC_WORKER_COUNT: usize = 4;
pub const REQUEST_QUEUE_CAPACITY: usize = 256;
pub const RESULT_QUEUE_CAPACITY: usize = 64;
// Frames to wait before requesting a failed chunk again
pub const CHUNK_RETRY_FRAMES: u64 = 60;
