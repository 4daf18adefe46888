//! Voxel sandbox, headless
//!
//! Drives a session for a fixed number of frames with a scripted player:
//! hold the pointer to dig, then select a block and place it back.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use voxelbox::{
    ASYNC_WORKER_COUNT, BlockType, ColumnSampling, InputEvent, LogInventoryDisplay, LogRenderer,
    PlacementMode, SandboxResult, SandboxSettings, Session, default_settings_path, load_settings,
};

/// Headless voxel sandbox
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World seed (random when neither this nor the settings file sets one)
    #[arg(long)]
    seed: Option<u32>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Settings file (defaults to the per-user config location if present)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Background generation workers, 0 picks from the CPU count
    #[arg(long)]
    workers: Option<usize>,

    /// Sample noise once per chunk at the chunk origin
    #[arg(long, default_value_t = false)]
    legacy_sampling: bool,

    /// Place blocks at the player position instead of in front of the pick
    #[arg(long, default_value_t = false)]
    place_at_player: bool,

    /// Frames to hold the pointer down for at the start
    #[arg(long, default_value_t = 3)]
    break_frames: u64,

    /// Place requests issued after digging stops
    #[arg(long, default_value_t = 1)]
    place_count: u64,

    /// Block to select before placing (grass, dirt, stone)
    #[arg(long)]
    select: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "Sandbox failed");
            ExitCode::FAILURE
        }
    }
}

fn resolve_settings(args: &Args) -> SandboxResult<SandboxSettings> {
    let mut settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => match default_settings_path().filter(|path| path.exists()) {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading user settings");
                load_settings(&path)?
            }
            None => SandboxSettings::default(),
        },
    };

    if let Some(seed) = args.seed {
        settings.world.seed = Some(seed);
    }
    if args.legacy_sampling {
        settings.world.generator.sampling = ColumnSampling::ChunkOrigin;
    }
    if args.place_at_player {
        settings.player.placement = PlacementMode::AtPlayer;
    }
    if let Some(workers) = args.workers {
        settings.loader.workers = match workers {
            0 => num_cpus::get().min(ASYNC_WORKER_COUNT),
            n => n,
        };
    }
    Ok(settings)
}

fn run(args: Args) -> SandboxResult<()> {
    let settings = resolve_settings(&args)?;
    let seed = settings.world.seed.unwrap_or_else(rand::random::<u32>);
    let selected = args
        .select
        .as_deref()
        .map(str::parse::<BlockType>)
        .transpose()?;

    let mut session = Session::new(
        &settings,
        seed,
        LogRenderer::default(),
        LogInventoryDisplay::default(),
    )?;

    let place_start = args.break_frames + 1;
    let mut errors = 0;
    for frame in 1..=args.frames {
        if frame == 1 && args.break_frames > 0 {
            session.handle_input(InputEvent::PointerDown);
        }
        if frame == place_start {
            session.handle_input(InputEvent::PointerUp);
            if let Some(block_type) = selected {
                session.select_block(block_type)?;
            }
        }
        if frame >= place_start && frame < place_start + args.place_count {
            session.handle_input(InputEvent::PlacePressed);
        }

        let report = session.tick();
        errors += report.errors;
        if let Some(broken) = report.edits.broken {
            tracing::info!(frame, position = ?broken.position, block = %broken.block_type, "Broke block");
        }
        if let Some(placed) = report.edits.placed {
            tracing::info!(frame, position = ?placed.position, block = %placed.block_type, "Placed block");
        }
    }

    let world = session.world().read();
    tracing::info!(
        seed,
        frames = session.frame(),
        blocks = world.block_count(),
        chunks = world.generated_chunks().count(),
        meshes = session.renderer().meshes,
        pending = session.pending_chunks(),
        errors,
        "Sandbox finished"
    );
    Ok(())
}
