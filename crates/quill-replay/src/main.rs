use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};

use quill_engine::config::EngineConfig;
use quill_engine::coords::Viewport;
use quill_engine::engine::{replay, Engine, ReplayStats};
use quill_engine::host::RecordingListener;
use quill_engine::input::stream::PlaybackStream;
use quill_engine::logging::{init_logging, LoggingConfig};
use quill_engine::realtime::modifiers::LineModifierKind;
use quill_engine::render::{GpuInit, MemoryMeshBackend, MeshBackend};
use quill_engine::time::FakeClock;

#[derive(Parser, Debug)]
#[command(name = "quill-replay", about = "Replays a recorded input stream through the ink engine")]
struct Cli {
    /// Playback stream (JSON).
    input: PathBuf,

    /// Upload meshes to a headless GPU device instead of keeping them in memory.
    #[arg(long)]
    gpu: bool,

    /// With --gpu, accept only a software adapter.
    #[arg(long, requires = "gpu")]
    fallback_adapter: bool,

    /// Frames per second of input time.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    #[arg(long, value_enum, default_value_t = Brush::Ballpoint)]
    brush: Brush,

    /// `env_logger` filter, e.g. "quill_engine=debug".
    #[arg(long, env = "QUILL_LOG")]
    log_filter: Option<String>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Brush {
    Solid,
    Ballpoint,
    Highlighter,
}

impl From<Brush> for LineModifierKind {
    fn from(b: Brush) -> Self {
        match b {
            Brush::Solid => LineModifierKind::Solid,
            Brush::Ballpoint => LineModifierKind::Ballpoint,
            Brush::Highlighter => LineModifierKind::Highlighter,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = EngineConfig {
        logging: LoggingConfig {
            env_filter: cli.log_filter.clone(),
            ..Default::default()
        },
        line_modifier: cli.brush.into(),
        ..Default::default()
    };
    init_logging(config.logging.clone());
    ensure!(cli.fps > 0.0 && cli.fps.is_finite(), "--fps must be positive");

    let json = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let stream = PlaybackStream::from_json(&json)
        .with_context(|| format!("invalid playback stream in {}", cli.input.display()))?;

    let stats = if cli.gpu {
        let gpu = quill_engine::render::Gpu::new_headless_blocking(GpuInit {
            force_fallback_adapter: cli.fallback_adapter,
            ..Default::default()
        })?;
        log::info!("replaying on {}", gpu.adapter_info().name);
        run(gpu.mesh_backend(), config, &stream, cli.fps)?
    } else {
        run(MemoryMeshBackend::new(), config, &stream, cli.fps)?
    };

    println!(
        "{}: {} inputs ({} accepted), {} frames, {} elements, {} draw items",
        cli.input.display(),
        stats.inputs,
        stats.accepted,
        stats.frames,
        stats.elements,
        stats.draw_items
    );
    Ok(())
}

fn run<B: MeshBackend>(backend: B, config: EngineConfig, stream: &PlaybackStream, fps: f64) -> Result<ReplayStats> {
    let screen = stream.initial_camera;
    let clock = Rc::new(FakeClock::new(0.0));

    let mut engine = Engine::new(
        config,
        backend,
        Viewport::from_pixels(screen.width, screen.height),
        screen.ppi,
        clock.clone(),
    );
    let listener = Rc::new(RecordingListener::new());
    engine.add_listener(listener.clone());

    let inputs = stream.input_stream.to_inputs();
    let stats = replay(&mut engine, &clock, &inputs, 1.0 / fps)?;

    for event in listener.tool_events() {
        log::debug!("tool event: {event:?}");
    }
    log::info!(
        "{} strokes committed, {} meshes resident",
        listener.tool_events().len(),
        engine.resources().len()
    );
    Ok(stats)
}
