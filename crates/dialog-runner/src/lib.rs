//! End-to-end pipeline behind the `dialog-runner` binary.

use anyhow::{anyhow, Context, Result};
use dialog_anim::{
    AnimError, AnimationScheduler, CircularLayout, DotLayout, FfmpegEncoder, FrameCompositor,
    FrameRenderer, GraphLayout, ImageRaster, VideoEncoder, WorkerPool,
};
use dialog_flow::{load_config, parse_log_file, InteractionGraphBuilder, SessionRenderer};
use dialog_types::DialogConfig;
use std::fs;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub mod cli;
pub mod shutdown;

pub use cli::{Cli, LayoutKind};

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub messages: usize,
    pub speeches: usize,
    pub frames: usize,
    pub video: Option<PathBuf>,
}

/// Configuration file and environment, then command-line overrides.
pub fn resolve_config(cli: &Cli) -> Result<DialogConfig> {
    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(workers) = cli.workers {
        config.workers = Some(workers);
    }
    if let Some(dir) = &cli.frames_dir {
        config.output.frames_dir = dir.to_string_lossy().into_owned();
    }
    if let Some(output) = &cli.output {
        config.output.video = output.to_string_lossy().into_owned();
    }
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {e}"))?;
    Ok(config)
}

/// Parse the log, render every frame and encode the video.
///
/// `shutdown` interrupts rendering; frames already written stay on disk and
/// no video is produced. If it is already resolved when rendering begins, the
/// run stops as soon as the worker pool is complete.
pub async fn run<S>(cli: &Cli, shutdown: S) -> Result<RunSummary>
where
    S: Future<Output = ()>,
{
    let config = resolve_config(cli)?;

    let streams = parse_log_file(&cli.log, &config)
        .with_context(|| format!("Failed to parse log {}", cli.log.display()))?;
    let graph = InteractionGraphBuilder::from_messages(&streams.messages);
    println!("{}", streams.render_as_ascii_tree(&graph));

    if let Some(path) = &cli.dot {
        fs::write(path, graph.to_dot())
            .with_context(|| format!("Failed to write graph to {}", path.display()))?;
        info!("[dialog-runner] Graph written to {}", path.display());
    }

    let mut summary = RunSummary {
        messages: streams.messages.len(),
        speeches: streams.speeches.len(),
        ..Default::default()
    };
    if cli.summary_only {
        return Ok(summary);
    }

    let bounds = streams.bounds.ok_or(AnimError::EmptySession)?;
    let layout: Box<dyn GraphLayout> = match cli.layout {
        LayoutKind::Dot => Box::new(DotLayout::new()),
        LayoutKind::Circular => Box::new(CircularLayout),
    };
    let layout = layout
        .layout(&graph)
        .context("Failed to lay out the interaction graph")?;

    let frames_dir = PathBuf::from(&config.output.frames_dir);
    let video = PathBuf::from(&config.output.video);
    let fps = config.animation.fps;
    let pool = config
        .workers
        .map(WorkerPool::new)
        .unwrap_or_else(WorkerPool::with_available_parallelism);

    let scheduler = AnimationScheduler::new(bounds, &config.animation);
    let compositor = FrameCompositor::new(
        Arc::new(config),
        Arc::new(streams),
        bounds,
        Arc::new(layout),
    );
    let renderer = Arc::new(FrameRenderer::new(
        scheduler,
        compositor,
        Arc::new(ImageRaster::new()),
        &frames_dir,
    ));

    info!(
        "[dialog-runner] Rendering {} frames with {} workers",
        scheduler.frame_count(),
        pool.workers()
    );
    let report = match renderer.render_all(&pool, shutdown).await {
        Ok(report) => report,
        Err(AnimError::Interrupted) => {
            warn!("[dialog-runner] Interrupted; no video was encoded");
            return Err(AnimError::Interrupted.into());
        }
        Err(e) => return Err(e).context("Frame rendering failed"),
    };
    summary.frames = report.frames_rendered();

    if cli.no_encode {
        info!(
            "[dialog-runner] Skipping encode; frames are in {}",
            frames_dir.display()
        );
        return Ok(summary);
    }

    FfmpegEncoder::new()
        .encode(&frames_dir, fps, &video)
        .context("Video encoding failed")?;
    summary.video = Some(video);
    Ok(summary)
}
