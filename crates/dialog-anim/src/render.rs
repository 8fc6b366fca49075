//! Frame rendering
//!
//! Glues the scheduler, compositor and raster canvas together and writes each
//! frame atomically into the frames directory.

use crate::capability::RasterCanvas;
use crate::compositor::FrameCompositor;
use crate::error::AnimResult;
use crate::pool::{PoolReport, WorkerPool};
use crate::scheduler::AnimationScheduler;
use std::fs;
use std::io;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

pub struct FrameRenderer {
    scheduler: AnimationScheduler,
    compositor: FrameCompositor,
    canvas: Arc<dyn RasterCanvas>,
    frames_dir: PathBuf,
}

impl FrameRenderer {
    pub fn new(
        scheduler: AnimationScheduler,
        compositor: FrameCompositor,
        canvas: Arc<dyn RasterCanvas>,
        frames_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            scheduler,
            compositor,
            canvas,
            frames_dir: frames_dir.into(),
        }
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn frames_dir(&self) -> &Path {
        &self.frames_dir
    }

    /// Render frame `index` to `<frames_dir>/<index:05>.png`.
    ///
    /// The image is written under a temporary name and renamed into place, so
    /// a frame file is either complete or absent.
    pub fn render_frame(&self, index: usize) -> AnimResult<PathBuf> {
        let frame = self.scheduler.frame(index);
        let scene = self.compositor.compose(frame);
        let target = self.frames_dir.join(frame.file_name());
        let partial = self.frames_dir.join(format!(".{:05}.partial.png", frame.index));

        if let Err(e) = self.canvas.render(&scene, &partial) {
            if let Err(cleanup) = fs::remove_file(&partial) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!(
                        "[FrameRenderer] Could not remove {}: {cleanup}",
                        partial.display()
                    );
                }
            }
            return Err(e);
        }
        fs::rename(&partial, &target)?;
        Ok(target)
    }

    /// Render every frame on `pool`, stopping early if `shutdown` resolves.
    pub async fn render_all<S>(self: Arc<Self>, pool: &WorkerPool, shutdown: S) -> AnimResult<PoolReport>
    where
        S: Future<Output = ()>,
    {
        let stale = prepare_frames_dir(&self.frames_dir)?;
        if stale > 0 {
            info!("[FrameRenderer] Removed {stale} stale frame files");
        }
        let frame_count = self.scheduler.frame_count();
        info!(
            "[FrameRenderer] Rendering {frame_count} frames into {}",
            self.frames_dir.display()
        );

        let renderer = Arc::clone(&self);
        pool.run(
            frame_count,
            move |_worker, index| renderer.render_frame(index).map(|_| ()),
            shutdown,
        )
        .await
    }
}

/// Create `dir` and delete frame files left over from an earlier run.
///
/// Returns how many files were removed.
pub fn prepare_frames_dir(dir: &Path) -> AnimResult<usize> {
    fs::create_dir_all(dir)?;
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_frame = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(is_frame_file_name);
        if is_frame && path.is_file() {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// `00042.png` or a leftover `.00042.partial.png`.
fn is_frame_file_name(name: &str) -> bool {
    let stem = name
        .strip_prefix('.')
        .and_then(|n| n.strip_suffix(".partial.png"))
        .or_else(|| name.strip_suffix(".png"));
    stem.is_some_and(|s| s.len() >= 5 && s.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::is_frame_file_name;

    #[test]
    fn frame_names_are_recognised() {
        assert!(is_frame_file_name("00000.png"));
        assert!(is_frame_file_name("123456.png"));
        assert!(is_frame_file_name(".00042.partial.png"));
        assert!(!is_frame_file_name("cover.png"));
        assert!(!is_frame_file_name("0042.png"));
        assert!(!is_frame_file_name("00042.jpg"));
    }
}
