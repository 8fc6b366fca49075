//! Animation scheduler
//!
//! Maps the session onto a fixed sequence of frames and partitions the frame
//! indices over a worker pool. Every frame is a pure function of its index.

use dialog_types::{AnimationConfig, Frame, SessionBounds};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationScheduler {
    bounds: SessionBounds,
    fps: f64,
    time_scale: f64,
    padding: usize,
}

impl AnimationScheduler {
    pub fn new(bounds: SessionBounds, animation: &AnimationConfig) -> Self {
        Self {
            bounds,
            fps: animation.fps,
            time_scale: animation.time_scale,
            padding: animation.frame_padding,
        }
    }

    pub fn bounds(&self) -> SessionBounds {
        self.bounds
    }

    /// `ceil(elapsed * time_scale * fps)` plus the trailing padding.
    ///
    /// Saturates at `usize::MAX`; a validated configuration stays far below it.
    pub fn frame_count(&self) -> usize {
        let frames = (self.bounds.elapsed() * self.time_scale * self.fps).ceil();
        (frames as usize).saturating_add(self.padding)
    }

    pub fn frame(&self, index: usize) -> Frame {
        let t_rel = index as f64 / self.fps / self.time_scale;
        Frame {
            index,
            t_rel,
            t_abs: self.bounds.t0 + t_rel,
        }
    }

    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        (0..self.frame_count()).map(|index| self.frame(index))
    }

    /// Frames computed by `worker` in a pool of `workers`.
    pub fn frames_for_worker(
        &self,
        worker: usize,
        workers: usize,
    ) -> impl Iterator<Item = Frame> + '_ {
        worker_indices(worker, workers, self.frame_count()).map(|index| self.frame(index))
    }
}

/// Indices `worker, worker + workers, ...` below `frame_count`.
///
/// Empty when `workers` is zero or `worker` is out of range.
pub fn worker_indices(
    worker: usize,
    workers: usize,
    frame_count: usize,
) -> impl Iterator<Item = usize> {
    let end = if worker < workers { frame_count } else { 0 };
    (worker..end).step_by(workers.max(1))
}

/// Static index-modulo assignment of `frame_count` frames to `workers` workers.
pub fn partition(frame_count: usize, workers: usize) -> Vec<Vec<usize>> {
    (0..workers)
        .map(|worker| worker_indices(worker, workers, frame_count).collect())
        .collect()
}
