use thiserror::Error;

/// Errors that can occur while scheduling, rendering or encoding frames
#[derive(Debug, Error)]
pub enum AnimError {
    /// The layout capability failed or returned unusable output
    #[error("Layout error: {0}")]
    LayoutError(String),

    /// The raster capability could not produce an image
    #[error("Raster error: {0}")]
    RasterError(String),

    /// The video encoder failed
    #[error("Encoder error: {0}")]
    EncodeError(String),

    /// A worker could not render one of its frames
    #[error("Worker {worker} failed on frame {frame}: {reason}")]
    WorkerFailed {
        worker: usize,
        frame: usize,
        reason: String,
    },

    /// A worker task panicked or was aborted
    #[error("Worker task panicked: {0}")]
    WorkerPanicked(String),

    /// The run was interrupted before every frame was written
    #[error("Rendering interrupted")]
    Interrupted,

    /// No message was accepted, so there is no t0 to animate from
    #[error("Session has no accepted messages; nothing to animate")]
    EmptySession,

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Image encoding error
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
}

impl AnimError {
    /// Create a new layout error
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::LayoutError(msg.into())
    }

    /// Create a new raster error
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::RasterError(msg.into())
    }

    /// Create a new encoder error
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::EncodeError(msg.into())
    }

    /// Wrap a per-frame failure with the worker and frame it happened on
    pub fn worker_failed(worker: usize, frame: usize, source: AnimError) -> Self {
        Self::WorkerFailed {
            worker,
            frame,
            reason: source.to_string(),
        }
    }
}

/// Result type for animation operations
pub type AnimResult<T> = Result<T, AnimError>;
