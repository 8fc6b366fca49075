//! # Dialog Anim
//!
//! Turns event streams into an animation.
//!
//! - [`scheduler::AnimationScheduler`] maps the session onto frames
//! - [`compositor::FrameCompositor`] decides what is active at each frame and
//!   builds a [`scene::Scene`] for it
//! - [`pool::WorkerPool`] renders the frames on a fixed set of workers
//! - [`capability`] holds the layout, canvas and encoder interfaces, with
//!   default adapters in [`layout`], [`raster`] and [`encoder`]

pub mod capability;
pub mod compositor;
pub mod encoder;
pub mod error;
pub mod font;
pub mod layout;
pub mod pool;
pub mod raster;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod timeline;

pub use capability::{EdgePath, GraphLayout, GraphLayoutResult, NodePlacement, RasterCanvas, VideoEncoder};
pub use compositor::{FrameActivation, FrameCompositor};
pub use encoder::FfmpegEncoder;
pub use error::{AnimError, AnimResult};
pub use layout::{CircularLayout, DotLayout};
pub use pool::{PoolReport, WorkerPool};
pub use raster::ImageRaster;
pub use render::FrameRenderer;
pub use scene::{Anchor, Point, Primitive, Rgb, Scene};
pub use scheduler::{partition, AnimationScheduler};
pub use timeline::TimelineLayer;
