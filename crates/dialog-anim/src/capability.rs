//! Capability interfaces for the external collaborators.
//!
//! Graph layout, rasterization and video encoding are delegated to these
//! traits so that scheduling and composition can be exercised without any
//! Graphviz, image or ffmpeg toolchain.

use crate::error::AnimResult;
use crate::scene::{Point, Scene};
use dialog_flow::InteractionGraph;
use dialog_types::AgentId;
use serde::Serialize;
use std::path::Path;

/// Position and size of one laid-out node, in layout pixels (origin top-left).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePlacement {
    pub id: AgentId,
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

/// Drawable path of one directed edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgePath {
    pub sender: AgentId,
    pub receiver: AgentId,
    /// Cubic B-spline control points (`3n + 1` of them) or a plain polyline
    pub points: Vec<Point>,
}

/// Stable node coordinates and edge paths, computed once per run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphLayoutResult {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodePlacement>,
    pub edges: Vec<EdgePath>,
}

impl GraphLayoutResult {
    pub fn node(&self, id: &AgentId) -> Option<&NodePlacement> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn edge(&self, sender: &AgentId, receiver: &AgentId) -> Option<&EdgePath> {
        self.edges
            .iter()
            .find(|e| &e.sender == sender && &e.receiver == receiver)
    }
}

/// Computes node positions and edge paths for an interaction graph.
pub trait GraphLayout: Send + Sync {
    fn layout(&self, graph: &InteractionGraph) -> AnimResult<GraphLayoutResult>;
}

/// Paints a scene and saves it as an image file.
pub trait RasterCanvas: Send + Sync {
    fn render(&self, scene: &Scene, path: &Path) -> AnimResult<()>;
}

/// Assembles `%05d.png` frames from a directory into a video.
pub trait VideoEncoder: Send + Sync {
    fn encode(&self, frames_dir: &Path, fps: f64, output: &Path) -> AnimResult<()>;
}
