//! Frame compositor
//!
//! Decides what is active at a frame's time and turns that into a [`Scene`]:
//! the interaction graph with highlighted edges and nodes, the timeline base
//! layer with its cursor, and the latest caption.

use crate::capability::{EdgePath, GraphLayoutResult};
use crate::scene::{arrowhead, ellipse, heading_deg, Anchor, Point, Primitive, Rgb, Scene};
use crate::timeline::TimelineLayer;
use dialog_flow::EventStreams;
use dialog_types::{AgentId, DialogConfig, Frame, SessionBounds, Speech};
use std::collections::BTreeSet;
use std::sync::Arc;

pub const CAPTION_SIZE: f64 = 15.0;
pub const NODE_LABEL_SIZE: f64 = 10.0;
const CAPTION_TOP: f64 = 10.0;
const EDGE_ARROWHEAD: f64 = 7.0;
const ELLIPSE_SEGMENTS: usize = 32;
const SPLINE_STEPS: usize = 8;

/// What is lit up at one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameActivation {
    pub frame: Frame,
    /// Indices into the message stream
    pub active_messages: Vec<usize>,
    pub active_edges: BTreeSet<(AgentId, AgentId)>,
    pub active_nodes: BTreeSet<AgentId>,
    pub caption: Option<Speech>,
    pub cursor_x: f64,
}

impl FrameActivation {
    pub fn compute(frame: Frame, streams: &EventStreams, config: &DialogConfig) -> Self {
        let window = config.animation.persistence_window();
        let mut active_messages = Vec::new();
        let mut active_edges = BTreeSet::new();
        let mut active_nodes = BTreeSet::new();

        for (index, message) in streams.messages.iter().enumerate() {
            if message.is_active_at(frame.t_abs, window) {
                active_messages.push(index);
                active_edges.insert(message.edge());
                active_nodes.insert(message.sender.clone());
                active_nodes.insert(message.receiver.clone());
            }
        }

        let caption = streams
            .speeches
            .iter()
            .rev()
            .find(|s| s.t <= frame.t_abs)
            .cloned();

        Self {
            frame,
            active_messages,
            active_edges,
            active_nodes,
            caption,
            cursor_x: frame.t_rel * config.timeline.x_scale + config.timeline.gutter_width,
        }
    }

    pub fn is_edge_active(&self, sender: &AgentId, receiver: &AgentId) -> bool {
        self.active_edges
            .contains(&(sender.clone(), receiver.clone()))
    }
}

/// Read-only frame builder shared by every worker.
#[derive(Debug, Clone)]
pub struct FrameCompositor {
    config: Arc<DialogConfig>,
    streams: Arc<EventStreams>,
    layout: Arc<GraphLayoutResult>,
    timeline: TimelineLayer,
}

impl FrameCompositor {
    pub fn new(
        config: Arc<DialogConfig>,
        streams: Arc<EventStreams>,
        bounds: SessionBounds,
        layout: Arc<GraphLayoutResult>,
    ) -> Self {
        let timeline = TimelineLayer::build(&streams, bounds, &config);
        Self {
            config,
            streams,
            layout,
            timeline,
        }
    }

    pub fn activation(&self, frame: Frame) -> FrameActivation {
        FrameActivation::compute(frame, &self.streams, &self.config)
    }

    pub fn compose(&self, frame: Frame) -> Scene {
        let activation = self.activation(frame);
        let anim = &self.config.animation;
        let mut scene = Scene::new(anim.width, anim.height);

        self.draw_graph(&mut scene, &activation);

        scene.extend_translated(self.timeline.primitives(), anim.timeline_x, anim.timeline_y);
        scene.push(
            self.timeline
                .cursor(frame.t_rel)
                .translated(anim.timeline_x, anim.timeline_y),
        );

        if let Some(speech) = &activation.caption {
            scene.push(Primitive::text(
                speech.text.as_str(),
                Point::new(anim.width as f64 / 2.0, CAPTION_TOP),
                Anchor::North,
                CAPTION_SIZE,
            ));
        }
        scene
    }

    fn draw_graph(&self, scene: &mut Scene, activation: &FrameActivation) {
        let dx = self.config.animation.graph_x;
        let dy = self.config.animation.graph_y;

        for edge in &self.layout.edges {
            let color = if activation.is_edge_active(&edge.sender, &edge.receiver) {
                Rgb::FOREST_GREEN
            } else {
                Rgb::BLACK
            };
            let path = flatten_edge(edge);
            for pair in path.windows(2) {
                scene.push(Primitive::line(
                    pair[0].offset(dx, dy),
                    pair[1].offset(dx, dy),
                    color,
                    1.0,
                ));
            }
            if let [.., before, tip] = path.as_slice() {
                let heading = heading_deg(*before, *tip);
                scene.push(Primitive::Polygon {
                    points: arrowhead(tip.offset(dx, dy), heading, EDGE_ARROWHEAD),
                    fill: color,
                    outline: None,
                });
            }
        }

        for node in &self.layout.nodes {
            let fill = if activation.active_nodes.contains(&node.id) {
                Rgb::YELLOW
            } else {
                Rgb::WHITE
            };
            let center = node.center.offset(dx, dy);
            scene.push(Primitive::Polygon {
                points: ellipse(center, node.width / 2.0, node.height / 2.0, ELLIPSE_SEGMENTS),
                fill,
                outline: Some(Rgb::BLACK),
            });
            scene.push(Primitive::text(
                node.id.as_str(),
                center,
                Anchor::Center,
                NODE_LABEL_SIZE,
            ));
        }
    }
}

/// Sample an edge path into a polyline.
///
/// Paths with `3n + 1` points are read as piecewise cubic Bézier curves, the
/// way Graphviz reports splines; anything else is drawn as given.
pub fn flatten_edge(edge: &EdgePath) -> Vec<Point> {
    let points = &edge.points;
    if points.len() < 4 || (points.len() - 1) % 3 != 0 {
        return points.clone();
    }

    let mut out = vec![points[0]];
    for start in (0..points.len() - 1).step_by(3) {
        let [p0, p1, p2, p3] = [
            points[start],
            points[start + 1],
            points[start + 2],
            points[start + 3],
        ];
        for step in 1..=SPLINE_STEPS {
            let t = step as f64 / SPLINE_STEPS as f64;
            let u = 1.0 - t;
            let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
            out.push(Point::new(
                a * p0.x + b * p1.x + c * p2.x + d * p3.x,
                a * p0.y + b * p1.y + c * p2.y + d * p3.y,
            ));
        }
    }
    out
}
