//! Graph layout adapters
//!
//! [`DotLayout`] asks Graphviz for a layout in its `plain` output format;
//! [`CircularLayout`] places nodes on a circle without any external tool.

use crate::capability::{EdgePath, GraphLayout, GraphLayoutResult, NodePlacement};
use crate::compositor::NODE_LABEL_SIZE;
use crate::error::{AnimError, AnimResult};
use crate::font::text_extent;
use crate::scene::Point;
use dialog_flow::InteractionGraph;
use std::env;
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{debug, info};

pub const ENV_DOT: &str = "DIALOG_DOT";
/// Graphviz reports coordinates in inches
const POINTS_PER_INCH: f64 = 72.0;

/// Layout through the Graphviz `dot` binary.
#[derive(Debug, Clone)]
pub struct DotLayout {
    binary: String,
}

impl Default for DotLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl DotLayout {
    /// Use `$DIALOG_DOT`, falling back to `dot` on the `PATH`.
    pub fn new() -> Self {
        Self::with_binary(env::var(ENV_DOT).unwrap_or_else(|_| "dot".to_string()))
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl GraphLayout for DotLayout {
    fn layout(&self, graph: &InteractionGraph) -> AnimResult<GraphLayoutResult> {
        info!(
            "[DotLayout] Laying out {} nodes / {} edges with {}",
            graph.nodes.len(),
            graph.edges.len(),
            self.binary
        );
        let mut child = Command::new(&self.binary)
            .arg("-Tplain")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AnimError::layout(format!("failed to start {}: {e}", self.binary)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(graph.to_dot().as_bytes())?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(AnimError::layout(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        parse_plain(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse Graphviz `-Tplain` output into pixel coordinates with a top-left origin.
pub fn parse_plain(text: &str) -> AnimResult<GraphLayoutResult> {
    let mut result: Option<GraphLayoutResult> = None;
    let mut height_in = 0.0;

    for (number, line) in text.lines().enumerate() {
        let tokens = tokenize(line);
        let Some(keyword) = tokens.first() else {
            continue;
        };
        let bad = |what: &str| AnimError::layout(format!("plain line {}: {what}", number + 1));

        match keyword.as_str() {
            "graph" => {
                let width = number_at(&tokens, 2).ok_or_else(|| bad("graph width"))?;
                height_in = number_at(&tokens, 3).ok_or_else(|| bad("graph height"))?;
                result = Some(GraphLayoutResult {
                    width: width * POINTS_PER_INCH,
                    height: height_in * POINTS_PER_INCH,
                    ..Default::default()
                });
            }
            "node" => {
                let layout = result.as_mut().ok_or_else(|| bad("node before graph"))?;
                let name = tokens.get(1).ok_or_else(|| bad("node name"))?;
                let coords: Option<Vec<f64>> = (2..6).map(|i| number_at(&tokens, i)).collect();
                let [x, y, w, h] = coords
                    .and_then(|c| <[f64; 4]>::try_from(c).ok())
                    .ok_or_else(|| bad("node geometry"))?;
                layout.nodes.push(NodePlacement {
                    id: name.as_str().into(),
                    center: to_pixels(x, y, height_in),
                    width: w * POINTS_PER_INCH,
                    height: h * POINTS_PER_INCH,
                });
            }
            "edge" => {
                let layout = result.as_mut().ok_or_else(|| bad("edge before graph"))?;
                let (Some(tail), Some(head)) = (tokens.get(1), tokens.get(2)) else {
                    return Err(bad("edge endpoints"));
                };
                let count = tokens
                    .get(3)
                    .and_then(|t| t.parse::<usize>().ok())
                    .ok_or_else(|| bad("edge point count"))?;
                let points = (0..count)
                    .map(|i| {
                        let x = number_at(&tokens, 4 + 2 * i)?;
                        let y = number_at(&tokens, 5 + 2 * i)?;
                        Some(to_pixels(x, y, height_in))
                    })
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| bad("edge points"))?;
                layout.edges.push(EdgePath {
                    sender: tail.as_str().into(),
                    receiver: head.as_str().into(),
                    points,
                });
            }
            "stop" => break,
            _ => {}
        }
    }

    let layout = result.ok_or_else(|| AnimError::layout("plain output has no graph line"))?;
    debug!(
        "[DotLayout] {}x{} px, {} nodes, {} edges",
        layout.width,
        layout.height,
        layout.nodes.len(),
        layout.edges.len()
    );
    Ok(layout)
}

fn to_pixels(x: f64, y: f64, height_in: f64) -> Point {
    Point::new(x * POINTS_PER_INCH, (height_in - y) * POINTS_PER_INCH)
}

fn number_at(tokens: &[String], index: usize) -> Option<f64> {
    tokens.get(index)?.parse().ok()
}

/// Split a plain-format line on whitespace, honouring double-quoted names.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '"' {
            chars.next();
            let mut token = String::new();
            while let Some(c) = chars.next() {
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            token.push(escaped);
                        }
                    }
                    '"' => break,
                    _ => token.push(c),
                }
            }
            tokens.push(token);
        } else {
            let mut token = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
            tokens.push(token);
        }
    }
    tokens
}

const NODE_HEIGHT: f64 = 30.0;
const NODE_PADDING: f64 = 24.0;
const MIN_RADIUS: f64 = 80.0;
const RECIPROCAL_OFFSET: f64 = 4.0;

/// Deterministic circular layout in first-appearance order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CircularLayout;

impl GraphLayout for CircularLayout {
    fn layout(&self, graph: &InteractionGraph) -> AnimResult<GraphLayoutResult> {
        if graph.nodes.is_empty() {
            return Ok(GraphLayoutResult::default());
        }

        let sizes: Vec<(f64, f64)> = graph
            .nodes
            .iter()
            .map(|id| {
                let (w, _) = text_extent(id.as_str(), NODE_LABEL_SIZE);
                (w as f64 + NODE_PADDING, NODE_HEIGHT)
            })
            .collect();
        let widest = sizes.iter().map(|(w, _)| *w).fold(0.0, f64::max);
        let n = graph.nodes.len();
        let radius = if n == 1 {
            0.0
        } else {
            MIN_RADIUS.max(n as f64 * NODE_HEIGHT * 1.2)
        };
        let half_w = radius + widest / 2.0 + NODE_PADDING;
        let half_h = radius + NODE_HEIGHT / 2.0 + NODE_PADDING;

        let nodes: Vec<NodePlacement> = graph
            .nodes
            .iter()
            .zip(&sizes)
            .enumerate()
            .map(|(i, (id, &(width, height)))| {
                let angle = -std::f64::consts::FRAC_PI_2
                    + std::f64::consts::TAU * i as f64 / n as f64;
                NodePlacement {
                    id: id.clone(),
                    center: Point::new(half_w + radius * angle.cos(), half_h + radius * angle.sin()),
                    width,
                    height,
                }
            })
            .collect();

        let mut edges = Vec::with_capacity(graph.edges.len());
        for edge in &graph.edges {
            let (Some(from), Some(to)) = (
                nodes.iter().find(|n| n.id == edge.sender),
                nodes.iter().find(|n| n.id == edge.receiver),
            ) else {
                return Err(AnimError::layout(format!(
                    "edge {} -> {} references an unknown node",
                    edge.sender, edge.receiver
                )));
            };
            let shift = if graph.contains_edge(&edge.receiver, &edge.sender) {
                RECIPROCAL_OFFSET
            } else {
                0.0
            };
            edges.push(EdgePath {
                sender: edge.sender.clone(),
                receiver: edge.receiver.clone(),
                points: straight_edge(from, to, shift),
            });
        }

        Ok(GraphLayoutResult {
            width: 2.0 * half_w,
            height: 2.0 * half_h,
            nodes,
            edges,
        })
    }
}

/// Segment between two node outlines, shifted sideways by `shift` pixels.
fn straight_edge(from: &NodePlacement, to: &NodePlacement, shift: f64) -> Vec<Point> {
    let (dx, dy) = (to.center.x - from.center.x, to.center.y - from.center.y);
    let length = dx.hypot(dy);
    if length == 0.0 {
        return vec![from.center, to.center];
    }
    let (ux, uy) = (dx / length, dy / length);
    let (nx, ny) = (-uy * shift, ux * shift);
    let start = boundary_distance(from, ux, uy);
    let end = length - boundary_distance(to, ux, uy);
    vec![
        Point::new(from.center.x + ux * start + nx, from.center.y + uy * start + ny),
        Point::new(from.center.x + ux * end + nx, from.center.y + uy * end + ny),
    ]
}

/// Distance from a node centre to its elliptical outline along `(ux, uy)`.
fn boundary_distance(node: &NodePlacement, ux: f64, uy: f64) -> f64 {
    let (a, b) = (node.width / 2.0, node.height / 2.0);
    1.0 / ((ux / a).powi(2) + (uy / b).powi(2)).sqrt()
}
