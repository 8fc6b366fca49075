//! Drawing primitives handed to the raster canvas.
//!
//! A [`Scene`] is the complete, backend-independent description of one frame:
//! the canvas size, a background colour and an ordered list of primitives
//! painted back to front.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const GRAY: Rgb = Rgb(190, 190, 190);
    pub const GREEN: Rgb = Rgb(0, 128, 0);
    pub const FOREST_GREEN: Rgb = Rgb(34, 139, 34);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);

    pub fn to_array(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

/// Which point of the text box sits on the text position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Anchor {
    /// Left edge, vertically centred
    West,
    /// Top edge, horizontally centred
    North,
    /// Bottom edge, horizontally centred
    South,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        color: Rgb,
        width: f64,
    },
    Polygon {
        points: Vec<Point>,
        fill: Rgb,
        outline: Option<Rgb>,
    },
    Text {
        text: String,
        at: Point,
        anchor: Anchor,
        /// Glyph height in pixels
        size: f64,
        color: Rgb,
    },
}

impl Primitive {
    pub fn line(from: Point, to: Point, color: Rgb, width: f64) -> Self {
        Self::Line {
            from,
            to,
            color,
            width,
        }
    }

    pub fn text(text: impl Into<String>, at: Point, anchor: Anchor, size: f64) -> Self {
        Self::Text {
            text: text.into(),
            at,
            anchor,
            size,
            color: Rgb::BLACK,
        }
    }

    /// Copy of the primitive moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        match self {
            Self::Line {
                from,
                to,
                color,
                width,
            } => Self::Line {
                from: from.offset(dx, dy),
                to: to.offset(dx, dy),
                color: *color,
                width: *width,
            },
            Self::Polygon {
                points,
                fill,
                outline,
            } => Self::Polygon {
                points: points.iter().map(|p| p.offset(dx, dy)).collect(),
                fill: *fill,
                outline: *outline,
            },
            Self::Text {
                text,
                at,
                anchor,
                size,
                color,
            } => Self::Text {
                text: text.clone(),
                at: at.offset(dx, dy),
                anchor: *anchor,
                size: *size,
                color: *color,
            },
        }
    }
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Rgb::WHITE,
            primitives: Vec::new(),
        }
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn extend_translated<'a>(
        &mut self,
        primitives: impl IntoIterator<Item = &'a Primitive>,
        dx: f64,
        dy: f64,
    ) {
        self.primitives
            .extend(primitives.into_iter().map(|p| p.translated(dx, dy)));
    }

    /// Text of every text primitive, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Arrowhead triangle with its tip at `tip`.
///
/// At `angle_deg == 0` the head points down (+y); the shape is rotated
/// clockwise by `angle_deg` in screen coordinates.
pub fn arrowhead(tip: Point, angle_deg: f64, size: f64) -> Vec<Point> {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    [(0.0, 0.0), (size / 2.0, -size), (-size / 2.0, -size)]
        .into_iter()
        .map(|(x, y)| Point::new(tip.x + x * cos - y * sin, tip.y + x * sin + y * cos))
        .collect()
}

/// Rotation that makes [`arrowhead`] point along the segment `from -> to`.
pub fn heading_deg(from: Point, to: Point) -> f64 {
    (-(to.x - from.x)).atan2(to.y - from.y).to_degrees()
}

/// Polygon approximating an axis-aligned ellipse.
pub fn ellipse(center: Point, rx: f64, ry: f64, segments: usize) -> Vec<Point> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            let a = std::f64::consts::TAU * i as f64 / segments as f64;
            Point::new(center.x + rx * a.cos(), center.y + ry * a.sin())
        })
        .collect()
}
