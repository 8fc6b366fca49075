//! Timeline base layer
//!
//! Lane grid, time ticks and one arrow per message. The layer does not depend
//! on the frame, so it is drawn once and shared by every frame; only the
//! cursor moves.

use crate::scene::{arrowhead, Anchor, Point, Primitive, Rgb};
use dialog_flow::{format_clock, EventStreams};
use dialog_types::{DialogConfig, SessionBounds, TimelineConfig};

pub const LANE_LABEL_SIZE: f64 = 10.0;
pub const TICK_LABEL_SIZE: f64 = 5.0;
const CURSOR_WIDTH: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLayer {
    geometry: TimelineConfig,
    lanes: usize,
    primitives: Vec<Primitive>,
}

impl TimelineLayer {
    pub fn build(streams: &EventStreams, bounds: SessionBounds, config: &DialogConfig) -> Self {
        let geometry = config.timeline.clone();
        let lanes = config.agents.order.len();
        let mut primitives = Vec::new();

        for (lane, agent) in config.agents.order.iter().enumerate() {
            let y = geometry.lane_y(lane, lanes);
            primitives.push(Primitive::text(
                agent.as_str(),
                Point::new(geometry.margin_x, y),
                Anchor::West,
                LANE_LABEL_SIZE,
            ));
            primitives.push(Primitive::line(
                Point::new(geometry.gutter_width, y),
                Point::new(geometry.width - geometry.margin_x, y),
                Rgb::GRAY,
                1.0,
            ));
        }

        for tick in time_ticks(&geometry, bounds.t0) {
            let x = (tick - bounds.t0) * geometry.x_scale + geometry.gutter_width;
            primitives.push(Primitive::text(
                format_clock(tick),
                Point::new(x, geometry.height - geometry.xtick_offset_y),
                Anchor::South,
                TICK_LABEL_SIZE,
            ));
        }

        for arrow in &streams.arrows {
            primitives.push(Primitive::line(
                Point::new(arrow.x, arrow.y1),
                Point::new(arrow.x, arrow.y2),
                Rgb::GREEN,
                1.0,
            ));
            primitives.push(Primitive::Polygon {
                points: arrowhead(
                    Point::new(arrow.x, arrow.y2),
                    arrow.angle,
                    geometry.arrowhead_size,
                ),
                fill: Rgb::GREEN,
                outline: None,
            });
        }

        Self {
            geometry,
            lanes,
            primitives,
        }
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn cursor_x(&self, t_rel: f64) -> f64 {
        t_rel * self.geometry.x_scale + self.geometry.gutter_width
    }

    /// Vertical cursor at `t_rel`, spanning the lanes.
    pub fn cursor(&self, t_rel: f64) -> Primitive {
        let x = self.cursor_x(t_rel);
        let margin = self.geometry.ytick_spacing(self.lanes);
        Primitive::line(
            Point::new(x, margin),
            Point::new(x, self.geometry.height - margin),
            Rgb::BLACK,
            CURSOR_WIDTH,
        )
    }
}

/// Tick spacing in seconds: a tenth of the visible span rounded to a power of ten.
pub fn tick_size(geometry: &TimelineConfig) -> f64 {
    10f64.powf(visible_span(geometry).log10().round()) / 10.0
}

/// Absolute tick times from `t0` to the right edge of the timeline.
pub fn time_ticks(geometry: &TimelineConfig, t0: f64) -> Vec<f64> {
    let span = visible_span(geometry);
    let step = tick_size(geometry);
    if !(step.is_finite() && step > 0.0) {
        return Vec::new();
    }

    let end = t0 + span + 1.0;
    let mut k = (t0 / step).ceil();
    let mut ticks = Vec::new();
    while k * step < end {
        ticks.push(k * step);
        k += 1.0;
    }
    ticks
}

fn visible_span(geometry: &TimelineConfig) -> f64 {
    (geometry.width - geometry.gutter_width - geometry.margin_x) / geometry.x_scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry_ticks_every_ten_seconds() {
        let geometry = TimelineConfig::default();
        assert_eq!(tick_size(&geometry), 10.0);
        let ticks = time_ticks(&geometry, 14_401.0);
        assert_eq!(ticks.first(), Some(&14_410.0));
        assert!(ticks.iter().all(|t| *t >= 14_401.0));
        assert!(ticks.windows(2).all(|w| w[1] - w[0] == 10.0));
        assert_eq!(ticks.len(), 9);
    }
}
