//! `image`-backed raster canvas.

use crate::capability::RasterCanvas;
use crate::error::AnimResult;
use crate::font::{glyph_cells, scale_for, text_extent, GLYPH_ADVANCE};
use crate::scene::{Anchor, Point, Primitive, Rgb, Scene};
use image::{Rgb as Pixel, RgbImage};
use std::path::Path;

/// Paints scenes into an [`RgbImage`] and saves them as PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRaster;

impl ImageRaster {
    pub fn new() -> Self {
        Self
    }

    /// Paint `scene` into a fresh image buffer.
    pub fn paint(&self, scene: &Scene) -> RgbImage {
        let mut image = RgbImage::from_pixel(scene.width, scene.height, Pixel(scene.background.to_array()));
        for primitive in &scene.primitives {
            match primitive {
                Primitive::Line {
                    from,
                    to,
                    color,
                    width,
                } => draw_line(&mut image, *from, *to, *color, *width),
                Primitive::Polygon {
                    points,
                    fill,
                    outline,
                } => {
                    fill_polygon(&mut image, points, *fill);
                    if let Some(outline) = outline {
                        for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
                            draw_line(&mut image, *a, *b, *outline, 1.0);
                        }
                    }
                }
                Primitive::Text {
                    text,
                    at,
                    anchor,
                    size,
                    color,
                } => draw_text(&mut image, text, *at, *anchor, *size, *color),
            }
        }
        image
    }
}

impl RasterCanvas for ImageRaster {
    fn render(&self, scene: &Scene, path: &Path) -> AnimResult<()> {
        self.paint(scene).save(path)?;
        Ok(())
    }
}

fn put_pixel(image: &mut RgbImage, x: i64, y: i64, color: Rgb) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, Pixel(color.to_array()));
    }
}

fn fill_square(image: &mut RgbImage, center: Point, side: f64, color: Rgb) {
    let half = side / 2.0;
    let x0 = (center.x - half).round() as i64;
    let y0 = (center.y - half).round() as i64;
    let n = side.round().max(1.0) as i64;
    for y in y0..y0 + n {
        for x in x0..x0 + n {
            put_pixel(image, x, y, color);
        }
    }
}

fn draw_line(image: &mut RgbImage, from: Point, to: Point, color: Rgb, width: f64) {
    let steps = (to.x - from.x).abs().max((to.y - from.y).abs()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let p = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
        fill_square(image, p, width, color);
    }
}

/// Even-odd scanline fill sampled at pixel centres.
fn fill_polygon(image: &mut RgbImage, points: &[Point], color: Rgb) {
    if points.len() < 3 {
        return;
    }
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min).floor().max(0.0) as i64;
    let max_y = points
        .iter()
        .map(|p| p.y)
        .fold(f64::NEG_INFINITY, f64::max)
        .ceil()
        .min(image.height() as f64) as i64;

    let mut crossings = Vec::new();
    for y in min_y..max_y {
        let sy = y as f64 + 0.5;
        crossings.clear();
        for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
            if (a.y <= sy && b.y > sy) || (b.y <= sy && a.y > sy) {
                crossings.push(a.x + (sy - a.y) / (b.y - a.y) * (b.x - a.x));
            }
        }
        crossings.sort_by(f64::total_cmp);
        for span in crossings.chunks_exact(2) {
            let start = (span[0] - 0.5).ceil() as i64;
            let end = (span[1] - 0.5).floor() as i64;
            for x in start..=end {
                put_pixel(image, x, y, color);
            }
        }
    }
}

fn draw_text(image: &mut RgbImage, text: &str, at: Point, anchor: Anchor, size: f64, color: Rgb) {
    let (width, height) = text_extent(text, size);
    let (w, h) = (width as f64, height as f64);
    let (left, top) = match anchor {
        Anchor::West => (at.x, at.y - h / 2.0),
        Anchor::North => (at.x - w / 2.0, at.y),
        Anchor::South => (at.x - w / 2.0, at.y - h),
        Anchor::Center => (at.x - w / 2.0, at.y - h / 2.0),
    };
    let scale = scale_for(size) as i64;
    let (left, top) = (left.round() as i64, top.round() as i64);

    for (i, ch) in text.chars().enumerate() {
        let origin_x = left + i as i64 * GLYPH_ADVANCE as i64 * scale;
        for (col, row) in glyph_cells(ch) {
            for dy in 0..scale {
                for dx in 0..scale {
                    put_pixel(
                        image,
                        origin_x + col as i64 * scale + dx,
                        top + row as i64 * scale + dy,
                        color,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(image: &RgbImage, x: u32, y: u32) -> [u8; 3] {
        image.get_pixel(x, y).0
    }

    #[test]
    fn background_fills_the_canvas() {
        let image = ImageRaster.paint(&Scene::new(4, 3));
        assert_eq!(image.dimensions(), (4, 3));
        assert!(image.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn horizontal_line_is_painted() {
        let mut scene = Scene::new(10, 10);
        scene.push(Primitive::line(Point::new(1.0, 5.0), Point::new(8.0, 5.0), Rgb::BLACK, 1.0));
        let image = ImageRaster.paint(&scene);
        for x in 1..=8 {
            assert_eq!(at(&image, x, 5), [0, 0, 0], "x = {x}");
        }
        assert_eq!(at(&image, 5, 2), [255, 255, 255]);
    }

    #[test]
    fn polygon_interior_is_filled() {
        let mut scene = Scene::new(10, 10);
        scene.push(Primitive::Polygon {
            points: vec![
                Point::new(2.0, 2.0),
                Point::new(8.0, 2.0),
                Point::new(8.0, 8.0),
                Point::new(2.0, 8.0),
            ],
            fill: Rgb::YELLOW,
            outline: None,
        });
        let image = ImageRaster.paint(&scene);
        assert_eq!(at(&image, 5, 5), [255, 255, 0]);
        assert_eq!(at(&image, 0, 0), [255, 255, 255]);
        assert_eq!(at(&image, 9, 9), [255, 255, 255]);
    }

    #[test]
    fn off_canvas_primitives_are_clipped() {
        let mut scene = Scene::new(5, 5);
        scene.push(Primitive::line(Point::new(-10.0, -10.0), Point::new(20.0, 20.0), Rgb::BLACK, 3.0));
        scene.push(Primitive::text("OUTSIDE", Point::new(100.0, 100.0), Anchor::West, 10.0));
        let image = ImageRaster.paint(&scene);
        assert_eq!(at(&image, 2, 2), [0, 0, 0]);
    }

    #[test]
    fn text_lands_on_its_anchor() {
        let mut scene = Scene::new(20, 20);
        scene.push(Primitive::text("-", Point::new(10.0, 0.0), Anchor::North, 5.0));
        let image = ImageRaster.paint(&scene);
        // 3 px wide dash, centred, on glyph row 2
        let left = (10.0f64 - 1.5).round() as u32;
        for x in left..left + 3 {
            assert_eq!(at(&image, x, 2), [0, 0, 0]);
        }
        assert_eq!(at(&image, left, 0), [255, 255, 255]);
    }
}
