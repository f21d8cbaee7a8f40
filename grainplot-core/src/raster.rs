//! Pixel canvas with the few primitives frame rendering needs
//!
//! Coordinates are in pixels with y growing downward. A pixel is covered
//! when its center falls inside the shape; there is no anti-aliasing.
//! Strokes use round joins and caps.

use crate::color::Rgba;
use crate::geometry::Point;
use image::RgbaImage;

/// Strokes never get thinner than this many pixels, so hairline borders
/// stay visible on small canvases.
pub const MIN_STROKE_PIXELS: f64 = 1.0;

pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, image::Rgba(background.to_rgba8())),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Fills a closed polygon with the even-odd rule. The closing edge from
    /// the last vertex back to the first is implied.
    pub fn fill_polygon(&mut self, vertices: &[Point], color: Rgba) {
        if vertices.len() < 3 {
            return;
        }

        let (min_y, max_y) = vertices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let Some((row_start, row_end)) = self.span(min_y, max_y, self.height()) else {
            return;
        };

        let mut crossings = Vec::with_capacity(vertices.len());
        for row in row_start..=row_end {
            let yc = f64::from(row) + 0.5;
            crossings.clear();

            for (i, a) in vertices.iter().enumerate() {
                let b = &vertices[(i + 1) % vertices.len()];
                if (a.y <= yc) != (b.y <= yc) {
                    crossings.push(a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(f64::total_cmp);

            for pair in crossings.chunks_exact(2) {
                self.fill_row_span(row, pair[0], pair[1], color);
            }
        }
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.plot_where(center, radius, color, |d| d <= radius);
    }

    /// Strokes a ring of the given pixel width centered on the circle.
    pub fn stroke_circle(&mut self, center: Point, radius: f64, width: f64, color: Rgba) {
        let half = stroke_half_width(width);
        self.plot_where(center, radius + half, color, |d| (d - radius).abs() <= half);
    }

    /// Strokes consecutive segments. The path is left open; pass the first
    /// vertex again at the end to close it.
    pub fn stroke_polyline(&mut self, points: &[Point], width: f64, color: Rgba) {
        let half = stroke_half_width(width);
        match points {
            [] => {}
            [only] => self.fill_circle(*only, half, color),
            _ => {
                for segment in points.windows(2) {
                    self.stroke_segment(segment[0], segment[1], half, color);
                }
            }
        }
    }

    fn stroke_segment(&mut self, a: Point, b: Point, half: f64, color: Rgba) {
        let Some((row_start, row_end)) =
            self.span(a.y.min(b.y) - half, a.y.max(b.y) + half, self.height())
        else {
            return;
        };
        let Some((col_start, col_end)) =
            self.span(a.x.min(b.x) - half, a.x.max(b.x) + half, self.width())
        else {
            return;
        };

        for row in row_start..=row_end {
            for col in col_start..=col_end {
                let p = Point::new(f64::from(col) + 0.5, f64::from(row) + 0.5);
                if distance_to_segment(p, a, b) <= half {
                    self.blend(col, row, color);
                }
            }
        }
    }

    /// Plots every pixel within `reach` of `center` whose center distance
    /// satisfies `covered`.
    fn plot_where(&mut self, center: Point, reach: f64, color: Rgba, covered: impl Fn(f64) -> bool) {
        let Some((row_start, row_end)) =
            self.span(center.y - reach, center.y + reach, self.height())
        else {
            return;
        };
        let Some((col_start, col_end)) =
            self.span(center.x - reach, center.x + reach, self.width())
        else {
            return;
        };

        for row in row_start..=row_end {
            for col in col_start..=col_end {
                let p = Point::new(f64::from(col) + 0.5, f64::from(row) + 0.5);
                if covered(p.distance_to(&center)) {
                    self.blend(col, row, color);
                }
            }
        }
    }

    fn fill_row_span(&mut self, row: u32, x0: f64, x1: f64, color: Rgba) {
        // pixel `col` is inside when x0 <= col + 0.5 < x1
        let first = (x0 - 0.5).ceil().max(0.0);
        let last = ((x1 - 0.5).ceil() - 1.0).min(f64::from(self.width()) - 1.0);
        if !first.is_finite() || !last.is_finite() || first > last {
            return;
        }
        for col in first as u32..=last as u32 {
            self.blend(col, row, color);
        }
    }

    /// Pixel indices whose centers may fall within `lo..=hi`, clipped to
    /// `0..limit`.
    fn span(&self, lo: f64, hi: f64, limit: u32) -> Option<(u32, u32)> {
        if limit == 0 || !lo.is_finite() || !hi.is_finite() {
            return None;
        }
        let start = (lo - 0.5).floor().max(0.0);
        let end = (hi - 0.5).ceil().min(f64::from(limit) - 1.0);
        (start <= end).then(|| (start as u32, end as u32))
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba) {
        let src = color.to_rgba8();
        let pixel = self.image.get_pixel_mut(x, y);
        if src[3] == 255 {
            pixel.0 = src;
            return;
        }

        let alpha = color.a;
        for (dst, s) in pixel.0.iter_mut().take(3).zip(src) {
            *dst = (f64::from(s) * alpha + f64::from(*dst) * (1.0 - alpha)).round() as u8;
        }
        let dst_alpha = f64::from(pixel.0[3]) / 255.0;
        pixel.0[3] = ((alpha + dst_alpha * (1.0 - alpha)) * 255.0).round() as u8;
    }
}

fn stroke_half_width(width: f64) -> f64 {
    width.max(MIN_STROKE_PIXELS) / 2.0
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance_to(&a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(&Point::new(a.x + t * dx, a.y + t * dy))
}
