//! Basic geometric types and the world-to-pixel transform

use crate::error::{GrainError, Result};

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0)
    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned world region, `min < max` on both axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Bounds {
    /// Create bounds, rejecting empty, inverted or non-finite ranges
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self> {
        let values = [xmin, xmax, ymin, ymax];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GrainError::InvalidBounds(format!(
                "non-finite bounds {values:?}"
            )));
        }
        if xmin >= xmax {
            return Err(GrainError::InvalidBounds(format!(
                "xmin ({xmin}) must be less than xmax ({xmax})"
            )));
        }
        if ymin >= ymax {
            return Err(GrainError::InvalidBounds(format!(
                "ymin ({ymin}) must be less than ymax ({ymax})"
            )));
        }
        Ok(Self {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    /// Get the width
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Get the height
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Get the center point
    pub fn center(&self) -> Point {
        Point::new(
            (self.xmin + self.xmax) / 2.0,
            (self.ymin + self.ymax) / 2.0,
        )
    }

    /// Grow every side by `margin` times the range on that axis
    pub fn expand(&self, margin: f64) -> Self {
        let dx = self.width() * margin;
        let dy = self.height() * margin;
        Self {
            xmin: self.xmin - dx,
            xmax: self.xmax + dx,
            ymin: self.ymin - dy,
            ymax: self.ymax + dy,
        }
    }
}

/// Maps world coordinates (y up) onto a pixel grid (y down).
///
/// The drawing keeps its aspect ratio and is centered on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    world: Bounds,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    height: f64,
}

impl Viewport {
    pub fn fit(bounds: &Bounds, margin: f64, width: u32, height: u32) -> Self {
        let world = bounds.expand(margin.max(0.0));
        let (w, h) = (f64::from(width), f64::from(height));

        let scale = (w / world.width()).min(h / world.height());
        let offset_x = (w - world.width() * scale) / 2.0;
        let offset_y = (h - world.height() * scale) / 2.0;

        Self {
            world,
            scale,
            offset_x,
            offset_y,
            height: h,
        }
    }

    /// Pixels per world unit
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The visible world region, margin included
    pub fn world(&self) -> &Bounds {
        &self.world
    }

    pub fn to_pixel(&self, p: Point) -> Point {
        Point::new(
            self.offset_x + (p.x - self.world.xmin) * self.scale,
            self.height - self.offset_y - (p.y - self.world.ymin) * self.scale,
        )
    }

    /// Converts a world-space length (radius, line width) to pixels
    pub fn to_pixels(&self, length: f64) -> f64 {
        length * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point() {
        let p = Point::new(10.0, 20.0);
        assert_eq!(p.x, 10.0);
        assert_eq!(p.y, 20.0);

        let origin = Point::origin();
        assert_eq!(origin.distance_to(&Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_bounds() {
        let bounds = Bounds::new(10.0, 110.0, 20.0, 70.0).unwrap();

        assert_eq!(bounds.width(), 100.0);
        assert_eq!(bounds.height(), 50.0);

        let center = bounds.center();
        assert_eq!(center.x, 60.0);
        assert_eq!(center.y, 45.0);
    }

    #[test]
    fn test_bounds_rejects_inverted_ranges() {
        assert!(Bounds::new(1.0, 1.0, 0.0, 1.0).is_err());
        assert!(Bounds::new(0.0, 1.0, 2.0, -2.0).is_err());
        assert!(Bounds::new(f64::NAN, 1.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_bounds_expand() {
        let bounds = Bounds::new(-10.0, 10.0, 0.0, 40.0).unwrap().expand(0.05);
        assert_eq!(bounds, Bounds::new(-11.0, 11.0, -2.0, 42.0).unwrap());
    }

    #[test]
    fn test_viewport_flips_y_axis() {
        let bounds = Bounds::new(0.0, 10.0, 0.0, 10.0).unwrap();
        let viewport = Viewport::fit(&bounds, 0.0, 100, 100);

        assert_eq!(viewport.scale(), 10.0);
        assert_eq!(viewport.to_pixel(Point::new(0.0, 0.0)), Point::new(0.0, 100.0));
        assert_eq!(viewport.to_pixel(Point::new(10.0, 10.0)), Point::new(100.0, 0.0));
    }

    #[test]
    fn test_viewport_centers_narrow_world() {
        // 1:2 world on a square canvas leaves equal bands left and right
        let bounds = Bounds::new(0.0, 5.0, 0.0, 10.0).unwrap();
        let viewport = Viewport::fit(&bounds, 0.0, 100, 100);

        assert_eq!(viewport.scale(), 10.0);
        assert_eq!(viewport.to_pixel(Point::new(0.0, 0.0)).x, 25.0);
        assert_eq!(viewport.to_pixel(Point::new(5.0, 0.0)).x, 75.0);
        assert_eq!(viewport.to_pixels(0.5), 5.0);
    }

    #[test]
    fn test_viewport_negative_margin_is_ignored() {
        let bounds = Bounds::new(0.0, 10.0, 0.0, 10.0).unwrap();
        assert_eq!(
            Viewport::fit(&bounds, -0.5, 100, 100),
            Viewport::fit(&bounds, 0.0, 100, 100)
        );
    }
}
