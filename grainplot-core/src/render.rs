//! Frame rendering
//!
//! Draws a [`Frame`] onto a white canvas: polygons first, then circles, each
//! in file order. Containers are filled white, grains take the palette color
//! for their type, and every body gets a black outline.

use crate::color::Rgba;
use crate::error::{GrainError, Result};
use crate::frame::{Body, Frame};
use crate::geometry::{Bounds, Point, Viewport};
use crate::raster::Canvas;
use crate::table::{ColorTable, NamedColorTable, Palette};
use image::RgbaImage;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 1000;
/// Fraction of the world range added on each side
pub const DEFAULT_MARGIN: f64 = 0.05;
/// Outline widths in world units
pub const GRAIN_BORDER_WIDTH: f64 = 0.01;
pub const CONTAINER_BORDER_WIDTH: f64 = 0.02;

/// Grain fill colors by type, `tab:red` first and the rest in Tableau order.
pub const GRAIN_COLOR_NAMES: &[&str] = &[
    "tab:red",
    "tab:blue",
    "tab:orange",
    "tab:green",
    "tab:purple",
    "tab:brown",
    "tab:pink",
    "tab:gray",
    "tab:olive",
    "tab:cyan",
];

/// Resolves `names` through `table`, in order.
pub fn resolve_palette(table: &dyn ColorTable, names: &[&str]) -> Result<Vec<Rgba>> {
    names.iter().map(|name| table.resolve(name)).collect()
}

/// Default grain fill colors.
pub fn grain_palette() -> Result<Vec<Rgba>> {
    resolve_palette(&NamedColorTable::builtin(Palette::Tableau), GRAIN_COLOR_NAMES)
}

/// Options for rendering frames
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// World region to draw
    pub bounds: Bounds,
    /// Extra room around `bounds`, as a fraction of its range
    pub margin: f64,
    pub grain_border_width: f64,
    pub container_border_width: f64,
    /// Grain colors indexed by type, wrapping around
    pub palette: Vec<Rgba>,
}

impl RenderOptions {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            bounds,
            margin: DEFAULT_MARGIN,
            grain_border_width: GRAIN_BORDER_WIDTH,
            container_border_width: CONTAINER_BORDER_WIDTH,
            palette: builtin_grain_palette(),
        }
    }

    /// Set the canvas size
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the margin. Negative margins are clamped to zero.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin.max(0.0);
        self
    }

    pub fn with_border_widths(mut self, grain: f64, container: f64) -> Self {
        self.grain_border_width = grain;
        self.container_border_width = container;
        self
    }

    pub fn with_palette(mut self, palette: Vec<Rgba>) -> Self {
        self.palette = palette;
        self
    }

    /// Color for a grain type
    pub fn grain_color(&self, kind: i64) -> Rgba {
        if self.palette.is_empty() {
            return Rgba::gray(0.5);
        }
        let idx = kind.rem_euclid(self.palette.len() as i64) as usize;
        self.palette[idx]
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GrainError::InvalidBounds(format!(
                "canvas size {}x{} is empty",
                self.width, self.height
            )));
        }
        if !self.margin.is_finite() {
            return Err(GrainError::InvalidBounds(format!(
                "margin {} is not finite",
                self.margin
            )));
        }
        Ok(())
    }
}

/// [`GRAIN_COLOR_NAMES`] as 8-bit channels, so building options never fails.
const GRAIN_RGB8: [[u8; 3]; 10] = [
    [0xd6, 0x27, 0x28],
    [0x1f, 0x77, 0xb4],
    [0xff, 0x7f, 0x0e],
    [0x2c, 0xa0, 0x2c],
    [0x94, 0x67, 0xbd],
    [0x8c, 0x56, 0x4b],
    [0xe3, 0x77, 0xc2],
    [0x7f, 0x7f, 0x7f],
    [0xbc, 0xbd, 0x22],
    [0x17, 0xbe, 0xcf],
];

fn builtin_grain_palette() -> Vec<Rgba> {
    GRAIN_RGB8
        .iter()
        .map(|[r, g, b]| Rgba::from_rgba8(*r, *g, *b, 255))
        .collect()
}

/// Renders a frame to an RGBA image.
pub fn render_frame(frame: &Frame, options: &RenderOptions) -> Result<RgbaImage> {
    options.validate()?;

    let viewport = Viewport::fit(&options.bounds, options.margin, options.width, options.height);
    let mut canvas = Canvas::new(options.width, options.height, Rgba::white());

    let outline = Rgba::black();
    let grain_width = viewport.to_pixels(options.grain_border_width);
    let container_width = viewport.to_pixels(options.container_border_width);

    for polygon in &frame.polygons {
        if polygon.vertices.is_empty() {
            continue;
        }
        let points: Vec<Point> = polygon
            .vertices
            .iter()
            .map(|v| viewport.to_pixel(*v))
            .collect();

        let (fill, width) = if polygon.is_container() {
            (Rgba::white(), container_width)
        } else {
            (options.grain_color(polygon.kind), grain_width)
        };
        canvas.fill_polygon(&points, fill);
        canvas.stroke_polyline(&points, width, outline);
    }

    for circle in &frame.circles {
        let center = viewport.to_pixel(circle.center);
        let radius = viewport.to_pixels(circle.radius);

        let (fill, width) = if circle.is_container() {
            (Rgba::white(), container_width)
        } else {
            (options.grain_color(circle.kind), grain_width)
        };
        canvas.fill_circle(center, radius, fill);
        canvas.stroke_circle(center, radius, width, outline);
    }

    debug!(
        circles = frame.circles.len(),
        polygons = frame.polygons.len(),
        scale = viewport.scale(),
        "rendered frame"
    );

    Ok(canvas.into_image())
}

/// Reads a `.xy` frame and writes it as an image, format chosen by the
/// output extension.
pub fn render_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &RenderOptions,
) -> Result<()> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let frame = Frame::load(input)?;
    let image = render_frame(&frame, options)?;
    image.save(output)?;
    debug!(input = %input.display(), output = %output.display(), "saved frame");
    Ok(())
}
