//! # grainplot
//!
//! Named color palettes and PNG rendering for granular simulation frames.
//!
//! ## Features
//!
//! - **Palette Printing**: Emit a named color table as `{r, g, b}, //name` literals
//! - **Color Tables**: Built-in Tableau and base palettes, or tables loaded from text files
//! - **Frame Parsing**: Read `.xy` snapshots of circular and polygonal grains
//! - **Rendering**: Rasterize frames to PNG, coloring grains by type
//! - **Batch Processing**: Render whole directories of frames in parallel
//!
//! ## Quick Start
//!
//! ### Printing a palette
//!
//! ```rust
//! use grainplot::palette::write_palette;
//! use grainplot::{NamedColorTable, Palette, Result};
//!
//! # fn main() -> Result<()> {
//! let table = NamedColorTable::builtin(Palette::Tableau);
//! let mut out = Vec::new();
//! write_palette(&table, &mut out)?;
//!
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.starts_with("{0.12157, 0.46667, 0.70588}, //tab:blue\n"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Rendering a frame
//!
//! ```rust
//! use grainplot::{render_frame, Bounds, Frame, RenderOptions, Result};
//!
//! # fn main() -> Result<()> {
//! let frame = Frame::parse("0 1 0.0 0.0 0.5 3")?;
//! let options = RenderOptions::new(Bounds::new(-1.0, 1.0, -1.0, 1.0)?).with_size(64, 64);
//!
//! let image = render_frame(&frame, &options)?;
//! assert_eq!(image.dimensions(), (64, 64));
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod color;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod palette;
pub mod raster;
pub mod render;
pub mod table;

pub use batch::{render_directory, BatchOptions, BatchProcessor, BatchSummary};
pub use color::Rgba;
pub use error::{GrainError, Result};
pub use frame::{Circle, Frame, Polygon};
pub use geometry::{Bounds, Point, Viewport};
pub use palette::{format_entry, write_palette};
pub use render::{render_file, render_frame, RenderOptions};
pub use table::{ColorTable, NamedColorTable, Palette};

/// Current version of grainplot
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
