//! Palette printer
//!
//! Renders each entry of a [`ColorTable`] as a brace-enclosed RGB literal
//! followed by a line comment naming the color:
//!
//! ```
//! use grainplot::palette::format_entry;
//! use grainplot::Rgba;
//!
//! let line = format_entry("gold", &Rgba::rgb(1.0, 0.83922, 0.0));
//! assert_eq!(line, "{1.00000, 0.83922, 0.00000}, //gold");
//! ```

use crate::color::Rgba;
use crate::error::{GrainError, Result};
use crate::table::ColorTable;
use std::io::Write;

/// Digits after the decimal point for each channel.
pub const CHANNEL_PRECISION: usize = 5;

/// Formats one palette line, without a trailing newline. Alpha is not
/// printed.
pub fn format_entry(name: &str, color: &Rgba) -> String {
    format!(
        "{{{:.prec$}, {:.prec$}, {:.prec$}}}, //{}",
        color.r,
        color.g,
        color.b,
        name,
        prec = CHANNEL_PRECISION
    )
}

/// Resolves every name in table order and returns the formatted lines.
pub fn palette_lines(table: &dyn ColorTable) -> Result<Vec<String>> {
    table
        .names()
        .into_iter()
        .map(|name| {
            let color = table.resolve(name).map_err(unavailable)?;
            Ok(format_entry(name, &color))
        })
        .collect()
}

/// Writes one line per table entry, in table order, and returns the number
/// of lines written.
///
/// Each line is written as soon as its color resolves, so a lookup failure
/// leaves the earlier lines in `out`.
pub fn write_palette<W: Write + ?Sized>(table: &dyn ColorTable, out: &mut W) -> Result<usize> {
    let mut written = 0;
    for name in table.names() {
        let color = table.resolve(name).map_err(unavailable)?;
        writeln!(out, "{}", format_entry(name, &color))?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

fn unavailable(err: GrainError) -> GrainError {
    match err {
        GrainError::ColorTableUnavailable(_) => err,
        other => GrainError::ColorTableUnavailable(other.to_string()),
    }
}
