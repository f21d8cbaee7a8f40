//! Prints the Tableau palette as `{r, g, b}, //name` lines, ready to paste
//! into a source file. Takes no arguments.

use anyhow::{Context, Result};
use grainplot::{write_palette, NamedColorTable, Palette};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let table = NamedColorTable::builtin(Palette::Tableau);
    let stdout = io::stdout();
    write_palette(&table, &mut stdout.lock()).context("failed to print palette")?;

    Ok(())
}
