use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use grainplot::batch::{render_directory, resolve_parallelism, BatchOptions};
use grainplot::render::{DEFAULT_HEIGHT, DEFAULT_MARGIN, DEFAULT_WIDTH};
use grainplot::{write_palette, Bounds, NamedColorTable, Palette, RenderOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "grainplot",
    about = "Color palettes and frame rendering for granular simulations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaletteArg {
    /// The ten tab:* colors
    Tableau,
    /// The single-letter colors b, g, r, c, m, y, k, w
    Base,
}

impl From<PaletteArg> for Palette {
    fn from(arg: PaletteArg) -> Self {
        match arg {
            PaletteArg::Tableau => Palette::Tableau,
            PaletteArg::Base => Palette::Base,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print a color table as `{r, g, b}, //name` lines
    Palette {
        /// Built-in palette to print
        #[arg(short, long, value_enum, default_value = "tableau")]
        palette: PaletteArg,

        /// Read `name color` pairs from this file instead
        #[arg(short, long, conflicts_with = "palette")]
        table: Option<PathBuf>,
    },

    /// Render every *.xy frame in a directory to a PNG beside it
    Render {
        /// Directory containing .xy frames
        dir: PathBuf,

        /// Worker threads (0 or less uses one per CPU)
        #[arg(allow_negative_numbers = true)]
        threads: i64,

        /// Left edge of the world region
        #[arg(allow_negative_numbers = true)]
        xmin: f64,

        /// Right edge of the world region
        #[arg(allow_negative_numbers = true)]
        xmax: f64,

        /// Bottom edge of the world region
        #[arg(allow_negative_numbers = true)]
        ymin: f64,

        /// Top edge of the world region
        #[arg(allow_negative_numbers = true)]
        ymax: f64,

        /// Extra room on each side as a fraction of the range (negative means 0)
        #[arg(allow_negative_numbers = true)]
        margin: Option<f64>,

        /// Image width in pixels
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value_t = DEFAULT_HEIGHT)]
        height: u32,

        /// Color table whose entries, in order, color grain types 0, 1, 2...
        #[arg(long)]
        table: Option<PathBuf>,

        /// Skip remaining frames after the first failure
        #[arg(long)]
        stop_on_error: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "grainplot=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Palette { palette, table } => {
            let table = match table {
                Some(path) => load_table(&path)?,
                None => NamedColorTable::builtin(palette.into()),
            };

            let stdout = io::stdout();
            write_palette(&table, &mut stdout.lock()).context("failed to print palette")?;
        }

        Commands::Render {
            dir,
            threads,
            xmin,
            xmax,
            ymin,
            ymax,
            margin,
            width,
            height,
            table,
            stop_on_error,
        } => {
            let bounds = Bounds::new(xmin, xmax, ymin, ymax).context("invalid world region")?;
            let mut render = RenderOptions::new(bounds)
                .with_size(width, height)
                .with_margin(margin.unwrap_or(DEFAULT_MARGIN));

            if let Some(path) = table {
                let colors: Vec<_> = load_table(&path)?
                    .resolve_all()
                    .with_context(|| format!("color table {}", path.display()))?
                    .into_iter()
                    .map(|(_, color)| color)
                    .collect();
                ensure!(!colors.is_empty(), "color table {} is empty", path.display());
                render = render.with_palette(colors);
            }

            let batch = BatchOptions::default()
                .with_workers(resolve_parallelism(threads))
                .stop_on_error(stop_on_error)
                .with_progress(|progress| info!("{progress}"));

            let summary = render_directory(&dir, render, batch)
                .with_context(|| format!("failed to render frames in {}", dir.display()))?;

            print!("{summary}");

            if summary.failed > 0 {
                bail!(
                    "{} of {} frames failed to render",
                    summary.failed,
                    summary.total
                );
            }
        }
    }

    Ok(())
}

fn load_table(path: &Path) -> Result<NamedColorTable> {
    NamedColorTable::load(path).with_context(|| format!("failed to load {}", path.display()))
}
