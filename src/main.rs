use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use clap::{Parser, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber;

use pairstack::{
    error::{ComposeError, SaveError},
    sheet::contact_sheet,
    CombinerError, Config, PairingEngine, SlotId,
};

#[derive(Parser)]
#[command(
    name = "pairstack",
    version,
    about = "Pair stimulus images from two folders into vertical composites",
    long_about = "Pairstack scans two folders of stimulus images, pairs the currently selected \
image from each, stitches them vertically into a single composite, and saves the result. \
Grid view samples a rows x cols neighborhood of pairs around the current indices and \
assembles them into one contact sheet."
)]
struct Cli {
    /// Directory of top stimulus images
    #[arg(short, long)]
    top: PathBuf,

    /// Directory of bottom stimulus images
    #[arg(short, long)]
    bottom: PathBuf,

    /// Steps applied to the top slot index (may be negative, wraps around)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    top_offset: isize,

    /// Steps applied to the bottom slot index (may be negative, wraps around)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    bottom_offset: isize,

    /// View to render
    #[arg(long, value_enum, default_value_t = ViewMode::Single)]
    view: ViewMode,

    /// Grid rows (bottom slot samples); defaults to the configured value
    #[arg(long)]
    rows: Option<usize>,

    /// Grid columns (top slot samples); defaults to the configured value
    #[arg(long)]
    cols: Option<usize>,

    /// Output file, or a directory for a timestamped default name
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Which view the CLI renders. View-mode switching belongs to the
/// presentation layer; the engine only computes composites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewMode {
    /// One composite for the currently selected pair
    Single,
    /// A contact sheet sampling a grid of pairs around the current indices
    Grid,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting pairstack v{}", env!("CARGO_PKG_VERSION"));
    info!("Top: {:?}", cli.top);
    info!("Bottom: {:?}", cli.bottom);
    info!("Output: {:?}", cli.output);

    // Load configuration
    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };
    config.validate()?;

    if let Err(err) = run(&cli, config) {
        eprintln!("{}", err.user_message());
        return Err(err.into());
    }

    Ok(())
}

fn run(cli: &Cli, config: Config) -> pairstack::Result<()> {
    let grid = config.grid.clone();
    let background = config.compose.background;
    let default_format = config.output.default_format.clone();

    let mut engine = PairingEngine::new(config);
    engine.load_slot(SlotId::Top, &cli.top)?;
    engine.load_slot(SlotId::Bottom, &cli.bottom)?;

    engine.step(SlotId::Top, cli.top_offset);
    engine.step(SlotId::Bottom, cli.bottom_offset);

    let out_path = resolve_output_path(&cli.output, &default_format);

    match cli.view {
        ViewMode::Single => {
            let composite = engine.compose_current()?;
            info!("{}", composite.caption());
            engine.save(&composite, &out_path)?;
        }
        ViewMode::Grid => {
            if engine.slot(SlotId::Top).is_empty() || engine.slot(SlotId::Bottom).is_empty() {
                return Err(ComposeError::NotReady.into());
            }

            let rows = cli.rows.unwrap_or(grid.max_rows);
            let cols = cli.cols.unwrap_or(grid.max_cols);

            let batch = engine.compose_batch(rows, cols);
            let (rows, cols) = batch.shape();
            let cells: Vec<_> = batch.collect();

            if cells.len() < rows * cols {
                info!(
                    "{} of {} grid cells could not be composed",
                    rows * cols - cells.len(),
                    rows * cols
                );
            }

            let sheet = contact_sheet(&cells, cols, grid.cell_width, background)
                .ok_or_else(|| CombinerError::generic("no grid cells could be composed"))?;

            sheet.save(&out_path).map_err(|e| SaveError::WriteFailed {
                path: out_path.display().to_string(),
                reason: e.to_string(),
            })?;
            info!(
                "saved {}x{} contact sheet ({} cells) to {:?}",
                cols,
                rows,
                cells.len(),
                out_path
            );
        }
    }

    Ok(())
}

/// A directory output turns into a timestamped default filename inside it
fn resolve_output_path(output: &Path, default_format: &str) -> PathBuf {
    if output.is_dir() {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        output.join(format!("pairstack_{stamp}.{default_format}"))
    } else {
        output.to_path_buf()
    }
}
