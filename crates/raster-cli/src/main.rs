//! Command-line front end for `mono-raster`.
//!
//! Loads an image, rasterizes it for a thermal print head, and writes the
//! binary result as a PNG preview. Defaults come from `RASTER_*` environment
//! variables (optionally via `.env`); flags override them.

mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::RasterConfig;
use mono_raster::{FitMode, PixelBuffer, rasterize, rasterize_to_width};

#[derive(Parser)]
#[command(name = "raster-cli")]
#[command(about = "Dither an image to black and white for thermal printing")]
struct Cli {
    /// Source image (PNG, JPEG, GIF or BMP)
    input: PathBuf,

    /// Output PNG file path
    #[arg(short, long)]
    output: PathBuf,

    /// Output width in dots (default: RASTER_WIDTH or 384)
    #[arg(short, long)]
    width: Option<u32>,

    /// Output height in dots (default: RASTER_HEIGHT or 384)
    #[arg(long)]
    height: Option<u32>,

    /// Fit mode: fit, fill, center or stretch
    #[arg(short, long)]
    mode: Option<FitMode>,

    /// Black/white cutoff between 0.0 and 1.0
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Error weight per diffusion neighbor between 0.0 and 1.0
    #[arg(short, long)]
    quant_weight: Option<f32>,

    /// Gray level for letterbox padding
    #[arg(long)]
    pad: Option<u8>,

    /// Keep the source aspect ratio, deriving height from width
    #[arg(long)]
    to_width: bool,
}

impl Cli {
    /// Flags take precedence over environment settings.
    fn apply_to(&self, config: &mut RasterConfig) {
        if let Some(v) = self.width {
            config.width = v;
        }
        if let Some(v) = self.height {
            config.height = v;
        }
        if let Some(v) = self.mode {
            config.mode = v;
        }
        if let Some(v) = self.threshold {
            config.threshold = v;
        }
        if let Some(v) = self.quant_weight {
            config.quant_weight = v;
        }
        if let Some(v) = self.pad {
            config.pad = v;
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {e}");
    }

    let cli = Cli::parse();
    let mut config = RasterConfig::load();
    cli.apply_to(&mut config);
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid raster settings")?;

    let decoded = image::open(&cli.input)
        .with_context(|| format!("failed to open {}", cli.input.display()))?;
    let source = PixelBuffer::from(decoded);
    info!(
        width = source.width(),
        height = source.height(),
        input = %cli.input.display(),
        "Loaded source image"
    );

    let opts = config.to_options();
    let bitmap = if cli.to_width {
        rasterize_to_width(&source, config.width, &opts)?
    } else {
        rasterize(&source, &opts)?
    };

    let (width, height) = bitmap.dimensions();
    bitmap
        .into_dynamic()?
        .save(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    info!(width, height, output = %cli.output.display(), "Wrote dithered bitmap");
    Ok(())
}
