//! Pieces shared by the two binaries: flags, logging setup and text engine selection.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

use crate::{
    assets::{
        fonts::{DEFAULT_FONT_FAMILY, FontBook, default_font_dir},
        glyph::{BlockGlyphRasterizer, GlyphRasterizer, SvgGlyphRasterizer},
    },
    cloud::layout::Layout,
    foundation::error::{CloudError, CloudResult},
};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn,schema_cloud=info";

#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    /// Directory the images are written to.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Layout seed. Clock-seeded when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Extra directory with .ttf/.otf/.ttc files (defaults to ./fonts when present).
    #[arg(long)]
    pub font_dir: Option<PathBuf>,

    /// Draw words as solid blocks instead of font glyphs.
    #[arg(long, default_value_t = false)]
    pub block_text: bool,

    /// Print the resolved font face and its SHA-256 to stderr.
    #[arg(long, default_value_t = false)]
    pub dump_fonts: bool,

    /// Also write each cloud as SVG next to its PNG.
    #[arg(long, default_value_t = false)]
    pub svg: bool,

    /// More logging (-v debug, -vv trace). Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Install the stderr `fmt` subscriber so stdout only carries the reports.
pub fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new(DEFAULT_LOG_FILTER),
        1 => EnvFilter::new("warn,schema_cloud=debug"),
        _ => EnvFilter::new("warn,schema_cloud=trace"),
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Text engine chosen for a run.
pub struct TextEngine {
    pub fonts: Option<FontBook>,
    rasterizer: Box<dyn GlyphRasterizer>,
}

impl TextEngine {
    /// Font glyphs, or solid blocks with `--block-text`. Fails when no font face is installed.
    pub fn from_args(args: &CommonArgs) -> CloudResult<Self> {
        if args.block_text {
            return Ok(Self::block());
        }

        let fonts = match args.font_dir.clone().or_else(default_font_dir) {
            Some(dir) => FontBook::load(Some(&dir)),
            None => FontBook::system(),
        };
        Self::from_fonts(fonts)
    }

    pub fn from_fonts(fonts: FontBook) -> CloudResult<Self> {
        if fonts.is_empty() {
            return Err(CloudError::render(
                "no font face available; install fonts, pass --font-dir, or use --block-text",
            ));
        }
        tracing::debug!(faces = fonts.face_count(), "using font glyphs");

        Ok(Self {
            rasterizer: Box::new(SvgGlyphRasterizer::new(fonts.clone())),
            fonts: Some(fonts),
        })
    }

    pub fn block() -> Self {
        Self {
            fonts: None,
            rasterizer: Box::new(BlockGlyphRasterizer::default()),
        }
    }

    pub fn rasterizer(&self) -> &dyn GlyphRasterizer {
        self.rasterizer.as_ref()
    }

    /// One line per resolved face, for `--dump-fonts`.
    pub fn describe(&self) -> anyhow::Result<String> {
        let Some(fonts) = &self.fonts else {
            return Ok("font: none (block glyphs)".to_string());
        };
        let face = fonts
            .describe(DEFAULT_FONT_FAMILY)
            .context("resolve default font face")?;
        Ok(format!(
            "font: {} ({}) {} sha256={} faces={}",
            face.family,
            face.post_script_name,
            face.source,
            face.sha256,
            fonts.face_count()
        ))
    }
}

/// Read a JSON object of option overrides.
pub fn read_overrides(path: &Path) -> anyhow::Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read options file '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse options json '{}'", path.display()))
}

/// Write `layout` as SVG beside `png_path`.
pub fn save_svg_beside(layout: &Layout, png_path: &Path) -> anyhow::Result<PathBuf> {
    let path = png_path.with_extension("svg");
    layout
        .save_svg(&path)
        .with_context(|| format!("write svg for '{}'", png_path.display()))?;
    Ok(path)
}

#[cfg(test)]
#[path = "../tests/unit/cli.rs"]
mod tests;
