//! The two fixed visualizations of a schema mapping: a tier-colored cloud with a legend
//! (circular or rectangular) and a plain cloud with default colors.

use std::path::Path;

use crate::{
    assets::glyph::GlyphRasterizer,
    cloud::{color::tier_color, layout::Layout, layout::WordCloudOptions, mask::Mask},
    figure::{self, Figure, Legend, LegendEntry},
    foundation::error::CloudResult,
    schema::{SchemaMapping, Tier},
};

pub const CIRCULAR_PNG: &str = "schema_wordcloud_circular.png";
pub const RECTANGULAR_PNG: &str = "schema_wordcloud_rectangular.png";
pub const SIMPLE_PNG: &str = "simple_schema_wordcloud.png";

pub const CIRCULAR_TITLE: &str = "Invoice Schema - Circular Layout";
pub const RECTANGULAR_TITLE: &str = "Invoice Schema - Rectangular Layout";
pub const SIMPLE_TITLE: &str = "Invoice Schema Types - Size by Nesting Level";

pub const SCHEMA_DPI: f64 = 300.0;
pub const SIMPLE_DPI: f64 = 150.0;

/// Side of the square circular mask, in pixels.
pub const CIRCLE_MASK_SIZE: u32 = 400;

/// Inputs shared by every visualization in one run.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub text: &'a dyn GlyphRasterizer,
    /// Layout seed; clock-seeded when unset.
    pub seed: Option<u64>,
    /// Partial [`WordCloudOptions`] applied after the built-in settings.
    pub overrides: Option<&'a serde_json::Value>,
}

impl<'a> RenderContext<'a> {
    pub fn new(text: &'a dyn GlyphRasterizer) -> Self {
        Self {
            text,
            seed: None,
            overrides: None,
        }
    }
}

/// A laid-out cloud and the figure it is shown in.
#[derive(Clone, Debug)]
pub struct SchemaCloud {
    pub layout: Layout,
    pub figure: Figure,
    pub dpi: f64,
}

impl SchemaCloud {
    pub fn render(&self, text: &dyn GlyphRasterizer) -> CloudResult<image::RgbaImage> {
        self.figure.render(self.dpi, text)
    }

    /// Render and write the figure as PNG.
    pub fn save_png(&self, path: &Path, text: &dyn GlyphRasterizer) -> CloudResult<()> {
        let img = self.render(text)?;
        figure::save_png(&img, path)?;
        tracing::info!(path = %path.display(), width = img.width(), height = img.height(), "saved figure");
        Ok(())
    }
}

/// Layout settings of the tier-colored cloud.
pub fn schema_cloud_options(use_mask: bool) -> CloudResult<WordCloudOptions> {
    Ok(WordCloudOptions {
        width: 800,
        height: 600,
        background: "white".to_string(),
        max_words: 200,
        relative_scaling: 0.5,
        collocations: false,
        prefer_horizontal: 0.7,
        min_font_size: 12,
        max_font_size: Some(120),
        mask: if use_mask {
            Some(Mask::circular(CIRCLE_MASK_SIZE)?)
        } else {
            None
        },
        ..WordCloudOptions::default()
    })
}

/// Layout settings of the plain cloud.
pub fn simple_cloud_options() -> WordCloudOptions {
    WordCloudOptions {
        width: 800,
        height: 400,
        background: "white".to_string(),
        max_font_size: Some(100),
        min_font_size: 20,
        ..WordCloudOptions::default()
    }
}

pub fn tier_legend() -> Legend {
    let entries = Tier::ALL
        .into_iter()
        .map(|tier| LegendEntry {
            color: tier.legend_color(),
            label: tier.legend_label().to_string(),
        })
        .collect();
    Legend::upper_right(entries, (1.1, 1.0))
}

fn resolve_options(base: WordCloudOptions, ctx: &RenderContext<'_>) -> CloudResult<WordCloudOptions> {
    let mut opts = match ctx.overrides {
        Some(patch) => base.with_overrides(patch)?,
        None => base,
    };
    if ctx.seed.is_some() {
        opts.random_state = ctx.seed;
    }
    Ok(opts)
}

/// Tier-colored cloud of `schema` with a 5-entry legend, on a 12x8 inch figure.
#[tracing::instrument(skip(schema, ctx), fields(types = schema.len()))]
pub fn generate_schema_wordcloud(
    schema: &SchemaMapping,
    title: &str,
    use_mask: bool,
    ctx: &RenderContext<'_>,
) -> CloudResult<SchemaCloud> {
    let opts = resolve_options(schema_cloud_options(use_mask)?, ctx)?;

    let mut layout = opts.generate_from_frequencies(&schema.frequencies(), ctx.text)?;
    layout.recolor(tier_color)?;

    let figure = Figure::new(12.0, 8.0)
        .image(layout.to_image()?)
        .title(title, 16.0, true)
        .title_pad(20.0)
        .legend(tier_legend());

    Ok(SchemaCloud {
        layout,
        figure,
        dpi: SCHEMA_DPI,
    })
}

/// Cloud of `schema` with the default color function, on a 10x5 inch figure.
#[tracing::instrument(skip(schema, ctx), fields(types = schema.len()))]
pub fn generate_simple_wordcloud(
    schema: &SchemaMapping,
    ctx: &RenderContext<'_>,
) -> CloudResult<SchemaCloud> {
    let opts = resolve_options(simple_cloud_options(), ctx)?;
    let layout = opts.generate_from_frequencies(&schema.frequencies(), ctx.text)?;

    let figure = Figure::new(10.0, 5.0)
        .image(layout.to_image()?)
        .title(SIMPLE_TITLE, 14.0, true);

    Ok(SchemaCloud {
        layout,
        figure,
        dpi: SIMPLE_DPI,
    })
}

#[cfg(test)]
#[path = "../tests/unit/showcase.rs"]
mod tests;
