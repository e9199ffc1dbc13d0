//! Figure composition: one image, an optional title and legend, cropped to the tight
//! bounding box of everything drawn.

use std::path::Path;

use anyhow::Context as _;
use resvg::tiny_skia;

use crate::{
    assets::glyph::{GlyphBitmap, GlyphRasterizer, TextStyle},
    foundation::{
        core::{Canvas, Rect, Rgba8},
        error::{CloudError, CloudResult},
    },
};

/// Padding around the tight bounding box, in inches.
pub const TIGHT_PAD_IN: f64 = 0.1;

// Avoid pathological allocations.
const MAX_DIM: u32 = 16_384;

const POINTS_PER_INCH: f64 = 72.0;
const TEXT_COLOR: Rgba8 = Rgba8::BLACK;
const LEGEND_EDGE: Rgba8 = Rgba8::opaque(204, 204, 204);

#[derive(Clone, Debug, PartialEq)]
pub struct Title {
    pub text: String,
    pub font_pt: f64,
    pub bold: bool,
    /// Gap between the title and the top of the image, in points.
    pub pad_pt: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub color: Rgba8,
    pub label: String,
}

/// Legend box anchored by its upper-right corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
    /// Anchor in axes fractions: `(1.0, 1.0)` is the image's top-right corner, x grows right
    /// and y grows up.
    pub anchor: (f64, f64),
    pub font_pt: f64,
}

impl Legend {
    pub fn upper_right(entries: Vec<LegendEntry>, anchor: (f64, f64)) -> Self {
        Self {
            entries,
            anchor,
            font_pt: 10.0,
        }
    }
}

/// A placed text run, in output pixels.
#[derive(Clone, Debug)]
pub struct PlacedText {
    pub rect: Rect,
    pub glyph: GlyphBitmap,
}

#[derive(Clone, Debug)]
pub struct LegendLayout {
    pub frame: Rect,
    pub rows: Vec<(Rect, Rgba8, PlacedText)>,
}

/// Resolved figure geometry in output pixels.
#[derive(Clone, Debug)]
pub struct FigureLayout {
    pub canvas: Canvas,
    pub image: Option<Rect>,
    pub title: Option<PlacedText>,
    pub legend: Option<LegendLayout>,
}

#[derive(Clone, Debug)]
pub struct Figure {
    width_in: f64,
    height_in: f64,
    background: Rgba8,
    title: Option<Title>,
    image: Option<image::RgbaImage>,
    legend: Option<Legend>,
}

impl Figure {
    pub fn new(width_in: f64, height_in: f64) -> Self {
        Self {
            width_in,
            height_in,
            background: Rgba8::WHITE,
            title: None,
            image: None,
            legend: None,
        }
    }

    pub fn title(mut self, text: impl Into<String>, font_pt: f64, bold: bool) -> Self {
        self.title = Some(Title {
            text: text.into(),
            font_pt,
            bold,
            pad_pt: 6.0,
        });
        self
    }

    /// Gap between title and image, in points.
    pub fn title_pad(mut self, pad_pt: f64) -> Self {
        if let Some(t) = &mut self.title {
            t.pad_pt = pad_pt;
        }
        self
    }

    pub fn image(mut self, img: image::RgbaImage) -> Self {
        self.image = Some(img);
        self
    }

    pub fn legend(mut self, legend: Legend) -> Self {
        self.legend = Some(legend);
        self
    }

    /// Lay out every artist at `dpi` and crop to their union plus [`TIGHT_PAD_IN`].
    pub fn layout(&self, dpi: f64, text: &dyn GlyphRasterizer) -> CloudResult<FigureLayout> {
        if !dpi.is_finite() || dpi <= 0.0 {
            return Err(CloudError::validation(format!("dpi must be positive, got {dpi}")));
        }
        if !(self.width_in > 0.0 && self.height_in > 0.0) {
            return Err(CloudError::validation(format!(
                "figure size must be positive, got {}x{} in",
                self.width_in, self.height_in
            )));
        }

        let pt = dpi / POINTS_PER_INCH;
        let fig = Rect::new(0.0, 0.0, self.width_in * dpi, self.height_in * dpi);
        // Outer padding of a tight layout: 1.08 x the 10 pt default font size.
        let outer = 1.08 * 10.0 * pt;

        let title_glyph = match &self.title {
            Some(t) => {
                let size_px = (t.font_pt * pt) as f32;
                let style = if t.bold {
                    TextStyle::bold(size_px)
                } else {
                    TextStyle::regular(size_px)
                };
                Some(text.rasterize(&t.text, style)?)
            }
            None => None,
        };
        let title_band = match (&self.title, &title_glyph) {
            (Some(t), Some(g)) => f64::from(g.height) + t.pad_pt * pt,
            _ => 0.0,
        };

        let axes = Rect::new(
            fig.x0 + outer,
            fig.y0 + outer + title_band,
            fig.x1 - outer,
            fig.y1 - outer,
        );
        if axes.width() <= 0.0 || axes.height() <= 0.0 {
            return Err(CloudError::render("figure too small for its title"));
        }

        let image_rect = self
            .image
            .as_ref()
            .map(|img| fit_aspect(axes, f64::from(img.width()), f64::from(img.height())));
        let content = image_rect.unwrap_or(axes);

        let title = match (&self.title, title_glyph) {
            (Some(t), Some(glyph)) => {
                let w = f64::from(glyph.width);
                let h = f64::from(glyph.height);
                let x0 = content.center().x - w / 2.0;
                let y1 = content.y0 - t.pad_pt * pt;
                Some(PlacedText {
                    rect: Rect::new(x0, y1 - h, x0 + w, y1),
                    glyph,
                })
            }
            _ => None,
        };

        let legend = match &self.legend {
            Some(l) if !l.entries.is_empty() => Some(layout_legend(l, content, pt, text)?),
            _ => None,
        };

        let mut bounds = content;
        if let Some(t) = &title {
            bounds = bounds.union(t.rect);
        }
        if let Some(l) = &legend {
            bounds = bounds.union(l.frame);
        }
        let bounds = bounds.inflate(TIGHT_PAD_IN * dpi, TIGHT_PAD_IN * dpi);
        let origin = (bounds.x0.floor(), bounds.y0.floor());

        let width = (bounds.x1.ceil() - origin.0) as u32;
        let height = (bounds.y1.ceil() - origin.1) as u32;
        if width > MAX_DIM || height > MAX_DIM {
            return Err(CloudError::render(format!(
                "figure raster too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
            )));
        }
        let canvas = Canvas::new(width, height)?;

        let shift = |r: Rect| r - kurbo::Vec2::new(origin.0, origin.1);
        Ok(FigureLayout {
            canvas,
            image: image_rect.map(shift),
            title: title.map(|t| PlacedText {
                rect: shift(t.rect),
                glyph: t.glyph,
            }),
            legend: legend.map(|l| LegendLayout {
                frame: shift(l.frame),
                rows: l
                    .rows
                    .into_iter()
                    .map(|(swatch, color, label)| {
                        (
                            shift(swatch),
                            color,
                            PlacedText {
                                rect: shift(label.rect),
                                glyph: label.glyph,
                            },
                        )
                    })
                    .collect(),
            }),
        })
    }

    /// Rasterize the figure at `dpi`.
    #[tracing::instrument(skip(self, text), fields(has_title = self.title.is_some()))]
    pub fn render(&self, dpi: f64, text: &dyn GlyphRasterizer) -> CloudResult<image::RgbaImage> {
        let layout = self.layout(dpi, text)?;
        let canvas = layout.canvas;

        let mut pixmap = tiny_skia::Pixmap::new(canvas.width, canvas.height)
            .ok_or_else(|| CloudError::render("failed to allocate figure pixmap"))?;
        pixmap.fill(self.background.to_skia());

        if let (Some(img), Some(rect)) = (&self.image, layout.image) {
            let src = rgba_to_pixmap(img)?;
            let sx = (rect.width() / f64::from(img.width())) as f32;
            let sy = (rect.height() / f64::from(img.height())) as f32;
            let paint = tiny_skia::PixmapPaint {
                quality: tiny_skia::FilterQuality::Bilinear,
                ..Default::default()
            };
            pixmap.draw_pixmap(
                0,
                0,
                src.as_ref(),
                &paint,
                tiny_skia::Transform::from_row(sx, 0.0, 0.0, sy, rect.x0 as f32, rect.y0 as f32),
                None,
            );
        }

        if let Some(title) = &layout.title {
            draw_coverage(&mut pixmap, &title.glyph, title.rect, TEXT_COLOR);
        }

        if let Some(legend) = &layout.legend {
            draw_legend(&mut pixmap, legend, dpi / POINTS_PER_INCH)?;
        }

        tracing::debug!(width = canvas.width, height = canvas.height, "figure rendered");
        Ok(pixmap_to_rgba(&pixmap))
    }
}

/// Largest rect with aspect `w:h` centered inside `outer`.
fn fit_aspect(outer: Rect, w: f64, h: f64) -> Rect {
    let scale = (outer.width() / w).min(outer.height() / h);
    let (fw, fh) = (w * scale, h * scale);
    let c = outer.center();
    Rect::new(c.x - fw / 2.0, c.y - fh / 2.0, c.x + fw / 2.0, c.y + fh / 2.0)
}

fn layout_legend(
    legend: &Legend,
    content: Rect,
    pt: f64,
    text: &dyn GlyphRasterizer,
) -> CloudResult<LegendLayout> {
    let em = legend.font_pt * pt;
    let border_pad = 0.4 * em;
    let axes_pad = 0.5 * em;
    let handle_w = 2.0 * em;
    let handle_h = 0.7 * em;
    let text_pad = 0.8 * em;
    let spacing = 0.5 * em;

    let mut labels = Vec::with_capacity(legend.entries.len());
    for entry in &legend.entries {
        labels.push(text.rasterize(&entry.label, TextStyle::regular(em as f32))?);
    }
    let label_w = labels.iter().map(|g| f64::from(g.width)).fold(0.0, f64::max);
    let row_h = labels
        .iter()
        .map(|g| f64::from(g.height))
        .fold(em, f64::max);

    let n = legend.entries.len() as f64;
    let frame_w = 2.0 * border_pad + handle_w + text_pad + label_w;
    let frame_h = 2.0 * border_pad + n * row_h + (n - 1.0).max(0.0) * spacing;

    let anchor_x = content.x0 + legend.anchor.0 * content.width();
    let anchor_y = content.y1 - legend.anchor.1 * content.height();
    let x1 = anchor_x - axes_pad;
    let y0 = anchor_y + axes_pad;
    let frame = Rect::new(x1 - frame_w, y0, x1, y0 + frame_h);

    let mut rows = Vec::with_capacity(labels.len());
    for (i, (entry, glyph)) in legend.entries.iter().zip(labels).enumerate() {
        let row_y0 = frame.y0 + border_pad + (i as f64) * (row_h + spacing);
        let row_cy = row_y0 + row_h / 2.0;

        let hx0 = frame.x0 + border_pad;
        let swatch = Rect::new(hx0, row_cy - handle_h / 2.0, hx0 + handle_w, row_cy + handle_h / 2.0);

        let lx0 = hx0 + handle_w + text_pad;
        let (gw, gh) = (f64::from(glyph.width), f64::from(glyph.height));
        let label_rect = Rect::new(lx0, row_cy - gh / 2.0, lx0 + gw, row_cy + gh / 2.0);

        rows.push((
            swatch,
            entry.color,
            PlacedText {
                rect: label_rect,
                glyph,
            },
        ));
    }

    Ok(LegendLayout { frame, rows })
}

fn to_skia_rect(r: Rect) -> CloudResult<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(r.x0 as f32, r.y0 as f32, r.width() as f32, r.height() as f32)
        .ok_or_else(|| CloudError::render(format!("degenerate rect {r:?}")))
}

fn draw_legend(pixmap: &mut tiny_skia::Pixmap, legend: &LegendLayout, pt: f64) -> CloudResult<()> {
    let frame = to_skia_rect(legend.frame)?;
    let path = tiny_skia::PathBuilder::from_rect(frame);

    let mut fill = tiny_skia::Paint::default();
    fill.set_color(tiny_skia::Color::from_rgba8(255, 255, 255, 204));
    pixmap.fill_path(
        &path,
        &fill,
        tiny_skia::FillRule::Winding,
        tiny_skia::Transform::identity(),
        None,
    );

    let mut edge = tiny_skia::Paint::default();
    edge.set_color(LEGEND_EDGE.to_skia());
    edge.anti_alias = true;
    let stroke = tiny_skia::Stroke {
        width: (0.8 * pt) as f32,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &edge, &stroke, tiny_skia::Transform::identity(), None);

    for (swatch, color, label) in &legend.rows {
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(color.to_skia());
        pixmap.fill_rect(to_skia_rect(*swatch)?, &paint, tiny_skia::Transform::identity(), None);
        draw_coverage(pixmap, &label.glyph, label.rect, TEXT_COLOR);
    }
    Ok(())
}

/// Source-over `color` through `glyph` coverage, top-left at `rect`'s origin.
fn draw_coverage(pixmap: &mut tiny_skia::Pixmap, glyph: &GlyphBitmap, rect: Rect, color: Rgba8) {
    let (pw, ph) = (pixmap.width() as i64, pixmap.height() as i64);
    let x0 = rect.x0.round() as i64;
    let y0 = rect.y0.round() as i64;
    let data = pixmap.data_mut();

    for gy in 0..glyph.height {
        let y = y0 + i64::from(gy);
        if y < 0 || y >= ph {
            continue;
        }
        for gx in 0..glyph.width {
            let x = x0 + i64::from(gx);
            if x < 0 || x >= pw {
                continue;
            }
            let cov = u32::from(glyph.coverage_at(gx, gy));
            if cov == 0 {
                continue;
            }

            let sa = cov * u32::from(color.a) / 255;
            let src = [
                u32::from(color.r) * sa / 255,
                u32::from(color.g) * sa / 255,
                u32::from(color.b) * sa / 255,
                sa,
            ];
            let i = ((y * pw + x) * 4) as usize;
            for (c, s) in src.iter().enumerate() {
                let d = u32::from(data[i + c]);
                data[i + c] = (s + d * (255 - sa) / 255).min(255) as u8;
            }
        }
    }
}

fn rgba_to_pixmap(img: &image::RgbaImage) -> CloudResult<tiny_skia::Pixmap> {
    let mut pixmap = tiny_skia::Pixmap::new(img.width(), img.height())
        .ok_or_else(|| CloudError::render("cannot draw an empty image"))?;
    for (dst, px) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = px.0;
        *dst = tiny_skia::ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

fn pixmap_to_rgba(pixmap: &tiny_skia::Pixmap) -> image::RgbaImage {
    let mut out = image::RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

/// Write `img` as PNG, creating parent directories.
pub fn save_png(img: &image::RgbaImage, path: &Path) -> CloudResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        path,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/figure/figure.rs"]
mod tests;
