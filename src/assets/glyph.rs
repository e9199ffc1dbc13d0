use crate::{
    assets::fonts::{DEFAULT_FONT_FAMILY, FontBook},
    foundation::error::{CloudError, CloudResult},
};

/// Font size and weight for one run of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size_px: f32,
    pub bold: bool,
}

impl TextStyle {
    pub fn regular(size_px: f32) -> Self {
        Self {
            size_px,
            bold: false,
        }
    }

    pub fn bold(size_px: f32) -> Self {
        Self {
            size_px,
            bold: true,
        }
    }
}

/// 8-bit coverage raster of one text run.
///
/// `origin_x`/`origin_y` locate the bitmap's top-left pixel relative to the text origin
/// (baseline start), in unrotated text space.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub coverage: Vec<u8>,
}

impl GlyphBitmap {
    pub fn coverage_at(&self, x: u32, y: u32) -> u8 {
        self.coverage[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Rotate 90 degrees counter-clockwise. The origin fields are carried over unchanged.
    pub fn rotated_ccw(&self) -> Self {
        let (w, h) = (self.width, self.height);
        let mut coverage = vec![0u8; self.coverage.len()];
        for r in 0..h {
            for c in 0..w {
                // (c, r) -> (r, w - 1 - c) in a bitmap that is h wide.
                let nx = r as usize;
                let ny = (w - 1 - c) as usize;
                coverage[ny * (h as usize) + nx] = self.coverage_at(c, r);
            }
        }

        Self {
            width: h,
            height: w,
            origin_x: self.origin_x,
            origin_y: self.origin_y,
            coverage,
        }
    }

    pub fn ink_pixels(&self) -> usize {
        self.coverage.iter().filter(|&&a| a > 0).count()
    }
}

/// Turns text into coverage bitmaps. Layout and figure code only see this seam.
pub trait GlyphRasterizer {
    fn rasterize(&self, text: &str, style: TextStyle) -> CloudResult<GlyphBitmap>;

    /// CSS family stack that reproduces these glyphs when emitted as SVG text.
    fn font_family(&self) -> &str;
}

/// Rasterizes text by rendering a one-element SVG document with `resvg`.
#[derive(Clone, Debug)]
pub struct SvgGlyphRasterizer {
    fonts: FontBook,
    family: String,
}

impl SvgGlyphRasterizer {
    pub fn new(fonts: FontBook) -> Self {
        Self::with_family(fonts, DEFAULT_FONT_FAMILY)
    }

    pub fn with_family(fonts: FontBook, family: impl Into<String>) -> Self {
        Self {
            fonts,
            family: family.into(),
        }
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }
}

impl GlyphRasterizer for SvgGlyphRasterizer {
    fn rasterize(&self, text: &str, style: TextStyle) -> CloudResult<GlyphBitmap> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(CloudError::validation(format!(
                "font size must be positive, got {}",
                style.size_px
            )));
        }

        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1">{}</svg>"#,
            text_element(text, style, &self.family, "#000000", None)
        );
        let tree = self.fonts.parse_svg(&svg)?;

        let root = tree.root();
        if !root.has_children() {
            return Err(CloudError::render(format!(
                "no font face could draw \"{text}\" ({} faces loaded)",
                self.fonts.face_count()
            )));
        }

        let bbox = root.abs_bounding_box();
        let ox = bbox.left().floor();
        let oy = bbox.top().floor();
        let w = ((bbox.right() - ox).ceil() as u32).max(1);
        let h = ((bbox.bottom() - oy).ceil() as u32).max(1);

        let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
            .ok_or_else(|| CloudError::render("failed to allocate glyph pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_translate(-ox, -oy),
            &mut pixmap.as_mut(),
        );

        Ok(GlyphBitmap {
            width: w,
            height: h,
            origin_x: ox,
            origin_y: oy,
            coverage: pixmap.pixels().iter().map(|p| p.alpha()).collect(),
        })
    }

    fn font_family(&self) -> &str {
        &self.family
    }
}

/// Font-free rasterizer that draws every run as a solid block with a fixed advance per
/// character. Keeps the binaries usable on hosts without any font installed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockGlyphRasterizer {
    /// Advance per character, as a fraction of the font size.
    pub advance_ratio: f32,
    /// Block height, as a fraction of the font size.
    pub height_ratio: f32,
}

impl Default for BlockGlyphRasterizer {
    fn default() -> Self {
        Self {
            advance_ratio: 0.6,
            height_ratio: 0.75,
        }
    }
}

impl GlyphRasterizer for BlockGlyphRasterizer {
    fn rasterize(&self, text: &str, style: TextStyle) -> CloudResult<GlyphBitmap> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(CloudError::validation(format!(
                "font size must be positive, got {}",
                style.size_px
            )));
        }
        let chars = text.chars().count();
        if chars == 0 {
            return Err(CloudError::validation("cannot rasterize empty text"));
        }

        let bold = if style.bold { 1.1 } else { 1.0 };
        let w = ((style.size_px * self.advance_ratio * bold * chars as f32).round() as u32).max(1);
        let h = ((style.size_px * self.height_ratio).round() as u32).max(1);
        Ok(GlyphBitmap {
            width: w,
            height: h,
            origin_x: 0.0,
            origin_y: -(h as f32),
            coverage: vec![u8::MAX; (w as usize) * (h as usize)],
        })
    }

    fn font_family(&self) -> &str {
        "monospace"
    }
}

/// One SVG `<text>` element at the origin, optionally placed by `transform`.
pub fn text_element(
    text: &str,
    style: TextStyle,
    family: &str,
    fill: &str,
    transform: Option<&str>,
) -> String {
    let weight = if style.bold { "bold" } else { "normal" };
    let transform = transform
        .map(|t| format!(r#" transform="{t}""#))
        .unwrap_or_default();
    format!(
        r#"<text x="0" y="0"{transform} font-family="{}" font-size="{}" font-weight="{weight}" fill="{fill}">{}</text>"#,
        escape_xml(family),
        style.size_px,
        escape_xml(text)
    )
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
#[path = "../../tests/unit/assets/glyph.rs"]
mod tests;
