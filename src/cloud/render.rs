use std::fmt::Write as _;

use crate::{
    assets::glyph::{TextStyle, text_element},
    cloud::{
        color::parse_color,
        layout::{Layout, Orientation},
    },
    foundation::{
        core::Rgba8,
        error::{CloudError, CloudResult},
    },
};

impl Layout {
    /// Rasterize the layout: background fill, then every word's coverage tinted with its color.
    #[tracing::instrument(skip(self), fields(words = self.words.len()))]
    pub fn to_image(&self) -> CloudResult<image::RgbaImage> {
        let (w, h) = (self.canvas.width, self.canvas.height);
        let bg = self.background;
        let mut img = image::RgbaImage::from_pixel(w, h, image::Rgba([bg.r, bg.g, bg.b, bg.a]));

        for word in &self.words {
            let color = parse_color(&word.color)?;
            let glyph = &word.glyph;
            for gy in 0..glyph.height {
                let cy = word.y + gy;
                if cy >= h {
                    break;
                }
                for gx in 0..glyph.width {
                    let cx = word.x + gx;
                    if cx >= w {
                        break;
                    }
                    let cov = glyph.coverage_at(gx, gy);
                    if cov == 0 {
                        continue;
                    }
                    let px = img.get_pixel_mut(cx, cy);
                    *px = blend_over(*px, color, cov);
                }
            }
        }
        Ok(img)
    }

    /// SVG document with one `<text>` element per word.
    pub fn to_svg(&self) -> String {
        let (w, h) = (self.canvas.width, self.canvas.height);
        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        let _ = write!(
            svg,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            self.background.to_hex()
        );

        for word in &self.words {
            let (ox, oy) = word.origin;
            let transform = match word.orientation {
                Orientation::Horizontal => format!("translate({ox} {oy})"),
                Orientation::Vertical => format!("translate({ox} {oy}) rotate(-90)"),
            };
            svg.push_str(&text_element(
                &word.word,
                TextStyle::regular(word.font_size as f32),
                &self.font_family,
                &word.color,
                Some(&transform),
            ));
        }
        svg.push_str("</svg>");
        svg
    }

    /// Write the SVG form of the layout to `path`.
    pub fn save_svg(&self, path: &std::path::Path) -> CloudResult<()> {
        use anyhow::Context as _;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(path, self.to_svg())
            .with_context(|| format!("write svg '{}'", path.display()))
            .map_err(CloudError::from)
    }
}

/// Source-over of `color` at `coverage` onto a straight-alpha pixel.
fn blend_over(dst: image::Rgba<u8>, color: Rgba8, coverage: u8) -> image::Rgba<u8> {
    let sa = f32::from(coverage) / 255.0 * (f32::from(color.a) / 255.0);
    let da = f32::from(dst.0[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return image::Rgba([0, 0, 0, 0]);
    }

    let mix = |s: u8, d: u8| {
        let v = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    image::Rgba([
        mix(color.r, dst.0[0]),
        mix(color.g, dst.0[1]),
        mix(color.b, dst.0[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

#[cfg(test)]
#[path = "../../tests/unit/cloud/render.rs"]
mod tests;
