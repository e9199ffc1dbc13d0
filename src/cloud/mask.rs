use std::path::Path;

use anyhow::Context as _;

use crate::foundation::{
    core::Canvas,
    error::{CloudError, CloudResult},
};

/// Distance kept between the circular mask edge and the canvas edge.
pub const CIRCLE_MARGIN_PX: i64 = 20;

/// Per-pixel inclusion raster: words may only cover paintable pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    paintable: Vec<bool>,
}

impl Mask {
    /// Square mask whose paintable region is the disc around the center pixel, inset by
    /// [`CIRCLE_MARGIN_PX`]. Sizes of 40 or less leave at most the center pixel paintable.
    pub fn circular(size: u32) -> CloudResult<Self> {
        let canvas = Canvas::new(size, size)?;
        let center = i64::from(size / 2);
        let radius = center - CIRCLE_MARGIN_PX;

        let mut paintable = vec![false; canvas.area()];
        if radius >= 0 {
            let r2 = radius * radius;
            for y in 0..i64::from(size) {
                let dy = y - center;
                for x in 0..i64::from(size) {
                    let dx = x - center;
                    if dx * dx + dy * dy <= r2 {
                        paintable[(y * i64::from(size) + x) as usize] = true;
                    }
                }
            }
        }

        Ok(Self {
            width: size,
            height: size,
            paintable,
        })
    }

    /// Pixels equal to 255 are paintable, everything else is excluded.
    pub fn from_gray(img: &image::GrayImage) -> CloudResult<Self> {
        let canvas = Canvas::new(img.width(), img.height())?;
        let paintable = img.pixels().map(|p| p.0[0] == u8::MAX).collect::<Vec<_>>();
        debug_assert_eq!(paintable.len(), canvas.area());
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            paintable,
        })
    }

    /// Load a mask from any image file the `image` crate can decode.
    pub fn from_image(path: &Path) -> CloudResult<Self> {
        let img = image::open(path)
            .with_context(|| format!("open mask image '{}'", path.display()))?;
        Self::from_gray(&img.to_luma8())
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Out-of-bounds coordinates are never paintable.
    pub fn is_paintable(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return false;
        }
        self.paintable[(y as usize) * (self.width as usize) + (x as usize)]
    }

    pub fn paintable_count(&self) -> usize {
        self.paintable.iter().filter(|&&p| p).count()
    }

    /// Row-major paintable flags.
    pub fn as_slice(&self) -> &[bool] {
        &self.paintable
    }

    /// Export as a grayscale image, 255 for paintable pixels.
    pub fn to_gray(&self) -> CloudResult<image::GrayImage> {
        let data = self
            .paintable
            .iter()
            .map(|&p| if p { u8::MAX } else { 0 })
            .collect::<Vec<_>>();
        image::GrayImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| CloudError::render("mask buffer does not match its dimensions"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cloud/mask.rs"]
mod tests;
