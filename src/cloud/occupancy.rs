//! Occupancy grid with a summed-area table, answering "is this box free" in O(1).

use crate::{
    assets::glyph::GlyphBitmap,
    cloud::mask::Mask,
    foundation::core::{Canvas, Rng64},
};

#[derive(Clone, Debug)]
pub struct OccupancyMap {
    width: u32,
    height: u32,
    occupied: Vec<u8>,
    // (height + 1) x (width + 1); row 0 and column 0 stay zero.
    integral: Vec<u32>,
}

impl OccupancyMap {
    /// Non-paintable mask pixels start out occupied.
    pub fn new(canvas: Canvas, mask: Option<&Mask>) -> Self {
        let occupied = match mask {
            Some(m) => m.as_slice().iter().map(|&p| u8::from(!p)).collect(),
            None => vec![0u8; canvas.area()],
        };

        let mut map = Self {
            width: canvas.width,
            height: canvas.height,
            occupied,
            integral: vec![0u32; (canvas.width as usize + 1) * (canvas.height as usize + 1)],
        };
        map.rebuild_from_row(0);
        map
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_occupied(&self, x: u32, y: u32) -> bool {
        self.occupied[(y as usize) * (self.width as usize) + (x as usize)] != 0
    }

    fn stride(&self) -> usize {
        self.width as usize + 1
    }

    fn rebuild_from_row(&mut self, first_row: u32) {
        let stride = self.stride();
        let w = self.width as usize;
        for y in (first_row as usize)..(self.height as usize) {
            let mut row_sum = 0u32;
            for x in 0..w {
                row_sum += u32::from(self.occupied[y * w + x]);
                self.integral[(y + 1) * stride + x + 1] = self.integral[y * stride + x + 1] + row_sum;
            }
        }
    }

    /// Occupied pixel count inside the `bw` x `bh` box at `(x, y)`. The box must fit.
    pub fn box_sum(&self, x: u32, y: u32, bw: u32, bh: u32) -> u32 {
        let s = self.stride();
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + bw as usize, y0 + bh as usize);
        let i = &self.integral;
        i[y1 * s + x1] + i[y0 * s + x0] - i[y0 * s + x1] - i[y1 * s + x0]
    }

    /// Pick a top-left corner uniformly among all positions where a `bw` x `bh` box is free.
    pub fn sample_position(&self, bw: u32, bh: u32, rng: &mut Rng64) -> Option<(u32, u32)> {
        if bw == 0 || bh == 0 || bw > self.width || bh > self.height {
            return None;
        }
        let max_x = self.width - bw;
        let max_y = self.height - bh;

        let mut hits = 0u64;
        for y in 0..=max_y {
            for x in 0..=max_x {
                if self.box_sum(x, y, bw, bh) == 0 {
                    hits += 1;
                }
            }
        }
        if hits == 0 {
            return None;
        }

        let mut goal = rng.below(hits);
        for y in 0..=max_y {
            for x in 0..=max_x {
                if self.box_sum(x, y, bw, bh) == 0 {
                    if goal == 0 {
                        return Some((x, y));
                    }
                    goal -= 1;
                }
            }
        }
        None
    }

    /// Mark every inked glyph pixel at `(x, y)` as occupied. Pixels past the edge are ignored.
    pub fn stamp(&mut self, glyph: &GlyphBitmap, x: u32, y: u32) {
        let w = self.width as usize;
        let mut first_dirty = None;
        for gy in 0..glyph.height {
            let cy = y + gy;
            if cy >= self.height {
                break;
            }
            for gx in 0..glyph.width {
                let cx = x + gx;
                if cx >= self.width {
                    break;
                }
                if glyph.coverage_at(gx, gy) > 0 {
                    self.occupied[(cy as usize) * w + cx as usize] = 1;
                    first_dirty.get_or_insert(cy);
                }
            }
        }

        if let Some(row) = first_dirty {
            self.rebuild_from_row(row);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cloud/occupancy.rs"]
mod tests;
