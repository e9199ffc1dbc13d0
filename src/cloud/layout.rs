use crate::{
    assets::glyph::{GlyphBitmap, GlyphRasterizer, TextStyle},
    cloud::{color, mask::Mask, occupancy::OccupancyMap},
    foundation::{
        core::{Canvas, Rgba8, Rng64},
        error::{CloudError, CloudResult},
    },
};

/// Word orientation on the canvas. Vertical words read bottom to top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Word-cloud layout options.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WordCloudOptions {
    /// Canvas width, ignored when a mask is set.
    pub width: u32,
    /// Canvas height, ignored when a mask is set.
    pub height: u32,
    /// Free space kept around every word, in pixels.
    pub margin: u32,
    /// Any color accepted by [`color::parse_color`].
    pub background: String,
    pub max_words: usize,
    pub min_font_size: u32,
    /// Starting font size; the canvas height when unset.
    pub max_font_size: Option<u32>,
    pub font_step: u32,
    /// Probability of trying a word horizontally first.
    pub prefer_horizontal: f64,
    /// How strongly frequency ratios drive font size (0 = rank only, 1 = proportional).
    pub relative_scaling: f64,
    /// Only meaningful when words come from free text; frequency input never joins words.
    pub collocations: bool,
    pub random_state: Option<u64>,
    #[serde(skip)]
    pub mask: Option<Mask>,
}

impl Default for WordCloudOptions {
    fn default() -> Self {
        Self {
            width: 400,
            height: 200,
            margin: 2,
            background: "black".to_string(),
            max_words: 200,
            min_font_size: 4,
            max_font_size: None,
            font_step: 1,
            prefer_horizontal: 0.9,
            relative_scaling: 0.5,
            collocations: true,
            random_state: None,
            mask: None,
        }
    }
}

impl WordCloudOptions {
    /// Effective canvas: the mask's size when a mask is set.
    pub fn canvas(&self) -> CloudResult<Canvas> {
        match &self.mask {
            Some(mask) => Ok(mask.canvas()),
            None => Canvas::new(self.width, self.height),
        }
    }

    /// Apply a partial JSON object on top of these options. The mask is kept.
    pub fn with_overrides(&self, overrides: &serde_json::Value) -> CloudResult<Self> {
        let serde_json::Value::Object(patch) = overrides else {
            return Err(CloudError::serde("options override must be a JSON object"));
        };

        let mut merged = serde_json::to_value(self).map_err(|e| CloudError::serde(e.to_string()))?;
        if let serde_json::Value::Object(base) = &mut merged {
            for (key, value) in patch {
                base.insert(key.clone(), value.clone());
            }
        }

        let mut out: Self =
            serde_json::from_value(merged).map_err(|e| CloudError::serde(e.to_string()))?;
        out.mask = self.mask.clone();
        out.validate()?;
        Ok(out)
    }

    pub fn validate(&self) -> CloudResult<()> {
        self.canvas()?;
        color::parse_color(&self.background)?;

        if !(0.0..=1.0).contains(&self.prefer_horizontal) {
            return Err(CloudError::validation(format!(
                "prefer_horizontal must be within [0, 1], got {}",
                self.prefer_horizontal
            )));
        }
        if !(0.0..=1.0).contains(&self.relative_scaling) {
            return Err(CloudError::validation(format!(
                "relative_scaling must be within [0, 1], got {}",
                self.relative_scaling
            )));
        }
        if self.font_step == 0 {
            return Err(CloudError::validation("font_step must be > 0"));
        }
        if self.min_font_size == 0 {
            return Err(CloudError::validation("min_font_size must be > 0"));
        }
        if let Some(max) = self.max_font_size
            && max < self.min_font_size
        {
            return Err(CloudError::validation(format!(
                "max_font_size ({max}) must be >= min_font_size ({})",
                self.min_font_size
            )));
        }
        if self.max_words == 0 {
            return Err(CloudError::validation("max_words must be > 0"));
        }
        Ok(())
    }

    /// Lay out `frequencies` on the canvas.
    ///
    /// Words are processed heaviest first. Each word gets a random free position; when none
    /// exists it is retried in the other orientation and then at smaller font sizes. Layout
    /// stops once the font size drops below `min_font_size`.
    #[tracing::instrument(skip_all, fields(words = frequencies.len()))]
    pub fn generate_from_frequencies(
        &self,
        frequencies: &[(String, f64)],
        rasterizer: &dyn GlyphRasterizer,
    ) -> CloudResult<Layout> {
        self.validate()?;
        let canvas = self.canvas()?;
        let background = color::parse_color(&self.background)?;

        let words = normalized_frequencies(frequencies, self.max_words)?;

        let seed = self
            .random_state
            .unwrap_or_else(|| Rng64::from_clock().next_u64());
        let mut rng = Rng64::new(seed);
        let mut occupancy = OccupancyMap::new(canvas, self.mask.as_ref());

        let mut placed = Vec::<PlacedWord>::with_capacity(words.len());
        let mut last_freq = 1.0f64;
        let mut font_size = self.max_font_size.unwrap_or(canvas.height);

        for (word, freq) in &words {
            let rs = self.relative_scaling;
            if rs != 0.0 {
                font_size =
                    ((rs * (freq / last_freq) + (1.0 - rs)) * f64::from(font_size)).round() as u32;
            }

            let mut orientation = if rng.next_f64_01() < self.prefer_horizontal {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let mut tried_other_orientation = false;

            let found = loop {
                if font_size < self.min_font_size {
                    break None;
                }

                let glyph = rasterizer.rasterize(word, TextStyle::regular(font_size as f32))?;
                let oriented = match orientation {
                    Orientation::Horizontal => glyph.clone(),
                    Orientation::Vertical => glyph.rotated_ccw(),
                };

                if let Some(pos) = occupancy.sample_position(
                    oriented.width + self.margin,
                    oriented.height + self.margin,
                    &mut rng,
                ) {
                    break Some((pos, glyph, oriented));
                }

                if !tried_other_orientation && self.prefer_horizontal < 1.0 {
                    orientation = orientation.flipped();
                    tried_other_orientation = true;
                } else {
                    font_size = font_size.saturating_sub(self.font_step);
                    orientation = Orientation::Horizontal;
                }
            };

            let Some(((bx, by), glyph, oriented)) = found else {
                tracing::warn!(
                    word = %word,
                    placed = placed.len(),
                    total = words.len(),
                    min_font_size = self.min_font_size,
                    "no room left above the minimum font size; remaining words dropped"
                );
                break;
            };

            let x = bx + self.margin / 2;
            let y = by + self.margin / 2;
            occupancy.stamp(&oriented, x, y);

            let origin = text_origin(&glyph, orientation, x, y);
            tracing::debug!(word = %word, font_size, ?orientation, x, y, "placed word");

            let mut word = PlacedWord {
                word: word.clone(),
                frequency: *freq,
                font_size,
                orientation,
                x,
                y,
                origin,
                color: String::new(),
                glyph: oriented,
            };
            word.color = color::viridis_color(&word, &mut rng);
            placed.push(word);
            last_freq = *freq;
        }

        if placed.is_empty() {
            return Err(CloudError::layout(format!(
                "no word fits on a {}x{} canvas at font size >= {}",
                canvas.width, canvas.height, self.min_font_size
            )));
        }

        tracing::info!(
            placed = placed.len(),
            requested = words.len(),
            width = canvas.width,
            height = canvas.height,
            "word cloud laid out"
        );

        Ok(Layout {
            canvas,
            background,
            font_family: rasterizer.font_family().to_string(),
            seed,
            words: placed,
        })
    }
}

/// Drop non-positive entries, sort heaviest first (stable), keep `max_words` and divide by
/// the largest frequency.
pub fn normalized_frequencies(
    frequencies: &[(String, f64)],
    max_words: usize,
) -> CloudResult<Vec<(String, f64)>> {
    if max_words == 0 {
        return Err(CloudError::validation("max_words must be > 0"));
    }
    let mut words = frequencies
        .iter()
        .filter(|(_, f)| f.is_finite() && *f > 0.0)
        .cloned()
        .collect::<Vec<_>>();
    if words.is_empty() {
        return Err(CloudError::validation(format!(
            "need at least 1 word with positive frequency, got {}",
            frequencies.len()
        )));
    }

    words.sort_by(|a, b| b.1.total_cmp(&a.1));
    words.truncate(max_words);

    let max = words[0].1;
    for (_, f) in &mut words {
        *f /= max;
    }
    Ok(words)
}

/// Where the SVG text origin must sit so the glyph ink lands on the bitmap placed at `(x, y)`.
fn text_origin(glyph: &GlyphBitmap, orientation: Orientation, x: u32, y: u32) -> (f32, f32) {
    let (x, y) = (x as f32, y as f32);
    match orientation {
        Orientation::Horizontal => (x - glyph.origin_x, y - glyph.origin_y),
        // rotate(-90) maps (gx, gy) to (gy, -gx).
        Orientation::Vertical => (
            x - glyph.origin_y,
            y + glyph.width as f32 + glyph.origin_x,
        ),
    }
}

/// One word on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    /// Frequency divided by the largest frequency.
    pub frequency: f64,
    pub font_size: u32,
    pub orientation: Orientation,
    /// Top-left corner of the glyph bitmap.
    pub x: u32,
    pub y: u32,
    /// Text origin for vector output.
    pub origin: (f32, f32),
    /// Any color accepted by [`color::parse_color`].
    pub color: String,
    /// Coverage in canvas orientation.
    pub glyph: GlyphBitmap,
}

impl PlacedWord {
    pub fn width(&self) -> u32 {
        self.glyph.width
    }

    pub fn height(&self) -> u32 {
        self.glyph.height
    }
}

/// A finished word cloud: placed words over a background.
#[derive(Clone, Debug)]
pub struct Layout {
    pub canvas: Canvas,
    pub background: Rgba8,
    pub font_family: String,
    /// Seed the layout ran with; recoloring derives its randomness from it.
    pub seed: u64,
    pub words: Vec<PlacedWord>,
}

impl Layout {
    /// Re-evaluate every word's color without moving anything.
    pub fn recolor<F>(&mut self, mut color_fn: F) -> CloudResult<()>
    where
        F: FnMut(&PlacedWord, &mut Rng64) -> String,
    {
        let mut rng = Rng64::new(self.seed ^ 0xC010_C010_C010_C010);
        for word in &mut self.words {
            let c = color_fn(word, &mut rng);
            color::parse_color(&c)?;
            word.color = c;
        }
        Ok(())
    }

    pub fn word(&self, name: &str) -> Option<&PlacedWord> {
        self.words.iter().find(|w| w.word == name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cloud/layout.rs"]
mod tests;
