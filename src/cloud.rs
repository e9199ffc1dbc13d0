//! Word-cloud layout: masks, occupancy search, placement and coloring.

pub mod color;
pub mod layout;
pub mod mask;
pub mod occupancy;
mod render;

pub use color::{color_for_font_size, parse_color, tier_color, viridis_color};
pub use layout::{Layout, Orientation, PlacedWord, WordCloudOptions};
pub use mask::Mask;
