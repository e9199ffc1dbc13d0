//! Schema word clouds: render a schema's type hierarchy as a word cloud where size and
//! color encode nesting depth.
//!
//! - [`schema`] holds the fixed mock invoice schema and its console reports
//! - [`cloud`] lays words out on a canvas (optionally masked) and colors them
//! - [`figure`] composes a cloud with a title and legend into a PNG
//! - [`showcase`] wires these into the two fixed visualizations the binaries produce
#![forbid(unsafe_code)]

pub mod assets;
pub mod cli;
pub mod cloud;
pub mod figure;
pub mod foundation;
pub mod schema;
pub mod showcase;

pub use crate::foundation::core::{Canvas, Rect, Rgba8, Rng64};
pub use crate::foundation::error::{CloudError, CloudResult};

pub use crate::assets::{BlockGlyphRasterizer, FontBook, GlyphRasterizer, SvgGlyphRasterizer};
pub use crate::cloud::{Layout, Mask, WordCloudOptions};
pub use crate::figure::{Figure, Legend, LegendEntry, save_png};
pub use crate::schema::{SchemaMapping, Tier, mock_invoice_schema};
pub use crate::showcase::{SchemaCloud, generate_schema_wordcloud, generate_simple_wordcloud};
