pub mod fonts;
pub mod glyph;

pub use fonts::{DEFAULT_FONT_FAMILY, FaceReport, FontBook};
pub use glyph::{BlockGlyphRasterizer, GlyphBitmap, GlyphRasterizer, SvgGlyphRasterizer, TextStyle};
