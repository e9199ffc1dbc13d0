use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use sha2::Digest as _;

use crate::foundation::error::{CloudError, CloudResult};

/// Family stack used for every word, title and legend label.
pub const DEFAULT_FONT_FAMILY: &str = "DejaVu Sans, Liberation Sans, Arial, Helvetica, sans-serif";

/// Shared font database used to parse and rasterize SVG text.
#[derive(Clone)]
pub struct FontBook {
    db: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.db.len())
            .finish()
    }
}

/// Which face a family stack resolves to, for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceReport {
    pub family: String,
    pub post_script_name: String,
    pub source: String,
    pub sha256: String,
}

impl FontBook {
    /// System fonts only.
    pub fn system() -> Self {
        Self::load(None)
    }

    /// System fonts plus every `.ttf`/`.otf`/`.ttc` file in `extra_dir` (and its `fonts/`
    /// subdirectory).
    #[tracing::instrument]
    pub fn load(extra_dir: Option<&Path>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();

        if let Some(dir) = extra_dir {
            load_fonts_from_dir(&mut db, dir);
            load_fonts_from_dir(&mut db, &dir.join("fonts"));
        }

        tracing::debug!(faces = db.len(), "font database ready");
        Self { db: Arc::new(db) }
    }

    /// Build from an already populated database.
    pub fn from_database(db: usvg::fontdb::Database) -> Self {
        Self { db: Arc::new(db) }
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Parse an SVG document against this font database.
    pub fn parse_svg(&self, svg: &str) -> CloudResult<usvg::Tree> {
        let opts = usvg::Options {
            fontdb: Arc::clone(&self.db),
            font_resolver: make_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &opts).context("parse svg tree")?;
        Ok(tree)
    }

    /// Resolve `family_stack` the same way text rendering does and fingerprint the face bytes.
    pub fn describe(&self, family_stack: &str) -> CloudResult<FaceReport> {
        let names = split_family_stack(family_stack);
        let mut families = names.iter().map(|n| to_fontdb_family(n)).collect::<Vec<_>>();
        push_generic_fallbacks(&mut families);

        let query = usvg::fontdb::Query {
            families: &families,
            weight: usvg::fontdb::Weight::NORMAL,
            stretch: usvg::fontdb::Stretch::Normal,
            style: usvg::fontdb::Style::Normal,
        };
        let id = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|f| f.id))
            .ok_or_else(|| CloudError::render("font database has no faces"))?;

        let face = self
            .db
            .face(id)
            .ok_or_else(|| CloudError::render("resolved font face vanished from database"))?;
        let family = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_default();
        let source = match &face.source {
            usvg::fontdb::Source::File(path) => path.display().to_string(),
            _ => "<mapped or in-memory>".to_string(),
        };

        let sha256 = self
            .db
            .with_face_data(id, |data, _index| sha256_hex(data))
            .ok_or_else(|| CloudError::render(format!("read font data for '{family}'")))?;

        Ok(FaceReport {
            family,
            post_script_name: face.post_script_name.clone(),
            source,
            sha256,
        })
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !is_font_file(&path) {
            continue;
        }
        if let Err(err) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), %err, "skipping unreadable font file");
        }
    }
}

fn is_font_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc")
}

/// Split a CSS-style family list into trimmed, unquoted names.
pub fn split_family_stack(stack: &str) -> Vec<String> {
    stack
        .split(',')
        .map(|s| s.trim().trim_matches('"').trim_matches('\'').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_fontdb_family(name: &str) -> usvg::fontdb::Family<'_> {
    match name {
        "serif" => usvg::fontdb::Family::Serif,
        "sans-serif" => usvg::fontdb::Family::SansSerif,
        "cursive" => usvg::fontdb::Family::Cursive,
        "fantasy" => usvg::fontdb::Family::Fantasy,
        "monospace" => usvg::fontdb::Family::Monospace,
        other => usvg::fontdb::Family::Name(other),
    }
}

fn push_generic_fallbacks(families: &mut Vec<usvg::fontdb::Family<'_>>) {
    families.push(usvg::fontdb::Family::SansSerif);
    families.push(usvg::fontdb::Family::Serif);
    families.push(usvg::fontdb::Family::Monospace);
}

fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            push_generic_fallbacks(&mut families);

            // Words are only ever set upright at normal width; weight carries bold titles.
            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            // Any face beats dropping the text.
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", sha2::Sha256::digest(bytes))
}

/// Directory holding fonts shipped next to the binary's working directory, if any.
pub fn default_font_dir() -> Option<PathBuf> {
    let dir = PathBuf::from("fonts");
    dir.is_dir().then_some(dir)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
