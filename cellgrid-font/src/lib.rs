//! Font metrics for cellgrid, backed by `fontdue`.
//!
//! [`FontMetrics`] implements [`GlyphMetricsSource`]: every glyph it is asked
//! about is rasterized once and kept in a glyph cache, so sizing the grid also
//! warms the cache for the characters most likely to be drawn first.

use std::path::Path;

use cellgrid_core::{Error, GlyphMetrics, GlyphMetricsSource};
use fontdue::{Font, FontSettings};
use rustc_hash::FxHashMap;
use tracing::{debug, info, trace};

/// A rasterized glyph kept in the glyph cache.
#[derive(Debug, Clone)]
pub struct RasterizedGlyph {
    /// Metrics reported to the cell size calculation.
    pub metrics: GlyphMetrics,
    /// Bitmap width in pixels.
    pub width: usize,
    /// Bitmap height in pixels.
    pub height: usize,
    /// Coverage values, one byte per pixel, row-major.
    pub coverage: Vec<u8>,
}

/// A parsed font at a fixed pixel size, with a cache of rasterized glyphs.
pub struct FontMetrics {
    font: Font,
    px_size: f32,
    ascender: f32,
    /// Rasterized glyphs; `None` marks characters the font lacks.
    glyphs: FxHashMap<char, Option<RasterizedGlyph>>,
}

impl FontMetrics {
    /// Parses a TrueType/OpenType font from memory.
    ///
    /// # Errors
    /// Returns [`Error::FontLoad`] if the data cannot be parsed, the pixel size
    /// is not a positive finite number, or the font has no horizontal line
    /// metrics.
    pub fn from_bytes(bytes: &[u8], px_size: f32) -> Result<Self, Error> {
        Self::from_collection(bytes, 0, px_size)
    }

    /// Reads and parses the font file at `path`.
    ///
    /// # Errors
    /// Returns [`Error::FontLoad`] if the file cannot be read, or for any of the
    /// reasons listed in [`from_bytes`](Self::from_bytes).
    pub fn from_path(path: impl AsRef<Path>, px_size: f32) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| Error::font_load_failed(format!("{}: {e}", path.display())))?;

        info!(path = %path.display(), px_size, "loading font file");
        Self::from_bytes(&bytes, px_size)
    }

    /// Loads the system's default monospace font.
    ///
    /// # Errors
    /// Returns [`Error::FontLoad`] if no monospace face is installed, or for any
    /// of the reasons listed in [`from_bytes`](Self::from_bytes).
    pub fn system_monospace(px_size: f32) -> Result<Self, Error> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let id = find_monospace(&db)
            .ok_or_else(|| Error::font_load_failed("no monospace font installed"))?;

        if let Some(face) = db.face(id) {
            info!(font = %face.post_script_name, px_size, "using system monospace font");
        }

        db.with_face_data(id, |data, index| Self::from_collection(data, index, px_size))
            .unwrap_or_else(|| Err(Error::font_load_failed("font face data unavailable")))
    }

    fn from_collection(bytes: &[u8], collection_index: u32, px_size: f32) -> Result<Self, Error> {
        if !px_size.is_finite() || px_size <= 0.0 {
            return Err(Error::font_load_failed(format!("invalid pixel size: {px_size}")));
        }

        let settings = FontSettings {
            collection_index,
            scale: px_size,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(bytes, settings).map_err(Error::font_load_failed)?;

        let ascender = font
            .horizontal_line_metrics(px_size)
            .ok_or_else(|| Error::font_load_failed("font has no horizontal line metrics"))?
            .ascent;

        debug!(px_size, ascender, glyph_count = font.glyph_count(), "parsed font");
        Ok(Self {
            font,
            px_size,
            ascender,
            glyphs: FxHashMap::default(),
        })
    }

    /// The pixel size glyphs are rasterized at.
    #[must_use]
    pub fn px_size(&self) -> f32 {
        self.px_size
    }

    /// Returns the cached rasterization of `ch`, if it has been looked up and
    /// the font can render it.
    #[must_use]
    pub fn glyph(&self, ch: char) -> Option<&RasterizedGlyph> {
        self.glyphs.get(&ch).and_then(Option::as_ref)
    }

    /// Number of characters held by the glyph cache, including characters
    /// the font lacks.
    #[must_use]
    pub fn cached_glyphs(&self) -> usize {
        self.glyphs.len()
    }

    fn rasterize(&self, ch: char) -> Option<RasterizedGlyph> {
        if self.font.lookup_glyph_index(ch) == 0 {
            trace!(?ch, "glyph not in font");
            return None;
        }

        let (metrics, coverage) = self.font.rasterize(ch, self.px_size);
        Some(RasterizedGlyph {
            metrics: GlyphMetrics {
                advance: metrics.advance_width,
                vertical_offset: metrics.ymin + metrics.height as i32,
                pixel_height: metrics.height as u32,
            },
            width: metrics.width,
            height: metrics.height,
            coverage,
        })
    }
}

/// Resolves the generic monospace family, falling back to the most regular
/// face flagged as monospaced.
fn find_monospace(db: &fontdb::Database) -> Option<fontdb::ID> {
    let query = fontdb::Query {
        families: &[fontdb::Family::Monospace],
        ..fontdb::Query::default()
    };
    if let Some(id) = db.query(&query) {
        return Some(id);
    }

    // the generic family maps to a fixed name unless configured
    db.faces()
        .filter(|face| face.monospaced)
        .min_by_key(|face| {
            (
                face.style != fontdb::Style::Normal,
                face.weight.0.abs_diff(fontdb::Weight::NORMAL.0),
                face.stretch != fontdb::Stretch::Normal,
            )
        })
        .map(|face| face.id)
}

impl GlyphMetricsSource for FontMetrics {
    fn ascender(&self) -> f32 {
        self.ascender
    }

    fn glyph_metrics(&mut self, ch: char) -> Option<GlyphMetrics> {
        if let Some(cached) = self.glyphs.get(&ch) {
            return cached.as_ref().map(|glyph| glyph.metrics);
        }

        let glyph = self.rasterize(ch);
        let metrics = glyph.as_ref().map(|glyph| glyph.metrics);
        self.glyphs.insert(ch, glyph);
        metrics
    }
}

impl std::fmt::Debug for FontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMetrics")
            .field("px_size", &self.px_size)
            .field("ascender", &self.ascender)
            .field("cached_glyphs", &self.glyphs.len())
            .finish_non_exhaustive()
    }
}
