use std::ops::RangeInclusive;

use tracing::{debug, warn};

use crate::error::Error;

/// Printable ASCII, the glyphs sampled when sizing cells.
pub const PRINTABLE_ASCII: RangeInclusive<char> = ' '..='~';

/// The glyph reaching lowest below the baseline among common characters.
const DESCENDER_REFERENCE: char = '_';

/// Dimensions of a single grid cell in pixels, shared by every cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    /// Cell width in pixels.
    pub width: f32,
    /// Cell height in pixels.
    pub height: f32,
}

impl CellSize {
    /// Creates a new cell size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Metrics of a single rasterized glyph, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// Horizontal advance to the next glyph origin.
    pub advance: f32,
    /// Distance from the baseline up to the top edge of the glyph bitmap.
    pub vertical_offset: i32,
    /// Height of the glyph bitmap.
    pub pixel_height: u32,
}

/// Supplies font metrics to the cell size calculation.
///
/// Implementations typically rasterize and cache the glyph on first lookup,
/// which is why [`glyph_metrics`](Self::glyph_metrics) takes `&mut self`.
pub trait GlyphMetricsSource {
    /// The font ascender in pixels.
    fn ascender(&self) -> f32;

    /// Returns the metrics for `ch`, or `None` if the font cannot render it.
    fn glyph_metrics(&mut self, ch: char) -> Option<GlyphMetrics>;
}

/// Derives a monospace [`CellSize`] from font glyph metrics.
///
/// The width is the widest advance among the candidate glyphs, rounded up. The
/// height spans from the ascender down to the bottom of the underscore glyph.
/// Every candidate is looked up, warming the source's glyph cache.
#[derive(Debug, Clone)]
pub struct CellSizeCalculator {
    candidates: RangeInclusive<char>,
}

impl Default for CellSizeCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl CellSizeCalculator {
    /// Creates a calculator sampling the printable ASCII range.
    #[must_use]
    pub fn new() -> Self {
        Self { candidates: PRINTABLE_ASCII }
    }

    /// Overrides the sampled candidate glyphs.
    #[must_use]
    pub fn candidates(mut self, candidates: RangeInclusive<char>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Computes the cell size for the font behind `source`.
    ///
    /// # Errors
    /// Returns [`Error::GlyphMissing`] if the underscore glyph is unavailable,
    /// if no candidate glyph has a positive advance, or if the resulting cell
    /// height is not positive.
    pub fn calculate(&self, source: &mut impl GlyphMetricsSource) -> Result<CellSize, Error> {
        let mut max_advance = 0.0_f32;
        let mut skipped = 0;
        for ch in self.candidates.clone() {
            match source.glyph_metrics(ch) {
                Some(metrics) => max_advance = max_advance.max(metrics.advance),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(skipped, "font lacks some candidate glyphs");
        }

        let width = max_advance.ceil();
        if width <= 0.0 {
            return Err(Error::GlyphMissing(*self.candidates.start()));
        }

        let underscore = source
            .glyph_metrics(DESCENDER_REFERENCE)
            .ok_or(Error::GlyphMissing(DESCENDER_REFERENCE))?;

        let height = source.ascender() - underscore.vertical_offset as f32
            + underscore.pixel_height as f32;
        if height <= 0.0 {
            return Err(Error::GlyphMissing(DESCENDER_REFERENCE));
        }

        debug!(width, height, max_advance, "derived cell size");
        Ok(CellSize { width, height })
    }
}
