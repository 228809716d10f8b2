//! TrueType font embedded into receipt PDFs.

use std::path::Path;
use std::sync::Arc;

use ttf_parser::{Face, GlyphId};

use crate::error::PaygateError;

/// DejaVu Sans: Latin, Greek and Cyrillic coverage. Licence in `assets/fonts/`.
const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Raw font program shared between receipt renders.
#[derive(Clone)]
pub struct ReceiptFont {
    data: Arc<[u8]>,
}

impl ReceiptFont {
    pub fn bundled() -> Self {
        Self {
            data: Arc::from(BUNDLED_FONT),
        }
    }

    /// Load a TrueType/OpenType file, rejecting anything `ttf-parser` cannot read.
    pub fn from_path(path: &Path) -> Result<Self, PaygateError> {
        let data = std::fs::read(path)?;
        Face::parse(&data, 0)
            .map_err(|e| PaygateError::Font(format!("{}: {e}", path.display())))?;
        Ok(Self {
            data: Arc::from(data),
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn metrics(&self) -> Result<FontMetrics<'_>, PaygateError> {
        let face = Face::parse(&self.data, 0).map_err(|e| PaygateError::Font(e.to_string()))?;
        let scale = 1000.0 / f32::from(face.units_per_em().max(1));
        Ok(FontMetrics { face, scale })
    }
}

/// Glyph lookups with widths in PDF text space units (1/1000 em).
pub(crate) struct FontMetrics<'a> {
    face: Face<'a>,
    scale: f32,
}

impl FontMetrics<'_> {
    /// Glyph for `c`, or `.notdef` when the font has none.
    pub fn glyph(&self, c: char) -> GlyphId {
        self.face.glyph_index(c).unwrap_or(GlyphId(0))
    }

    pub fn advance(&self, glyph: GlyphId) -> i64 {
        let units = self.face.glyph_hor_advance(glyph).unwrap_or(0);
        (f32::from(units) * self.scale).round() as i64
    }

    pub fn char_width(&self, c: char) -> i64 {
        self.advance(self.glyph(c))
    }

    pub fn ascent(&self) -> i64 {
        self.scaled(self.face.ascender())
    }

    pub fn descent(&self) -> i64 {
        self.scaled(self.face.descender())
    }

    pub fn cap_height(&self) -> i64 {
        self.scaled(self.face.capital_height().unwrap_or(self.face.ascender()))
    }

    /// `[x_min, y_min, x_max, y_max]`
    pub fn bbox(&self) -> [i64; 4] {
        let rect = self.face.global_bounding_box();
        [
            self.scaled(rect.x_min),
            self.scaled(rect.y_min),
            self.scaled(rect.x_max),
            self.scaled(rect.y_max),
        ]
    }

    fn scaled(&self, units: i16) -> i64 {
        (f32::from(units) * self.scale).round() as i64
    }
}
