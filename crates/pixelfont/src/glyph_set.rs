//! Assembly of the complete, ordered glyph set handed to the encoder.
use crate::{
    bitmap::BitmapCollection,
    metrics::advance_width,
    naming::{glyph_name, NOTDEF, SPACE},
    outline::{convert, Rectangle},
    settings::FontSettings,
};

pub const STYLE_NAME: &str = "Regular";
const SPACE_CODEPOINT: u32 = 32;

/// One glyph as the encoder sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    /// Unique within the glyph set
    pub name: String,
    /// `None` for `.notdef`
    pub codepoint: Option<u32>,
    pub outline: Vec<Rectangle>,
    pub advance_width: u16,
}

impl Glyph {
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }
}

/// Font wide vertical metrics.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FontMetrics {
    pub ascender: i16,
    pub descender: i16,
}

impl FontMetrics {
    /// 80% of the em above the baseline, 20% below.
    pub fn for_units_per_em(units_per_em: u16) -> Self {
        let upm = i32::from(units_per_em);
        Self {
            ascender: (upm * 4).div_euclid(5) as i16,
            descender: (-upm).div_euclid(5) as i16,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlyphSet {
    pub family_name: String,
    pub style_name: String,
    pub units_per_em: u16,
    pub metrics: FontMetrics,
    pub glyphs: Vec<Glyph>,
}

impl GlyphSet {
    pub fn glyph(&self, name: &str) -> Option<&Glyph> {
        self.glyphs.iter().find(|g| g.name == name)
    }

    pub fn glyph_for(&self, codepoint: u32) -> Option<&Glyph> {
        self.glyphs.iter().find(|g| g.codepoint == Some(codepoint))
    }
}

fn notdef_glyph(units_per_em: u16) -> Glyph {
    let em = f64::from(units_per_em);
    let size = em * 7.0 / 10.0;
    Glyph {
        name: NOTDEF.to_string(),
        codepoint: None,
        outline: vec![Rectangle::new(em / 20.0, 0.0, size, size)],
        advance_width: (u32::from(units_per_em) * 4 / 5) as u16,
    }
}

fn space_glyph(units_per_em: u16) -> Glyph {
    Glyph {
        name: SPACE.to_string(),
        codepoint: Some(SPACE_CODEPOINT),
        outline: Vec::new(),
        advance_width: units_per_em / 2,
    }
}

/// Build the glyph set: `.notdef`, `space`, then every other code point of the
/// collection in ascending order.
///
/// Undesigned characters still get a glyph (empty outline, default advance) so
/// their code point stays mapped.
pub fn assemble(bitmaps: &BitmapCollection, settings: &FontSettings) -> GlyphSet {
    let units_per_em = settings.units_per_em;
    let mut glyphs = Vec::with_capacity(bitmaps.len() + 2);
    glyphs.push(notdef_glyph(units_per_em));
    glyphs.push(space_glyph(units_per_em));

    for (&codepoint, bitmap) in bitmaps {
        if codepoint == SPACE_CODEPOINT {
            continue;
        }
        let outline = convert(bitmap, units_per_em);
        log::debug!(
            "glyph U+{codepoint:04X}: {} filled cells -> {} rectangles",
            bitmap.count_filled(),
            outline.len()
        );
        glyphs.push(Glyph {
            name: glyph_name(codepoint),
            codepoint: Some(codepoint),
            outline,
            advance_width: advance_width(bitmap, units_per_em),
        });
    }

    GlyphSet {
        family_name: settings.family_name().to_string(),
        style_name: STYLE_NAME.to_string(),
        units_per_em,
        metrics: FontMetrics::for_units_per_em(units_per_em),
        glyphs,
    }
}
