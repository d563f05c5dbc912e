//! Binary font encoding.
//!
//! [`TrueTypeEncoder`] turns a [`GlyphSet`] into an OpenType font with TrueType
//! (`glyf`) outlines. Every rectangle of a glyph outline becomes one closed
//! four point contour.
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use write_fonts::{
    tables::{
        cmap::Cmap,
        glyf::{GlyfLocaBuilder, SimpleGlyph},
        head::{Flags, Head, MacStyle},
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        name::{Name, NameRecord},
        os2::{Os2, SelectionFlags},
        post::Post,
    },
    types::{FWord, Fixed, GlyphId, LongDateTime, NameId, UfWord},
    FontBuilder,
};

use crate::{
    error::{FontError, Result},
    glyph_set::{Glyph, GlyphSet},
    outline::to_bez_path,
};

/// Seconds between 1904-01-01 (the OpenType epoch) and 1970-01-01.
const MAC_EPOCH_OFFSET: i64 = 2_082_844_800;
const FONT_VERSION: &str = "Version 1.000";
// 'head' checksumAdjustment: 0xB1B0AFBA minus the checksum of the whole file
const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;

// Windows platform, Unicode BMP encoding, US English
const PLATFORM_WINDOWS: u16 = 3;
const ENCODING_UNICODE_BMP: u16 = 1;
const LANGUAGE_EN_US: u16 = 0x409;

/// Anything that can turn an assembled glyph set into font file bytes.
pub trait FontEncoder {
    fn encode(&self, glyph_set: &GlyphSet) -> Result<Vec<u8>>;
}

/// Writes TrueType-flavoured OpenType fonts using `write-fonts`.
#[derive(Clone, Debug)]
pub struct TrueTypeEncoder {
    /// Creation/modification time written into 'head', seconds since 1970
    timestamp: i64,
}

impl Default for TrueTypeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrueTypeEncoder {
    /// Encoder stamping fonts with the current time.
    pub fn new() -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        Self { timestamp }
    }

    /// Encoder with a fixed timestamp, for reproducible output.
    pub fn with_timestamp(unix_seconds: i64) -> Self {
        Self {
            timestamp: unix_seconds,
        }
    }
}

fn encoding_error(context: &str, err: impl std::fmt::Display) -> FontError {
    FontError::EncodingFailure(format!("{context}: {err}"))
}

fn ot_round(value: f64) -> Result<i16> {
    let rounded = (value + 0.5).floor();
    if rounded < f64::from(i16::MIN) || rounded > f64::from(i16::MAX) {
        return Err(FontError::EncodingFailure(format!(
            "coordinate {value} outside the 16 bit range"
        )));
    }
    Ok(rounded as i16)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Bounds {
    x_min: i16,
    y_min: i16,
    x_max: i16,
    y_max: i16,
}

impl Bounds {
    fn union(self, other: Bounds) -> Bounds {
        Bounds {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

/// A glyph compiled to its 'glyf' form plus the numbers the metric tables need.
struct CompiledGlyph {
    simple: SimpleGlyph,
    bounds: Option<Bounds>,
    advance: u16,
    contours: u16,
}

impl CompiledGlyph {
    fn compile(glyph: &Glyph) -> Result<Self> {
        if glyph.is_empty() {
            return Ok(Self {
                simple: SimpleGlyph::default(),
                bounds: None,
                advance: glyph.advance_width,
                contours: 0,
            });
        }
        let mut bounds: Option<Bounds> = None;
        for rect in &glyph.outline {
            let rect_bounds = Bounds {
                x_min: ot_round(rect.x1.min(rect.x2))?,
                y_min: ot_round(rect.y1.min(rect.y2))?,
                x_max: ot_round(rect.x1.max(rect.x2))?,
                y_max: ot_round(rect.y1.max(rect.y2))?,
            };
            bounds = Some(bounds.map_or(rect_bounds, |b| b.union(rect_bounds)));
        }
        let contours = u16::try_from(glyph.outline.len())
            .map_err(|_| encoding_error(&glyph.name, "too many contours"))?;
        let simple = SimpleGlyph::from_bezpath(&to_bez_path(&glyph.outline))
            .map_err(|e| encoding_error(&glyph.name, format!("{e:?}")))?;
        Ok(Self {
            simple,
            bounds,
            advance: glyph.advance_width,
            contours,
        })
    }

    fn left_side_bearing(&self) -> i16 {
        self.bounds.map_or(0, |b| b.x_min)
    }
}

fn check_glyph_set(glyph_set: &GlyphSet) -> Result<Vec<(char, GlyphId)>> {
    if glyph_set.glyphs.len() > usize::from(u16::MAX) {
        return Err(FontError::EncodingFailure(format!(
            "{} glyphs exceed the 65535 glyph limit",
            glyph_set.glyphs.len()
        )));
    }
    let mut names = HashSet::new();
    let mut mappings = Vec::new();
    for (index, glyph) in glyph_set.glyphs.iter().enumerate() {
        if !names.insert(glyph.name.as_str()) {
            return Err(FontError::EncodingFailure(format!(
                "duplicate glyph name '{}'",
                glyph.name
            )));
        }
        if let Some(codepoint) = glyph.codepoint {
            let ch = char::from_u32(codepoint).ok_or_else(|| {
                FontError::EncodingFailure(format!(
                    "code point {codepoint:#X} of '{}' is not a Unicode scalar value",
                    glyph.name
                ))
            })?;
            mappings.push((ch, GlyphId::new(index as u32)));
        }
    }
    Ok(mappings)
}

/// PostScript name: printable ASCII without spaces or delimiters, at most 63 bytes.
fn postscript_name(family: &str, style: &str) -> String {
    let sanitize = |s: &str| -> String {
        s.chars()
            .filter(|c| c.is_ascii_graphic() && !"[](){}<>/%".contains(*c))
            .collect()
    };
    let mut name = format!("{}-{}", sanitize(family), sanitize(style));
    name.truncate(63);
    name
}

fn build_name(glyph_set: &GlyphSet) -> Name {
    let family = glyph_set.family_name.clone();
    let style = glyph_set.style_name.clone();
    let ps_name = postscript_name(&family, &style);
    let records = [
        (NameId::FAMILY_NAME, family.clone()),
        (NameId::SUBFAMILY_NAME, style.clone()),
        (NameId::UNIQUE_ID, format!("{ps_name};{FONT_VERSION}")),
        (NameId::FULL_NAME, format!("{family} {style}")),
        (NameId::VERSION_STRING, FONT_VERSION.to_string()),
        (NameId::POSTSCRIPT_NAME, ps_name),
    ];
    // records are pushed in ascending name id order, which keeps the table sorted
    Name::new(
        records
            .into_iter()
            .map(|(id, value)| {
                NameRecord::new(
                    PLATFORM_WINDOWS,
                    ENCODING_UNICODE_BMP,
                    LANGUAGE_EN_US,
                    id,
                    value.into(),
                )
            })
            .collect(),
    )
}

fn build_maxp(compiled: &[CompiledGlyph]) -> Maxp {
    let max_contours = compiled.iter().map(|g| g.contours).max().unwrap_or(0);
    Maxp {
        num_glyphs: compiled.len() as u16,
        max_points: Some(max_contours.saturating_mul(4)),
        max_contours: Some(max_contours),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    }
}

fn build_hhea(glyph_set: &GlyphSet, compiled: &[CompiledGlyph]) -> Hhea {
    let inked = || compiled.iter().filter_map(|g| g.bounds.map(|b| (g, b)));
    let min_lsb = inked().map(|(_, b)| b.x_min).min().unwrap_or(0);
    let min_rsb = inked()
        .map(|(g, b)| (i32::from(g.advance) - i32::from(b.x_max)) as i16)
        .min()
        .unwrap_or(0);
    let max_extent = inked().map(|(_, b)| b.x_max).max().unwrap_or(0);
    Hhea {
        ascender: FWord::new(glyph_set.metrics.ascender),
        descender: FWord::new(glyph_set.metrics.descender),
        line_gap: FWord::new(0),
        advance_width_max: UfWord::new(compiled.iter().map(|g| g.advance).max().unwrap_or(0)),
        min_left_side_bearing: FWord::new(min_lsb),
        min_right_side_bearing: FWord::new(min_rsb),
        x_max_extent: FWord::new(max_extent),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: compiled.len() as u16,
    }
}

fn build_os2(
    glyph_set: &GlyphSet,
    compiled: &[CompiledGlyph],
    font_bounds: Bounds,
) -> Os2 {
    let metrics = glyph_set.metrics;
    let advances: Vec<u32> = compiled
        .iter()
        .map(|g| u32::from(g.advance))
        .filter(|&a| a > 0)
        .collect();
    let avg_width = if advances.is_empty() {
        0
    } else {
        (advances.iter().sum::<u32>() as f64 / advances.len() as f64).round() as i16
    };
    let codepoints = || glyph_set.glyphs.iter().filter_map(|g| g.codepoint);
    let first = codepoints().min().unwrap_or(0).min(0xFFFF) as u16;
    let last = codepoints().max().unwrap_or(0).min(0xFFFF) as u16;
    let height_of = |codepoint: u32| {
        glyph_set
            .glyphs
            .iter()
            .position(|g| g.codepoint == Some(codepoint))
            .and_then(|i| compiled[i].bounds)
            .map(|b| b.y_max)
    };

    Os2 {
        x_avg_char_width: avg_width,
        fs_selection: SelectionFlags::REGULAR,
        us_weight_class: 400,
        us_width_class: 5,
        s_typo_ascender: metrics.ascender,
        s_typo_descender: metrics.descender,
        s_typo_line_gap: 0,
        us_win_ascent: metrics.ascender.max(font_bounds.y_max).max(0) as u16,
        us_win_descent: (-metrics.descender).max(-font_bounds.y_min).max(0) as u16,
        us_first_char_index: first,
        us_last_char_index: last,
        ul_code_page_range_1: Some(1),
        ul_code_page_range_2: Some(0),
        sx_height: Some(height_of('x' as u32).unwrap_or(metrics.ascender / 2)),
        s_cap_height: Some(height_of('H' as u32).unwrap_or(metrics.ascender)),
        us_default_char: Some(0),
        us_break_char: Some(32),
        us_max_context: Some(0),
        ..Default::default()
    }
}

fn build_post(glyph_set: &GlyphSet, compiled: &[CompiledGlyph]) -> Post {
    // .notdef keeps its own width and is not considered
    let mut inked_advances = compiled
        .iter()
        .skip(1)
        .filter(|g| g.bounds.is_some())
        .map(|g| g.advance);
    let monospaced = match inked_advances.next() {
        Some(first) => inked_advances.all(|a| a == first),
        None => false,
    };
    let thickness = (glyph_set.units_per_em / 20).max(1) as i16;
    let mut post = Post::new_v2(glyph_set.glyphs.iter().map(|g| g.name.as_str()));
    post.underline_position = FWord::new(glyph_set.metrics.descender / 2);
    post.underline_thickness = FWord::new(thickness);
    post.is_fixed_pitch = u32::from(monospaced);
    post
}

/// Patch 'head'.checksumAdjustment once the final bytes are known.
fn apply_checksum_adjustment(font: &mut [u8]) {
    let read_u32 = |bytes: &[u8], at: usize| -> Option<u32> {
        bytes
            .get(at..at + 4)
            .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    };
    let Some(num_tables) = font.get(4..6).map(|b| u16::from_be_bytes([b[0], b[1]])) else {
        return;
    };
    let head_offset = (0..usize::from(num_tables))
        .map(|i| 12 + i * 16)
        .find(|&record| font.get(record..record + 4) == Some(b"head".as_slice()))
        .and_then(|record| read_u32(font, record + 8));
    let Some(head_offset) = head_offset else {
        return;
    };
    let adjustment_at = head_offset as usize + 8;
    if adjustment_at + 4 > font.len() {
        return;
    }
    font[adjustment_at..adjustment_at + 4].fill(0);
    let sum = font.chunks(4).fold(0u32, |acc, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        acc.wrapping_add(u32::from_be_bytes(word))
    });
    font[adjustment_at..adjustment_at + 4]
        .copy_from_slice(&CHECKSUM_MAGIC.wrapping_sub(sum).to_be_bytes());
}

impl FontEncoder for TrueTypeEncoder {
    fn encode(&self, glyph_set: &GlyphSet) -> Result<Vec<u8>> {
        let mappings = check_glyph_set(glyph_set)?;
        let compiled = glyph_set
            .glyphs
            .iter()
            .map(CompiledGlyph::compile)
            .collect::<Result<Vec<_>>>()?;

        let mut glyf_builder = GlyfLocaBuilder::new();
        for (glyph, compiled_glyph) in glyph_set.glyphs.iter().zip(&compiled) {
            glyf_builder
                .add_glyph(&compiled_glyph.simple)
                .map_err(|e| encoding_error(&glyph.name, e))?;
        }
        let (glyf, loca, loca_format) = glyf_builder.build();

        let font_bounds = compiled
            .iter()
            .filter_map(|g| g.bounds)
            .reduce(Bounds::union)
            .unwrap_or(Bounds {
                x_min: 0,
                y_min: 0,
                x_max: 0,
                y_max: 0,
            });

        let date = LongDateTime::new(self.timestamp + MAC_EPOCH_OFFSET);
        let head = Head::new(
            Fixed::from_f64(1.0),
            0,
            Flags::from_bits_truncate(0x0003),
            glyph_set.units_per_em,
            date,
            date,
            font_bounds.x_min,
            font_bounds.y_min,
            font_bounds.x_max,
            font_bounds.y_max,
            MacStyle::empty(),
            8,
            match loca_format {
                LocaFormat::Short => 0,
                LocaFormat::Long => 1,
            },
        );

        let hmtx = Hmtx {
            h_metrics: compiled
                .iter()
                .map(|g| LongMetric {
                    advance: g.advance,
                    side_bearing: g.left_side_bearing(),
                })
                .collect(),
            left_side_bearings: Vec::new(),
        };
        let cmap = Cmap::from_mappings(mappings)
            .map_err(|e| encoding_error("cmap", format!("{e:?}")))?;

        let mut builder = FontBuilder::new();
        builder
            .add_table(&head)
            .and_then(|b| b.add_table(&build_hhea(glyph_set, &compiled)))
            .and_then(|b| b.add_table(&build_maxp(&compiled)))
            .and_then(|b| b.add_table(&build_os2(glyph_set, &compiled, font_bounds)))
            .and_then(|b| b.add_table(&hmtx))
            .and_then(|b| b.add_table(&cmap))
            .and_then(|b| b.add_table(&loca))
            .and_then(|b| b.add_table(&glyf))
            .and_then(|b| b.add_table(&build_name(glyph_set)))
            .and_then(|b| b.add_table(&build_post(glyph_set, &compiled)))
            .map_err(|e| encoding_error("table compilation", e))?;

        let mut bytes = builder.build();
        apply_checksum_adjustment(&mut bytes);
        log::debug!(
            "encoded '{}' with {} glyphs into {} bytes",
            glyph_set.family_name,
            compiled.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}
