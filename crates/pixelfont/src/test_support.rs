//! Fixtures for the unit and integration tests.
//!
//! Bitmaps are drawn as ASCII art. The deliveries either keep the exported
//! bytes in memory or refuse them, and `CountingEncoder` records whether the
//! pipeline got as far as encoding.
use std::cell::Cell;

use crate::{
    bitmap::CharacterBitmap,
    encoder::{FontEncoder, TrueTypeEncoder},
    error::Result,
    export::Delivery,
    glyph_set::GlyphSet,
};

/// Build a bitmap from ASCII art rows, `#` marks a filled cell.
///
/// ```
/// let b = pixelfont::test_support::bitmap_from_art(&["#.", ".#"]).unwrap();
/// assert!(b.pixel(0, 0));
/// ```
pub fn bitmap_from_art(art: &[&str]) -> Result<CharacterBitmap> {
    let rows: Vec<Vec<bool>> = art
        .iter()
        .map(|line| line.chars().map(|c| c == '#').collect())
        .collect();
    CharacterBitmap::from_rows(&rows)
}

/// A delivered font as captured by [`MemoryDelivery`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivered {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
}

/// Collects delivered fonts in memory.
#[derive(Default)]
pub struct MemoryDelivery {
    pub delivered: Vec<Delivered>,
}

impl MemoryDelivery {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Delivery for MemoryDelivery {
    type Error = std::convert::Infallible;

    fn deliver(
        &mut self,
        bytes: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> std::result::Result<(), Self::Error> {
        self.delivered.push(Delivered {
            bytes,
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
        });
        Ok(())
    }
}

/// Delivery that always fails with the given message.
pub struct FailingDelivery(pub &'static str);

impl Delivery for FailingDelivery {
    type Error = String;

    fn deliver(
        &mut self,
        _bytes: Vec<u8>,
        _filename: &str,
        _mime_type: &str,
    ) -> std::result::Result<(), Self::Error> {
        Err(self.0.to_string())
    }
}

/// TrueType encoder that counts how often it was asked to encode.
pub struct CountingEncoder {
    inner: TrueTypeEncoder,
    calls: Cell<usize>,
}

impl CountingEncoder {
    pub fn new() -> Self {
        Self {
            inner: TrueTypeEncoder::with_timestamp(0),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Default for CountingEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FontEncoder for CountingEncoder {
    fn encode(&self, glyph_set: &GlyphSet) -> Result<Vec<u8>> {
        self.calls.set(self.calls.get() + 1);
        self.inner.encode(glyph_set)
    }
}
