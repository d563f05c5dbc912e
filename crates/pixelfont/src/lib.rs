//! pixelfont: pixel grid font toolkit.
//! Features: bitmap editing, rectangle outline conversion, TrueType export.

pub mod bitmap;
pub mod coverage;
pub mod encoder;
mod error;
pub mod export;
pub mod glyph_set;
pub mod metrics;
pub mod naming;
pub mod outline;
#[cfg(feature = "serde")]
pub mod project;
mod settings;

pub use bitmap::{BitmapCollection, CharacterBitmap, ResizeAnchor, ShiftDirection};
pub use coverage::{coverage, Coverage};
pub use encoder::{FontEncoder, TrueTypeEncoder};
pub use error::{FontError, Result};
#[cfg(feature = "tokio")]
pub use export::export_font_async;
pub use export::{
    export_filename, export_font, generate_font, Delivery, ExportFormat, ExportReport,
    HostUpload, SaveToDirectory,
};
pub use glyph_set::{assemble, Glyph, GlyphSet};
pub use outline::Rectangle;
#[cfg(feature = "serde")]
pub use project::Project;
pub use settings::{FontSettings, DEFAULT_FONT_NAME, DEFAULT_GRID_SIZE, DEFAULT_UNITS_PER_EM};

// Test utilities
pub mod test_support;
