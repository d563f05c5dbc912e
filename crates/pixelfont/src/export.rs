//! Export pipeline: gate, assemble, encode, deliver.
//!
//! The pipeline itself never touches the outside world; where the bytes end up
//! is decided by the [`Delivery`] the caller passes in.
use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use base64::{engine::general_purpose, Engine};

use crate::{
    bitmap::BitmapCollection,
    coverage::{coverage, Coverage},
    encoder::FontEncoder,
    error::{FontError, Result},
    glyph_set::assemble,
    settings::FontSettings,
};

/// Container flavour offered to the user. Both carry TrueType outlines; the
/// choice only affects the file extension and MIME type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Ttf,
    Otf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Ttf => "ttf",
            ExportFormat::Otf => "otf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Ttf => "font/ttf",
            ExportFormat::Otf => "font/otf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = FontError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ttf" | "truetype" => Ok(ExportFormat::Ttf),
            "otf" | "opentype" => Ok(ExportFormat::Otf),
            other => Err(FontError::InvalidSettings(format!(
                "unknown export format '{other}'"
            ))),
        }
    }
}

/// Final hand-off of an encoded font.
pub trait Delivery {
    type Error: Display;
    fn deliver(
        &mut self,
        bytes: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> std::result::Result<(), Self::Error>;
}

/// Writes the font into a directory under the export filename.
#[derive(Clone, Debug)]
pub struct SaveToDirectory {
    dir: PathBuf,
    written: Option<PathBuf>,
}

impl SaveToDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the last file written, if any.
    pub fn written(&self) -> Option<&Path> {
        self.written.as_deref()
    }
}

impl Delivery for SaveToDirectory {
    type Error = std::io::Error;

    fn deliver(
        &mut self,
        bytes: Vec<u8>,
        filename: &str,
        _mime_type: &str,
    ) -> std::result::Result<(), Self::Error> {
        let path = self.dir.join(filename);
        fs::write(&path, bytes)?;
        log::info!("wrote {}", path.display());
        self.written = Some(path);
        Ok(())
    }
}

/// Hands the font to a host environment as a `data:` URL.
///
/// The callback receives `(data_url, filename, mime_type)`.
pub struct HostUpload<F> {
    upload: F,
}

impl<F> HostUpload<F> {
    pub fn new(upload: F) -> Self {
        Self { upload }
    }
}

pub fn data_url(bytes: &[u8], mime_type: &str) -> String {
    format!(
        "data:{mime_type};base64,{}",
        general_purpose::STANDARD.encode(bytes)
    )
}

impl<F, E> Delivery for HostUpload<F>
where
    F: FnMut(&str, &str, &str) -> std::result::Result<(), E>,
    E: Display,
{
    type Error = E;

    fn deliver(
        &mut self,
        bytes: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> std::result::Result<(), Self::Error> {
        let url = data_url(&bytes, mime_type);
        (self.upload)(&url, filename, mime_type)
    }
}

/// Outcome of a successful export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportReport {
    pub filename: String,
    pub byte_len: usize,
    /// Including `.notdef` and `space`
    pub glyph_count: usize,
    pub coverage: Coverage,
}

/// `my_font.ttf` style name: every non alphanumeric ASCII char becomes `_`.
pub fn export_filename(font_name: &str, format: ExportFormat) -> String {
    let stem: String = font_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}.{}", format.extension())
}

struct Encoded {
    bytes: Vec<u8>,
    glyph_count: usize,
    coverage: Coverage,
}

fn encode_collection<E: FontEncoder + ?Sized>(
    bitmaps: &BitmapCollection,
    settings: &FontSettings,
    encoder: &E,
) -> Result<Encoded> {
    settings.validate()?;
    // a drawn space is replaced by the system space glyph, so it does not count
    let coverage = coverage(Some(bitmaps));
    if !coverage.is_exportable() {
        log::warn!("export rejected: no designed characters");
        return Err(FontError::NoContent);
    }
    for (code, bitmap) in bitmaps.iter().filter(|(_, b)| b.is_designed()) {
        settings.check_grid(bitmap.size()).inspect_err(|e| {
            log::warn!("export rejected: U+{code:04X}: {e}");
        })?;
    }
    let glyph_set = assemble(bitmaps, settings);
    log::debug!(
        "assembled {} glyphs ({} designed) for '{}'",
        glyph_set.glyphs.len(),
        coverage.designed,
        glyph_set.family_name
    );
    let bytes = encoder.encode(&glyph_set).inspect_err(|e| {
        log::warn!("encoding '{}' failed: {e}", glyph_set.family_name);
    })?;
    Ok(Encoded {
        bytes,
        glyph_count: glyph_set.glyphs.len(),
        coverage,
    })
}

/// Build the font bytes without delivering them.
pub fn generate_font<E: FontEncoder + ?Sized>(
    bitmaps: &BitmapCollection,
    settings: &FontSettings,
    encoder: &E,
) -> Result<Vec<u8>> {
    encode_collection(bitmaps, settings, encoder).map(|encoded| encoded.bytes)
}

/// Run the whole export and hand the result to `delivery`.
///
/// Fails with [`FontError::NoContent`] before the encoder is called when no
/// character in `!`..=`~` has a filled cell. Nothing is retried; on failure the bytes are
/// dropped.
pub fn export_font<E, D>(
    bitmaps: &BitmapCollection,
    settings: &FontSettings,
    encoder: &E,
    delivery: &mut D,
    format: ExportFormat,
) -> Result<ExportReport>
where
    E: FontEncoder + ?Sized,
    D: Delivery + ?Sized,
{
    let Encoded {
        bytes,
        glyph_count,
        coverage,
    } = encode_collection(bitmaps, settings, encoder)?;
    let filename = export_filename(settings.family_name(), format);
    let byte_len = bytes.len();
    delivery
        .deliver(bytes, &filename, format.mime_type())
        .map_err(|e| {
            log::warn!("delivery of {filename} failed: {e}");
            FontError::DeliveryFailure(e.to_string())
        })?;
    log::info!("exported {filename}: {glyph_count} glyphs, {byte_len} bytes");
    Ok(ExportReport {
        filename,
        byte_len,
        glyph_count,
        coverage,
    })
}

/// [`export_font`] on a blocking worker thread.
///
/// The collection and settings are cloned before this returns, so edits made
/// while the export runs do not affect it. The delivery is moved into the
/// worker and handed back on success.
#[cfg(feature = "tokio")]
pub fn export_font_async<E, D>(
    bitmaps: &BitmapCollection,
    settings: &FontSettings,
    encoder: E,
    mut delivery: D,
    format: ExportFormat,
) -> impl std::future::Future<Output = Result<(ExportReport, D)>> + Send + 'static
where
    E: FontEncoder + Send + 'static,
    D: Delivery + Send + 'static,
{
    let bitmaps = bitmaps.clone();
    let settings = settings.clone();
    async move {
        tokio::task::spawn_blocking(move || {
            export_font(&bitmaps, &settings, &encoder, &mut delivery, format)
                .map(|report| (report, delivery))
        })
        .await
        .map_err(|e| FontError::DeliveryFailure(format!("export task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(export_filename("My Font!", ExportFormat::Ttf), "my_font_.ttf");
        assert_eq!(export_filename("Pixel8", ExportFormat::Otf), "pixel8.otf");
        assert_eq!(export_filename("Ünïcode", ExportFormat::Ttf), "_n_code.ttf");
    }

    #[test]
    fn formats() {
        assert_eq!(ExportFormat::Ttf.mime_type(), "font/ttf");
        assert_eq!(ExportFormat::Otf.mime_type(), "font/otf");
        assert_eq!("OTF".parse::<ExportFormat>().unwrap(), ExportFormat::Otf);
        assert!("woff".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn data_url_layout() {
        assert_eq!(data_url(b"abc", "font/ttf"), "data:font/ttf;base64,YWJj");
    }

    #[test]
    fn host_upload_passes_name_and_mime() {
        let mut seen = Vec::new();
        let mut upload = HostUpload::new(|url: &str, name: &str, mime: &str| {
            seen.push((url.to_string(), name.to_string(), mime.to_string()));
            Ok::<(), String>(())
        });
        upload.deliver(vec![1, 2, 3], "a.ttf", "font/ttf").unwrap();
        drop(upload);
        assert_eq!(
            seen,
            vec![(
                "data:font/ttf;base64,AQID".to_string(),
                "a.ttf".to_string(),
                "font/ttf".to_string()
            )]
        );
    }
}
