use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("no designed characters: draw at least one glyph before exporting")]
    NoContent,
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("font encoding failed: {0}")]
    EncodingFailure(String),
    #[error("font delivery failed: {0}")]
    DeliveryFailure(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FontError>;
