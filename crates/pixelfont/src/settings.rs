use crate::error::{FontError, Result};

pub const DEFAULT_FONT_NAME: &str = "MyPixelFont";
pub const DEFAULT_GRID_SIZE: usize = 16;
pub const DEFAULT_UNITS_PER_EM: u16 = 1000;

// Valid 'head' unitsPerEm range
const MIN_UNITS_PER_EM: u16 = 16;
const MAX_UNITS_PER_EM: u16 = 16384;

/// Font wide generation settings.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct FontSettings {
    /// Family name written into the font
    pub font_name: String,
    /// Grid dimension used for new characters and when resampling
    pub grid_size: usize,
    /// Font units per em; every outline and metric is scaled by it
    pub units_per_em: u16,
    /// Editor row height, persisted with the project only
    pub char_height: usize,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            font_name: DEFAULT_FONT_NAME.to_string(),
            grid_size: DEFAULT_GRID_SIZE,
            units_per_em: DEFAULT_UNITS_PER_EM,
            char_height: DEFAULT_GRID_SIZE,
        }
    }
}

impl FontSettings {
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(FontError::InvalidSettings("grid size must be at least 1".into()));
        }
        if !(MIN_UNITS_PER_EM..=MAX_UNITS_PER_EM).contains(&self.units_per_em) {
            return Err(FontError::InvalidSettings(format!(
                "units per em {} outside {MIN_UNITS_PER_EM}..={MAX_UNITS_PER_EM}",
                self.units_per_em
            )));
        }
        self.check_grid(self.grid_size)
    }

    /// A grid cell must span at least one font unit, otherwise pixels round
    /// away to zero-area contours.
    pub fn check_grid(&self, grid_size: usize) -> Result<()> {
        if grid_size > usize::from(self.units_per_em) {
            return Err(FontError::InvalidSettings(format!(
                "{grid_size} cell grid is finer than {} units per em",
                self.units_per_em
            )));
        }
        Ok(())
    }

    /// Family name to export under; blank names fall back to the default.
    pub fn family_name(&self) -> &str {
        let name = self.font_name.trim();
        if name.is_empty() {
            DEFAULT_FONT_NAME
        } else {
            name
        }
    }
}
