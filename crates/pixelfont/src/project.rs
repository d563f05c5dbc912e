//! JSON project files.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "fontName": "Blocky",
//!   "gridSize": 8,
//!   "charHeight": 8,
//!   "characters": {
//!     "65": { "char": "A", "charCode": 65, "gridSize": 8, "grid": [[0, 1], [1, 0]],
//!             "advanceWidth": 8, "leftBearing": 0, "rightBearing": 0 }
//!   },
//!   "characterCount": 1
//! }
//! ```
use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    bitmap::{BitmapCollection, CharacterBitmap},
    error::{FontError, Result},
    settings::{FontSettings, DEFAULT_GRID_SIZE},
};

pub const PROJECT_VERSION: &str = "1.0";
pub const UNTITLED_FONT: &str = "Untitled Font";

fn default_version() -> String {
    PROJECT_VERSION.to_string()
}

fn default_font_name() -> String {
    UNTITLED_FONT.to_string()
}

fn default_grid_size() -> usize {
    DEFAULT_GRID_SIZE
}

/// Grid cells are written as `0`/`1`; older files may contain booleans.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Cell {
    Flag(bool),
    Number(i64),
}

impl Cell {
    fn is_set(self) -> bool {
        match self {
            Cell::Flag(b) => b,
            Cell::Number(n) => n != 0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    char: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    char_code: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid_size: Option<usize>,
    grid: Vec<Vec<Cell>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    advance_width: Option<i32>,
    #[serde(default)]
    left_bearing: i32,
    #[serde(default)]
    right_bearing: i32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectFile {
    #[serde(default = "default_version")]
    version: String,
    #[serde(default = "default_font_name")]
    font_name: String,
    #[serde(default = "default_grid_size")]
    grid_size: usize,
    #[serde(default = "default_grid_size")]
    char_height: usize,
    #[serde(default)]
    characters: BTreeMap<String, CharacterEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created: Option<String>,
    #[serde(default)]
    character_count: usize,
}

/// A saved editing session: settings plus the drawn characters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Project {
    pub settings: FontSettings,
    pub characters: BitmapCollection,
    /// Creation timestamp as stored by the editor, passed through untouched
    pub created: Option<String>,
}

impl CharacterEntry {
    fn from_bitmap(code: u32, bitmap: &CharacterBitmap) -> Self {
        let grid = bitmap
            .rows()
            .map(|row| row.iter().map(|&c| Cell::Number(i64::from(c))).collect())
            .collect();
        Self {
            char: char::from_u32(code).map(String::from),
            char_code: Some(code),
            grid_size: Some(bitmap.size()),
            grid,
            advance_width: Some(bitmap.advance_width),
            left_bearing: bitmap.left_bearing,
            right_bearing: bitmap.right_bearing,
        }
    }

    fn into_bitmap(self, code: u32) -> Result<CharacterBitmap> {
        let rows: Vec<Vec<bool>> = self
            .grid
            .iter()
            .map(|row| row.iter().map(|c| c.is_set()).collect())
            .collect();
        let mut bitmap = CharacterBitmap::from_rows(&rows)
            .map_err(|e| match e {
                FontError::InvalidGrid(msg) => FontError::InvalidGrid(format!("character {code}: {msg}")),
                other => other,
            })?;
        if let Some(size) = self.grid_size {
            if size != bitmap.size() {
                return Err(FontError::InvalidGrid(format!(
                    "character {code}: gridSize {size} but grid is {}x{}",
                    bitmap.size(),
                    bitmap.size()
                )));
            }
        }
        if self.char_code.is_some_and(|c| c != code) {
            log::warn!("character {code}: charCode disagrees with its key, using the key");
        }
        bitmap.advance_width = self.advance_width.unwrap_or(bitmap.size() as i32);
        bitmap.left_bearing = self.left_bearing;
        bitmap.right_bearing = self.right_bearing;
        Ok(bitmap)
    }
}

impl Project {
    pub fn new(settings: FontSettings) -> Self {
        Self {
            settings,
            characters: BitmapCollection::new(),
            created: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: ProjectFile =
            serde_json::from_str(json).map_err(|e| FontError::Parse(format!("project: {e}")))?;
        if file.version != PROJECT_VERSION {
            log::warn!("project version {} differs from {PROJECT_VERSION}", file.version);
        }

        let mut characters = BitmapCollection::new();
        for (key, entry) in file.characters {
            let code: u32 = key
                .trim()
                .parse()
                .map_err(|_| FontError::Parse(format!("character key '{key}' is not a code point")))?;
            characters.insert(code, entry.into_bitmap(code)?);
        }
        log::debug!("loaded project '{}' with {} characters", file.font_name, characters.len());

        Ok(Self {
            settings: FontSettings {
                font_name: file.font_name,
                grid_size: file.grid_size,
                char_height: file.char_height,
                ..Default::default()
            },
            characters,
            created: file.created,
        })
    }

    /// Serialize the project. Only designed characters are written.
    pub fn to_json(&self) -> Result<String> {
        let characters: BTreeMap<String, CharacterEntry> = self
            .characters
            .iter()
            .filter(|(_, bitmap)| bitmap.is_designed())
            .map(|(&code, bitmap)| (code.to_string(), CharacterEntry::from_bitmap(code, bitmap)))
            .collect();
        let file = ProjectFile {
            version: default_version(),
            font_name: self.settings.font_name.clone(),
            grid_size: self.settings.grid_size,
            char_height: self.settings.char_height,
            character_count: characters.len(),
            characters,
            created: self.created.clone(),
        };
        serde_json::to_string_pretty(&file).map_err(|e| FontError::Parse(format!("project: {e}")))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
