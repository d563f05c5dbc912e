//! PostScript glyph names for code points.
use once_cell::sync::Lazy;
use std::collections::HashMap;

// Standard names for the ASCII punctuation ranges
const PUNCTUATION: [(u32, &str); 32] = [
    (33, "exclam"),
    (34, "quotedbl"),
    (35, "numbersign"),
    (36, "dollar"),
    (37, "percent"),
    (38, "ampersand"),
    (39, "quotesingle"),
    (40, "parenleft"),
    (41, "parenright"),
    (42, "asterisk"),
    (43, "plus"),
    (44, "comma"),
    (45, "hyphen"),
    (46, "period"),
    (47, "slash"),
    (58, "colon"),
    (59, "semicolon"),
    (60, "less"),
    (61, "equal"),
    (62, "greater"),
    (63, "question"),
    (64, "at"),
    (91, "bracketleft"),
    (92, "backslash"),
    (93, "bracketright"),
    (94, "asciicircum"),
    (95, "underscore"),
    (96, "grave"),
    (123, "braceleft"),
    (124, "bar"),
    (125, "braceright"),
    (126, "asciitilde"),
];

static NAMES: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| PUNCTUATION.into_iter().collect());

pub const NOTDEF: &str = ".notdef";
pub const SPACE: &str = "space";

/// Name for the glyph mapped to `codepoint`.
///
/// Digits and ASCII letters are named by themselves, punctuation uses the
/// standard typographic names, anything else falls back to `uniXXXX`.
pub fn glyph_name(codepoint: u32) -> String {
    if let Some(name) = NAMES.get(&codepoint) {
        return (*name).to_string();
    }
    match codepoint {
        48..=57 | 65..=90 | 97..=122 => char::from(codepoint as u8).to_string(),
        _ => format!("uni{codepoint:04X}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_names() {
        assert_eq!(glyph_name(33), "exclam");
        assert_eq!(glyph_name(46), "period");
        assert_eq!(glyph_name(126), "asciitilde");
    }

    #[test]
    fn alphanumerics_name_themselves() {
        assert_eq!(glyph_name(65), "A");
        assert_eq!(glyph_name(122), "z");
        assert_eq!(glyph_name(49), "1");
    }

    #[test]
    fn fallback_is_uppercase_hex() {
        assert_eq!(glyph_name(0x2603), "uni2603");
        assert_eq!(glyph_name(0xe9), "uni00E9");
        assert_eq!(glyph_name(0x7f), "uni007F");
        assert_eq!(glyph_name(0x1f600), "uni1F600");
    }
}
