use pixelfont::{
    generate_font, test_support::bitmap_from_art, BitmapCollection, CharacterBitmap,
    FontSettings, TrueTypeEncoder,
};
use pretty_assertions::assert_eq;
use write_fonts::{
    read::{
        tables::{glyf::Glyph as ReadGlyph, os2::SelectionFlags},
        FontRef, TableProvider,
    },
    types::{GlyphId, Tag},
};

fn encode(bitmaps: &BitmapCollection, units_per_em: u16) -> Vec<u8> {
    let settings = FontSettings {
        font_name: "Readback".into(),
        units_per_em,
        ..Default::default()
    };
    generate_font(bitmaps, &settings, &TrueTypeEncoder::with_timestamp(0)).unwrap()
}

fn collection() -> BitmapCollection {
    let mut bitmaps = BitmapCollection::new();
    // two separate strokes: the merge yields two rectangles
    bitmaps.insert('A' as u32, bitmap_from_art(&["#.#", "#.#", "#.#"]).unwrap());
    bitmaps.insert('B' as u32, bitmap_from_art(&["###", "###", "###"]).unwrap());
    bitmaps.insert(0x2603, CharacterBitmap::new(3).unwrap());
    bitmaps
}

#[test]
fn test_tables_are_present() {
    let bytes = encode(&collection(), 1000);
    let font = FontRef::new(&bytes).unwrap();
    for tag in [
        b"head", b"hhea", b"maxp", b"OS/2", b"hmtx", b"cmap", b"loca", b"glyf", b"name",
        b"post",
    ] {
        assert!(
            font.table_data(Tag::new(tag)).is_some(),
            "missing {}",
            String::from_utf8_lossy(tag)
        );
    }
}

#[test]
fn test_glyph_count_and_cmap() {
    let bytes = encode(&collection(), 1000);
    let font = FontRef::new(&bytes).unwrap();
    // .notdef, space, A, B, uni2603
    assert_eq!(font.maxp().unwrap().num_glyphs(), 5);

    let cmap = font.cmap().unwrap();
    assert_eq!(cmap.map_codepoint(' '), Some(GlyphId::new(1)));
    assert_eq!(cmap.map_codepoint('A'), Some(GlyphId::new(2)));
    assert_eq!(cmap.map_codepoint('B'), Some(GlyphId::new(3)));
    assert_eq!(cmap.map_codepoint('\u{2603}'), Some(GlyphId::new(4)));
    assert_eq!(cmap.map_codepoint('C'), None);
}

#[test]
fn test_vertical_metrics() {
    let bytes = encode(&collection(), 2048);
    let font = FontRef::new(&bytes).unwrap();
    assert_eq!(font.head().unwrap().units_per_em(), 2048);
    let hhea = font.hhea().unwrap();
    assert_eq!(hhea.ascender().to_i16(), 1638);
    assert_eq!(hhea.descender().to_i16(), -410);
}

#[test]
fn test_advances() {
    let bytes = encode(&collection(), 1000);
    let font = FontRef::new(&bytes).unwrap();
    let hmtx = font.hmtx().unwrap();
    let advances: Vec<u16> = hmtx.h_metrics().iter().map(|m| m.advance()).collect();
    // notdef 80%, space 50%, designed full grid, undesigned 50%
    assert_eq!(advances, vec![800, 500, 1000, 1000, 500]);
}

#[test]
fn test_one_contour_per_rectangle() {
    let bytes = encode(&collection(), 900);
    let font = FontRef::new(&bytes).unwrap();
    let loca = font.loca(None).unwrap();
    let glyf = font.glyf().unwrap();

    let contours = |gid: u32| match loca.get_glyf(GlyphId::new(gid), &glyf).unwrap() {
        Some(ReadGlyph::Simple(glyph)) => glyph.number_of_contours(),
        Some(ReadGlyph::Composite(_)) => panic!("unexpected composite glyph"),
        None => 0,
    };
    assert_eq!(contours(0), 1);
    assert_eq!(contours(1), 0);
    assert_eq!(contours(2), 2);
    assert_eq!(contours(3), 1);
    assert_eq!(contours(4), 0);

    let head = font.head().unwrap();
    assert_eq!(head.x_min(), 0);
    assert_eq!(head.y_min(), 0);
    assert_eq!(head.x_max(), 900);
    assert_eq!(head.y_max(), 900);
}

#[test]
fn test_style_is_regular() {
    let bytes = encode(&collection(), 1000);
    let font = FontRef::new(&bytes).unwrap();
    let os2 = font.os2().unwrap();
    assert_eq!(os2.fs_selection(), SelectionFlags::REGULAR);
    assert_eq!(os2.us_weight_class(), 400);
}
