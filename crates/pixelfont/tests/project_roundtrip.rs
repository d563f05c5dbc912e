#![cfg(feature = "serde")]

use pixelfont::{
    test_support::bitmap_from_art, CharacterBitmap, FontSettings, Project, ShiftDirection,
};
use pretty_assertions::assert_eq;

fn sample_project() -> Project {
    let mut project = Project::new(FontSettings {
        font_name: "Round Trip".into(),
        grid_size: 4,
        char_height: 5,
        ..Default::default()
    });
    let mut a = bitmap_from_art(&[".##.", "#..#", "####", "#..#"]).unwrap();
    a.advance_width = 5;
    a.left_bearing = 1;
    a.right_bearing = -1;
    project.characters.insert('A' as u32, a);

    let mut dot = CharacterBitmap::new(4).unwrap();
    dot.set_pixel(0, 0, true);
    dot.shift(ShiftDirection::Down);
    project.characters.insert('.' as u32, dot);

    project.characters.insert('Z' as u32, CharacterBitmap::new(4).unwrap());
    project.created = Some("2024-01-01T00:00:00.000Z".into());
    project
}

#[test]
fn test_designed_characters_survive_a_round_trip() {
    let project = sample_project();
    let restored = Project::from_json(&project.to_json().unwrap()).unwrap();

    assert_eq!(restored.settings.font_name, "Round Trip");
    assert_eq!(restored.settings.grid_size, 4);
    assert_eq!(restored.settings.char_height, 5);
    assert_eq!(restored.created, project.created);

    let mut expected = project.characters.clone();
    expected.remove(&('Z' as u32));
    assert_eq!(restored.characters, expected);
}

#[test]
fn test_save_and_load_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("font.json");
    let project = sample_project();
    project.save(&path).unwrap();

    let loaded = Project::load(&path).unwrap();
    assert_eq!(loaded.characters.len(), 2);
    assert_eq!(loaded.characters[&('A' as u32)].advance_width, 5);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Project::load(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, pixelfont::FontError::Io(_)));
}
