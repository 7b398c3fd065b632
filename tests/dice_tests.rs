//! Tests for the dice table helpers

use bevy::prelude::*;
use liarsdice::dice2d::{
    clip_for, describe_response, die_transform, dot_offsets, key_to_event, status_text, to_color,
    to_world,
};
use liarsdice_core::{
    ColorSetting, DieView, FaceValue, GameConfig, InputEvent, Palette, SoundCue, Table,
    TableResponse,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn face(v: u8) -> FaceValue {
    FaceValue::try_from(v).unwrap()
}

fn table(values: &[u8]) -> Table {
    let faces: Vec<FaceValue> = values.iter().map(|v| face(*v)).collect();
    Table::with_faces(GameConfig::default(), &faces)
}

#[test]
fn test_to_world_flips_y_around_centre() {
    let field = Vec2::new(800.0, 600.0);
    assert_eq!(to_world(Vec2::new(400.0, 300.0), field), Vec2::ZERO);
    assert_eq!(to_world(Vec2::new(0.0, 0.0), field), Vec2::new(-400.0, 300.0));
    assert_eq!(to_world(Vec2::new(800.0, 600.0), field), Vec2::new(400.0, -300.0));
}

#[test]
fn test_die_transform_rotates_clockwise() {
    let t = table(&[3]);
    let mut view: DieView = t.views().remove(0);
    view.rotation = 90.0;
    view.scale = 1.15;

    let transform = die_transform(&view, t.config().field());
    let right = transform.rotation * Vec3::X;
    // Clockwise on screen: +x turns to -y in world space.
    assert!((right - Vec3::NEG_Y).length() < 1e-5);
    assert!((transform.scale - Vec3::splat(1.15)).length() < 1e-6);
    assert_eq!(transform.translation.x, view.position.x - 400.0);
}

#[test]
fn test_dot_offsets_follow_core_layout_with_y_up() {
    let t = table(&[2]);
    let view = t.views().remove(0);
    let core: Vec<Vec2> = view.dot_positions(40.0).collect();
    let offsets = dot_offsets(&view, 40.0);

    assert_eq!(offsets.len(), core.len());
    for (offset, pip) in offsets.iter().zip(&core) {
        assert_eq!(offset.x, pip.x);
        assert_eq!(offset.y, -pip.y);
    }
    // Top-left pip in screen space sits up and to the left in world space.
    assert!((offsets[0] - Vec2::new(-8.0, 8.0)).length() < 1e-5);
}

#[test]
fn test_to_color_keeps_components() {
    let color = to_color(ColorSetting::rgb(0x27AE60)).to_srgba();
    let expected = ColorSetting::rgb(0x27AE60);
    assert!((color.red - expected.r).abs() < 1e-6);
    assert!((color.green - expected.g).abs() < 1e-6);
    assert!((color.blue - expected.b).abs() < 1e-6);
    assert_eq!(color.alpha, 1.0);
}

#[test]
fn test_highlight_palette_maps_to_distinct_colors() {
    let palette = Palette::default();
    assert_ne!(to_color(palette.neutral.fill), to_color(palette.highlight.fill));
    assert_ne!(to_color(palette.neutral.border), to_color(palette.highlight.border));
}

#[test]
fn test_key_bindings() {
    assert_eq!(key_to_event(KeyCode::Space), Some(InputEvent::RollRequested));
    assert_eq!(key_to_event(KeyCode::Digit4), Some(InputEvent::ValueSelected(face(4))));
    assert_eq!(key_to_event(KeyCode::Numpad6), Some(InputEvent::ValueSelected(face(6))));
    assert_eq!(key_to_event(KeyCode::Digit0), Some(InputEvent::ValueDeselected));
    assert_eq!(key_to_event(KeyCode::ArrowUp), Some(InputEvent::AddDie));
    assert_eq!(key_to_event(KeyCode::ArrowDown), Some(InputEvent::RemoveDie));
    assert_eq!(key_to_event(KeyCode::Escape), Some(InputEvent::CancelRoll));
    assert_eq!(key_to_event(KeyCode::Digit7), None);
    assert_eq!(key_to_event(KeyCode::KeyQ), None);
}

#[test]
fn test_status_text_shows_faces_and_tally() {
    let mut t = table(&[1, 1, 3, 4, 1]);
    let text = status_text(&t);
    assert!(text.starts_with("Dice: 1 1 3 4 1\n"));
    assert!(text.contains("Press 1-6"));

    let mut rng = StdRng::seed_from_u64(1);
    let mut sounds: Vec<SoundCue> = Vec::new();
    t.handle(InputEvent::ValueSelected(face(3)), &mut rng, &mut sounds);
    assert!(status_text(&t).contains("4 dice showing 3"));

    t.handle(InputEvent::RollRequested, &mut rng, &mut sounds);
    let rolling = status_text(&t);
    assert!(rolling.starts_with("Rolling..."));
    assert!(rolling.contains("Counting 3s after the roll"));
}

#[test]
fn test_describe_response() {
    assert_eq!(describe_response(TableResponse::RollStarted), "Roll started");
    assert_eq!(
        describe_response(TableResponse::SelectionChanged(Some(face(2)))),
        "Counting 2s"
    );
    assert_eq!(describe_response(TableResponse::DiceCountAtLimit(10)), "Dice count stays at 10");
}

#[test]
fn test_clip_for_is_a_wav() {
    let mut rng = StdRng::seed_from_u64(2);
    let clip = clip_for(SoundCue::WallThud, 44_100, &mut rng);
    assert_eq!(&clip.bytes[0..4], b"RIFF");
    assert_eq!(&clip.bytes[8..12], b"WAVE");
    assert!(clip.bytes.len() > 44);
}
