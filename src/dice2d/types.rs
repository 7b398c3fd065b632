//! Resources, components and helpers for the 2D dice table

use bevy::prelude::*;
use liarsdice_core::{ColorSetting, DieView, InputEvent, SoundCue, SoundEmitter, Table, TableResponse};
use rand::rngs::StdRng;

// ============================================================================
// Resources
// ============================================================================

/// The table session driven by the systems.
#[derive(Resource)]
pub struct DiceTable(pub Table);

/// Randomness for rolls and sound synthesis.
#[derive(Resource)]
pub struct TableRng(pub StdRng);

/// Sound cues emitted this frame, drained by `play_sound_cues`.
#[derive(Resource, Default)]
pub struct SfxQueue(pub Vec<SoundCue>);

impl SoundEmitter for SfxQueue {
    fn emit(&mut self, cue: SoundCue) {
        self.0.push(cue);
    }
}

#[derive(Resource, Debug, Clone)]
pub struct SfxSettings {
    pub muted: bool,
    pub sample_rate: u32,
}

impl Default for SfxSettings {
    fn default() -> Self {
        Self {
            muted: false,
            sample_rate: 44_100,
        }
    }
}

// ============================================================================
// Components
// ============================================================================

/// Root entity of a die: the border sprite, moved and rotated as a whole.
#[derive(Component, Debug, Clone, Copy)]
pub struct DieSprite {
    pub id: usize,
}

/// Fill sprite inside the border.
#[derive(Component, Debug, Clone, Copy)]
pub struct DieFace {
    pub id: usize,
}

/// One of the six pip slots of a die; unused slots are hidden.
#[derive(Component, Debug, Clone, Copy)]
pub struct DieDot {
    pub id: usize,
    pub slot: usize,
}

#[derive(Component)]
pub struct StatusText;

// ============================================================================
// Helpers
// ============================================================================

/// Play-field coordinates (origin top left, y down) to world coordinates
/// (origin at the centre, y up).
pub fn to_world(position: Vec2, field: Vec2) -> Vec2 {
    Vec2::new(position.x - field.x / 2.0, field.y / 2.0 - position.y)
}

/// Transform of a die's root sprite.
pub fn die_transform(view: &DieView, field: Vec2) -> Transform {
    let world = to_world(view.position, field);
    Transform::from_xyz(world.x, world.y, view.id as f32 * 0.01)
        .with_rotation(Quat::from_rotation_z(-view.rotation.to_radians()))
        .with_scale(Vec3::splat(view.scale))
}

/// Pip centres of `view` for a die of edge `size`, relative to the die with
/// y up.
pub fn dot_offsets(view: &DieView, size: f32) -> Vec<Vec2> {
    view.dot_positions(size)
        .map(|pip| Vec2::new(pip.x, -pip.y))
        .collect()
}

pub fn to_color(color: ColorSetting) -> Color {
    Color::srgba(color.r, color.g, color.b, color.a)
}

/// Input event bound to a key, if any.
pub fn key_to_event(key: KeyCode) -> Option<InputEvent> {
    let value: u8 = match key {
        KeyCode::Space | KeyCode::KeyR => return Some(InputEvent::RollRequested),
        KeyCode::Escape => return Some(InputEvent::CancelRoll),
        KeyCode::Digit0 | KeyCode::Numpad0 | KeyCode::Backspace => {
            return Some(InputEvent::ValueDeselected)
        }
        KeyCode::ArrowUp | KeyCode::Equal | KeyCode::NumpadAdd => return Some(InputEvent::AddDie),
        KeyCode::ArrowDown | KeyCode::Minus | KeyCode::NumpadSubtract => {
            return Some(InputEvent::RemoveDie)
        }
        KeyCode::Digit1 | KeyCode::Numpad1 => 1,
        KeyCode::Digit2 | KeyCode::Numpad2 => 2,
        KeyCode::Digit3 | KeyCode::Numpad3 => 3,
        KeyCode::Digit4 | KeyCode::Numpad4 => 4,
        KeyCode::Digit5 | KeyCode::Numpad5 => 5,
        KeyCode::Digit6 | KeyCode::Numpad6 => 6,
        _ => return None,
    };
    value.try_into().ok().map(InputEvent::ValueSelected)
}

/// Text shown in the corner of the window.
pub fn status_text(table: &Table) -> String {
    let mut text = if table.is_rolling() {
        String::from("Rolling...\n")
    } else {
        let faces: Vec<String> = table.faces().iter().map(|f| f.to_string()).collect();
        format!("Dice: {}\n", faces.join(" "))
    };

    match (table.selection().target(), table.tally()) {
        (Some(_), Some(tally)) => {
            let noun = if tally.count == 1 { "die" } else { "dice" };
            text.push_str(&format!("{} {} showing {}\n", tally.count, noun, tally.target));
        }
        (Some(target), None) => text.push_str(&format!("Counting {}s after the roll\n", target)),
        (None, _) => text.push_str("Press 1-6 to count a value\n"),
    }

    text.push_str("SPACE roll | 0 clear | UP/DOWN dice | ESC cancel");
    text
}

/// Log line for a table response.
pub fn describe_response(response: TableResponse) -> String {
    match response {
        TableResponse::RollStarted => "Roll started".to_string(),
        TableResponse::Busy => "Dice are still rolling".to_string(),
        TableResponse::RollCancelled => "Roll cancelled".to_string(),
        TableResponse::NotRolling => "No roll to cancel".to_string(),
        TableResponse::SelectionChanged(Some(value)) => format!("Counting {}s", value),
        TableResponse::SelectionChanged(None) => "Selection cleared".to_string(),
        TableResponse::DiceCountChanged(n) => format!("{} dice on the table", n),
        TableResponse::DiceCountAtLimit(n) => format!("Dice count stays at {}", n),
    }
}

/// Shared mesh and material for the pips.
#[derive(Resource, Clone)]
pub struct DotAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<ColorMaterial>,
}

/// Pip radius for a die of edge `size`.
pub fn dot_radius(size: f32) -> f32 {
    size * 0.09
}
