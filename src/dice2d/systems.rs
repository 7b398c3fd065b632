//! Bevy systems for the dice table
//!
//! The table state lives in the `DiceTable` resource; these systems feed it
//! input and frame time, then mirror its dice onto sprites.

use bevy::prelude::*;
use liarsdice_core::Table;

use super::types::*;

/// Pip slots spawned per die; the six face has the most pips.
const DOT_SLOTS: usize = 6;

// ============================================================================
// Setup
// ============================================================================

pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    table: Res<DiceTable>,
) {
    commands.spawn(Camera2d);

    let config = table.0.config();
    let dots = DotAssets {
        mesh: meshes.add(Circle::new(dot_radius(config.die_size))),
        material: materials.add(to_color(table.0.palette().dot)),
    };
    spawn_dice(&mut commands, &table.0, &dots);
    commands.insert_resource(dots);

    commands.spawn((
        Text::new(status_text(&table.0)),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        StatusText,
    ));

    info!("Table ready with {} dice", table.0.dice().len());
}

/// Spawn one sprite hierarchy per die: border, fill, and six pip slots.
pub fn spawn_dice(commands: &mut Commands, table: &Table, dots: &DotAssets) {
    let size = table.config().die_size;
    let field = table.config().field();

    for view in table.views() {
        let id = view.id;
        let outer = size + 2.0 * view.style.border_width;
        commands
            .spawn((
                DieSprite { id },
                Sprite::from_color(to_color(view.style.border), Vec2::splat(outer)),
                die_transform(&view, field),
            ))
            .with_children(|die| {
                die.spawn((
                    DieFace { id },
                    Sprite::from_color(to_color(view.style.fill), Vec2::splat(size)),
                    Transform::from_xyz(0.0, 0.0, 0.001),
                ));
                let pips = dot_offsets(&view, size);
                for slot in 0..DOT_SLOTS {
                    let (offset, visibility) = match pips.get(slot) {
                        Some(pip) => (*pip, Visibility::Inherited),
                        None => (Vec2::ZERO, Visibility::Hidden),
                    };
                    die.spawn((
                        DieDot { id, slot },
                        Mesh2d(dots.mesh.clone()),
                        MeshMaterial2d(dots.material.clone()),
                        Transform::from_translation(offset.extend(0.002)),
                        visibility,
                    ));
                }
            });
    }
}

// ============================================================================
// Input and time
// ============================================================================

pub fn handle_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut table: ResMut<DiceTable>,
    mut rng: ResMut<TableRng>,
    mut sfx: ResMut<SfxQueue>,
    mut sfx_settings: ResMut<SfxSettings>,
) {
    if keyboard.just_pressed(KeyCode::KeyM) {
        sfx_settings.muted = !sfx_settings.muted;
        info!("Sound {}", if sfx_settings.muted { "muted" } else { "on" });
    }

    for key in keyboard.get_just_pressed() {
        let Some(event) = key_to_event(*key) else {
            continue;
        };
        let response = table.0.handle(event, &mut rng.0, &mut *sfx);
        info!("{}", describe_response(response));
    }
}

/// Feed frame time to the roll.
pub fn advance_table(
    time: Res<Time>,
    mut table: ResMut<DiceTable>,
    mut rng: ResMut<TableRng>,
    mut sfx: ResMut<SfxQueue>,
) {
    if !table.0.is_rolling() {
        return;
    }
    if let Some(done) = table.0.update(time.delta(), &mut rng.0, &mut *sfx) {
        let faces: Vec<String> = done.faces.iter().map(|f| f.to_string()).collect();
        info!("Dice landed: {}", faces.join(" "));
    }
}

// ============================================================================
// Sprites
// ============================================================================

/// Rebuild the sprites when dice were added or removed.
pub fn respawn_dice_on_resize(
    mut commands: Commands,
    table: Res<DiceTable>,
    dots: Res<DotAssets>,
    roots: Query<Entity, With<DieSprite>>,
) {
    if roots.iter().count() == table.0.dice().len() {
        return;
    }
    for entity in &roots {
        commands.entity(entity).despawn();
    }
    spawn_dice(&mut commands, &table.0, &dots);
}

/// Copy position, rotation, scale, colours and pips from the table.
pub fn sync_dice(
    table: Res<DiceTable>,
    mut roots: Query<(&DieSprite, &mut Transform, &mut Sprite), (Without<DieFace>, Without<DieDot>)>,
    mut faces: Query<(&DieFace, &mut Sprite), Without<DieSprite>>,
    mut dots: Query<(&DieDot, &mut Transform, &mut Visibility), Without<DieSprite>>,
) {
    if !table.is_changed() {
        return;
    }

    let views = table.0.views();
    let size = table.0.config().die_size;
    let field = table.0.config().field();

    for (die, mut transform, mut sprite) in &mut roots {
        let Some(view) = views.get(die.id) else {
            continue;
        };
        *transform = die_transform(view, field);
        sprite.color = to_color(view.style.border);
        sprite.custom_size = Some(Vec2::splat(size + 2.0 * view.style.border_width));
    }

    for (face, mut sprite) in &mut faces {
        if let Some(view) = views.get(face.id) {
            sprite.color = to_color(view.style.fill);
        }
    }

    let pips: Vec<Vec<Vec2>> = views.iter().map(|view| dot_offsets(view, size)).collect();
    for (dot, mut transform, mut visibility) in &mut dots {
        let pip = pips.get(dot.id).and_then(|offsets| offsets.get(dot.slot));
        match pip {
            Some(pip) => {
                transform.translation = pip.extend(0.002);
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

pub fn update_status_text(table: Res<DiceTable>, mut texts: Query<&mut Text, With<StatusText>>) {
    if !table.is_changed() {
        return;
    }
    for mut text in &mut texts {
        text.0 = status_text(&table.0);
    }
}
