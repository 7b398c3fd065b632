//! 2D dice table
//!
//! This module is organized into submodules:
//! - `types` - Resources, components and the pure helpers the systems use
//! - `systems` - Scene setup, input, roll updates and sprite sync
//! - `audio` - Turns queued sound cues into played clips

pub mod audio;
pub mod systems;
pub mod types;

pub use audio::*;
pub use systems::*;
pub use types::*;

use bevy::prelude::*;
use liarsdice_core::{GameConfig, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Everything the dice table needs: resources, startup scene and per-frame
/// systems.
pub struct LiarsDicePlugin {
    pub config: GameConfig,
}

impl Plugin for LiarsDicePlugin {
    fn build(&self, app: &mut App) {
        let mut rng = StdRng::from_entropy();
        let table = Table::new(self.config.clone(), &mut rng);

        app.insert_resource(ClearColor(to_color(self.config.background_color)))
            .insert_resource(DiceTable(table))
            .insert_resource(TableRng(rng))
            .init_resource::<SfxQueue>()
            .init_resource::<SfxSettings>()
            .add_systems(Startup, setup)
            .add_systems(
                Update,
                (
                    handle_keyboard,
                    advance_table,
                    respawn_dice_on_resize,
                    sync_dice,
                    update_status_text,
                    play_sound_cues,
                )
                    .chain(),
            );
    }
}
