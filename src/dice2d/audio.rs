//! Plays the sound cues the table emits.
//!
//! Every cue is synthesized fresh so repeated clicks never sound identical.

use bevy::audio::{AudioPlayer, AudioSource, PlaybackSettings};
use bevy::prelude::*;
use liarsdice_core::sound::{encode_wav, synthesize};
use liarsdice_core::SoundCue;
use rand::Rng;

use super::types::{SfxQueue, SfxSettings, TableRng};

/// Clips started per frame at most; extra cues that frame are dropped.
pub const MAX_CLIPS_PER_FRAME: usize = 8;

/// A playable WAV clip for `cue`.
pub fn clip_for(cue: SoundCue, sample_rate: u32, rng: &mut impl Rng) -> AudioSource {
    let samples = synthesize(cue, sample_rate, rng);
    AudioSource {
        bytes: encode_wav(&samples, sample_rate).into(),
    }
}

pub fn play_sound_cues(
    mut commands: Commands,
    mut sfx: ResMut<SfxQueue>,
    settings: Res<SfxSettings>,
    mut rng: ResMut<TableRng>,
    mut sources: ResMut<Assets<AudioSource>>,
) {
    if sfx.0.is_empty() {
        return;
    }
    let cues = std::mem::take(&mut sfx.0);
    if settings.muted {
        return;
    }

    for cue in cues.into_iter().take(MAX_CLIPS_PER_FRAME) {
        let handle = sources.add(clip_for(cue, settings.sample_rate, &mut rng.0));
        commands.spawn((AudioPlayer(handle), PlaybackSettings::DESPAWN));
    }
}
