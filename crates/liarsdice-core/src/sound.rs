//! Sound cues and procedural synthesis
//!
//! The engine only *requests* sounds through a [`SoundEmitter`]. Hosts decide
//! how to play them; [`synthesize`] and [`encode_wav`] turn a cue into a short
//! randomized clip for hosts that want the stock dice sounds.

use std::f32::consts::TAU;

use rand::Rng;

/// A sound the engine asks the host to play.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SoundCue {
    /// Short, sharp "tick" of a spinning die.
    HighClick,
    /// Deeper, slightly longer "tack" of a spinning die.
    LowClick,
    /// A die hitting the edge of the play field.
    WallThud,
    /// Noise burst of the dice rattling; intensity in `0..=1`.
    Clatter { intensity: f32 },
}

impl SoundCue {
    /// One of the two rotation clicks, chosen 50/50.
    pub fn random_click(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(0.5) {
            SoundCue::HighClick
        } else {
            SoundCue::LowClick
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::HighClick => "tick",
            SoundCue::LowClick => "tack",
            SoundCue::WallThud => "thud",
            SoundCue::Clatter { .. } => "clatter",
        }
    }
}

/// Fire-and-forget sink for sound requests.
///
/// Emitting can not fail; a host that can not play audio simply drops cues.
pub trait SoundEmitter {
    fn emit(&mut self, cue: SoundCue);
}

/// Queue of pending cues, drained by the host once per frame.
impl SoundEmitter for Vec<SoundCue> {
    fn emit(&mut self, cue: SoundCue) {
        self.push(cue);
    }
}

impl<S: SoundEmitter + ?Sized> SoundEmitter for &mut S {
    fn emit(&mut self, cue: SoundCue) {
        (**self).emit(cue);
    }
}

/// Discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl SoundEmitter for Silent {
    fn emit(&mut self, _cue: SoundCue) {}
}

// ============================================================================
// Synthesis
// ============================================================================

/// Randomized parameters of one synthesized clip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Voice {
    pub intensity: f32,
    pub duration_secs: f32,
    /// Base frequency of the tone; 0 for pure noise.
    pub frequency: f32,
    /// Share of noise in the mix, `0..=1`.
    pub noise: f32,
    /// Exponent of the `(1 - t)^decay` envelope.
    pub decay: f32,
}

impl Voice {
    /// Draw parameters for `cue` from its fixed ranges.
    pub fn for_cue(cue: SoundCue, rng: &mut impl Rng) -> Self {
        match cue {
            SoundCue::HighClick => Self {
                intensity: rng.gen_range(0.12..0.27),
                duration_secs: rng.gen_range(0.008..0.013),
                frequency: rng.gen_range(120.0..180.0),
                noise: rng.gen_range(0.2..0.5),
                decay: 2.5,
            },
            SoundCue::LowClick => Self {
                intensity: rng.gen_range(0.12..0.27),
                duration_secs: rng.gen_range(0.015..0.025),
                frequency: rng.gen_range(60.0..100.0),
                noise: rng.gen_range(0.2..0.5),
                decay: 1.8,
            },
            // Wood: deep, noisy and slow to die out.
            SoundCue::WallThud => Self {
                intensity: rng.gen_range(0.15..0.25),
                duration_secs: rng.gen_range(0.03..0.05),
                frequency: rng.gen_range(40.0..80.0),
                noise: rng.gen_range(0.4..0.6),
                decay: 1.5,
            },
            SoundCue::Clatter { intensity } => Self {
                intensity: intensity.clamp(0.0, 1.0),
                duration_secs: 0.01,
                frequency: 0.0,
                noise: 1.0,
                decay: 2.0,
            },
        }
    }
}

/// Render `voice` to mono samples at `sample_rate`.
///
/// A decaying mix of sine and white noise, shaped by an exponential gain ramp
/// from `intensity` down to 0.001 over the clip.
pub fn render_voice(voice: &Voice, sample_rate: u32, rng: &mut impl Rng) -> Vec<f32> {
    let len = (sample_rate as f32 * voice.duration_secs).round() as usize;
    if len == 0 || voice.intensity <= 0.0 {
        return vec![0.0; len];
    }

    let tone = 1.0 - voice.noise;
    let floor_ratio = 0.001 / voice.intensity;

    (0..len)
        .map(|i| {
            let t = i as f32 / len as f32;
            let envelope = (1.0 - t).powf(voice.decay);
            let sine = (TAU * voice.frequency * i as f32 / sample_rate as f32).sin();
            let noise = rng.gen_range(-1.0f32..1.0) * voice.noise;
            let gain = voice.intensity * floor_ratio.powf(t);
            ((sine * tone + noise) * envelope * voice.intensity * gain).clamp(-1.0, 1.0)
        })
        .collect()
}

/// Synthesize a fresh, randomized clip for `cue`.
pub fn synthesize(cue: SoundCue, sample_rate: u32, rng: &mut impl Rng) -> Vec<f32> {
    let voice = Voice::for_cue(cue, rng);
    render_voice(&voice, sample_rate, rng)
}

/// Encode mono samples as a 16-bit PCM WAV file.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    const CHANNELS: u16 = 1;
    const BITS: u16 = 16;
    let block_align = CHANNELS * BITS / 8;
    let byte_rate = sample_rate * block_align as u32;
    let data_len = (samples.len() * block_align as usize) as u32;

    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for sample in samples {
        let pcm = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        out.extend_from_slice(&pcm.to_le_bytes());
    }

    out
}
