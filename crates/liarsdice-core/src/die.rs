//! A single animated die
//!
//! A `Die` holds data only. The roll coordinator calls [`Die::tick`] once per
//! roll interval, then [`Die::settle`] and [`Die::advance_settle`] until the
//! die is back at rest. Hosts read the state to draw it.

use std::f32::consts::TAU;
use std::time::Duration;

use bevy_math::Vec2;
use rand::Rng;

use crate::config::RollParams;
use crate::face::FaceValue;
use crate::sound::{SoundCue, SoundEmitter};
use crate::tween::SettleTween;

/// Where a die is in its roll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DiePhase {
    #[default]
    Idle,
    Rolling,
    Settling,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Die {
    id: usize,
    face_value: FaceValue,
    position: Vec2,
    home: Vec2,
    /// Degrees, clockwise.
    rotation: f32,
    scale: f32,
    velocity: Vec2,
    highlighted: bool,
    phase: DiePhase,
    settle: Option<SettleTween>,
    last_rotation_sound: Option<Duration>,
}

impl Die {
    /// A die at rest on `home`. `initial_value` is floored and clamped to 1-6.
    pub fn new(id: usize, home: Vec2, initial_value: f64) -> Self {
        Self {
            id,
            face_value: FaceValue::clamped(initial_value),
            position: home,
            home,
            rotation: 0.0,
            scale: 1.0,
            velocity: Vec2::ZERO,
            highlighted: false,
            phase: DiePhase::Idle,
            settle: None,
            last_rotation_sound: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn face_value(&self) -> FaceValue {
        self.face_value
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn home(&self) -> Vec2 {
        self.home
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn phase(&self) -> DiePhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == DiePhase::Idle
    }

    /// Floor then clamp into 1-6; never fails, even for NaN or infinities.
    pub fn set_value(&mut self, value: f64) {
        self.face_value = FaceValue::clamped(value);
    }

    /// Highlight for the tally. Independent of the roll; the face is untouched.
    pub fn set_highlight(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    /// Move the rest position. Only meaningful while idle; an idle die jumps
    /// straight to its new home.
    pub fn set_home(&mut self, home: Vec2) {
        self.home = home;
        if self.is_idle() {
            self.position = home;
        }
    }

    /// Lift the die for a roll. Velocity is assigned on the first tick so it
    /// is re-randomized every roll.
    pub fn start_roll(&mut self, params: &RollParams) {
        self.phase = DiePhase::Rolling;
        self.scale = params.roll_scale;
        self.settle = None;
    }

    /// One roll step.
    ///
    /// `now` is the host clock, used only to rate limit rotation clicks.
    /// `tick_index` runs from 1 to `params.max_ticks`; larger values are out
    /// of contract.
    pub fn tick(
        &mut self,
        tick_index: u32,
        params: &RollParams,
        now: Duration,
        rng: &mut impl Rng,
        sounds: &mut impl SoundEmitter,
    ) {
        self.face_value = FaceValue::random(rng);

        if tick_index == 1 {
            let angle = rng.gen_range(0.0..TAU);
            self.velocity = Vec2::new(angle.cos(), angle.sin()) * params.speed;
        }

        if let Some(target) = params.rotation_at(tick_index) {
            self.set_rotation(target, params, now, rng, sounds);
        }

        if params.is_bounce_phase(tick_index) {
            self.bounce(params, sounds);
        } else {
            self.return_home(tick_index, params);
        }
    }

    fn set_rotation(
        &mut self,
        rotation: f32,
        params: &RollParams,
        now: Duration,
        rng: &mut impl Rng,
        sounds: &mut impl SoundEmitter,
    ) {
        let jumped = (self.rotation - rotation).abs() > params.rotation_sound_threshold;
        self.rotation = rotation;
        if !jumped {
            return;
        }

        let cooled_down = match self.last_rotation_sound {
            Some(last) => now.saturating_sub(last) >= params.rotation_sound_cooldown,
            None => true,
        };
        if cooled_down {
            self.last_rotation_sound = Some(now);
            sounds.emit(SoundCue::random_click(rng));
        }
    }

    /// First half of the roll: fly along the velocity, reflecting off the
    /// play-field edges.
    fn bounce(&mut self, params: &RollParams, sounds: &mut impl SoundEmitter) {
        let mut next = self.position + self.velocity;

        if next.x < 0.0 || next.x > params.field.x {
            self.velocity.x = -self.velocity.x;
            next.x = self.position.x + self.velocity.x;
            sounds.emit(SoundCue::WallThud);
        }
        if next.y < 0.0 || next.y > params.field.y {
            self.velocity.y = -self.velocity.y;
            next.y = self.position.y + self.velocity.y;
            sounds.emit(SoundCue::WallThud);
        }

        self.position = next;
    }

    /// Second half of the roll: step toward home at fixed speed while the
    /// leftover velocity fades out.
    fn return_home(&mut self, tick_index: u32, params: &RollParams) {
        let remaining = 1.0 - tick_index as f32 / params.max_ticks as f32;
        let delta = self.home - self.position + self.velocity * remaining;

        self.position.x = step_axis(self.position.x, self.home.x, delta.x, params.speed);
        self.position.y = step_axis(self.position.y, self.home.y, delta.y, params.speed);
    }

    /// Final face and start of the settle animation back to rest.
    pub fn settle(&mut self, params: &RollParams, rng: &mut impl Rng) {
        self.face_value = FaceValue::random(rng);
        self.phase = DiePhase::Settling;
        self.settle = Some(SettleTween::new(
            self.position,
            self.home,
            self.rotation,
            self.scale,
            params.settle_duration,
        ));
    }

    /// Advance the settle animation.
    ///
    /// Returns `true` exactly once, on the frame the die comes to rest; the
    /// die is then idle with position, rotation and scale snapped exactly.
    pub fn advance_settle(&mut self, dt: Duration) -> bool {
        let Some(tween) = self.settle.as_mut() else {
            return false;
        };

        let frame = tween.advance(dt);
        self.position = frame.position;
        self.rotation = frame.rotation;
        self.scale = frame.scale;

        if tween.is_finished() {
            self.rest();
            return true;
        }
        false
    }

    /// Drop any roll in flight and put the die at rest immediately.
    pub fn force_idle(&mut self) {
        self.rest();
    }

    fn rest(&mut self) {
        self.settle = None;
        self.phase = DiePhase::Idle;
        self.position = self.home;
        self.rotation = 0.0;
        self.scale = 1.0;
        self.velocity = Vec2::ZERO;
    }
}

/// One fixed-size step along an axis toward `home`, snapping when the
/// remaining distance is shorter than a step.
fn step_axis(current: f32, home: f32, delta: f32, speed: f32) -> f32 {
    if delta == 0.0 || delta.abs() < speed {
        home
    } else {
        current + speed * delta.signum()
    }
}
