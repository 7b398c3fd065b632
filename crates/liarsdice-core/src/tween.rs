//! Easing for the settle animation.

use std::time::Duration;

use bevy_math::curve::{Curve, EaseFunction};
use bevy_math::Vec2;

/// Elastic ease-out.
///
/// Overshoots the target and rings back, which gives the settling die its
/// bounce. `t` is clamped to `0..=1`; the ends are exact.
pub fn elastic_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 || t == 1.0 {
        return t;
    }
    EaseFunction::ElasticOut.sample_clamped(t)
}

/// In-flight settle animation of one die.
#[derive(Clone, Debug, PartialEq)]
pub struct SettleTween {
    pub from_position: Vec2,
    pub to_position: Vec2,
    pub from_rotation: f32,
    pub from_scale: f32,
    pub duration: Duration,
    pub elapsed: Duration,
}

/// A frame of the settle animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SettleFrame {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: f32,
}

impl SettleTween {
    pub fn new(from_position: Vec2, to_position: Vec2, from_rotation: f32, from_scale: f32, duration: Duration) -> Self {
        Self {
            from_position,
            to_position,
            from_rotation,
            from_scale,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Linear progress in `0..=1`. A zero duration is immediately complete.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance by `dt` and return the eased frame.
    pub fn advance(&mut self, dt: Duration) -> SettleFrame {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.frame()
    }

    pub fn frame(&self) -> SettleFrame {
        if self.is_finished() {
            return SettleFrame {
                position: self.to_position,
                rotation: 0.0,
                scale: 1.0,
            };
        }
        let k = elastic_out(self.progress());
        SettleFrame {
            position: self.from_position.lerp(self.to_position, k),
            rotation: self.from_rotation * (1.0 - k),
            scale: self.from_scale + (1.0 - self.from_scale) * k,
        }
    }
}
