//! Roll coordinator
//!
//! Owns the dice and drives one roll at a time: a fixed number of ticks at a
//! fixed interval, then a settle animation on every die. The roll only ends
//! once every die has reported that it is back at rest.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, trace};

use crate::config::RollParams;
use crate::die::Die;
use crate::face::FaceValue;
use crate::sound::{SoundCue, SoundEmitter};

/// Rattle played when a roll starts.
const START_CLATTER: f32 = 0.4;
/// Rattle played when the last die comes to rest.
const FINISH_CLATTER: f32 = 0.25;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RollPhase {
    #[default]
    Idle,
    Rolling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RollStage {
    Ticking,
    /// Waiting on `pending` dice to finish their settle animation.
    Settling { pending: usize },
}

/// The roll in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct RollSession {
    /// Last tick that ran, `0` before the first one.
    pub tick_index: u32,
    /// Time accumulated toward the next tick.
    pub since_tick: Duration,
    pub stage: RollStage,
}

/// Final faces of a finished roll, in die order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollCompleted {
    pub faces: Vec<FaceValue>,
}

#[derive(Clone, Debug)]
pub struct RollCoordinator {
    dice: Vec<Die>,
    params: RollParams,
    session: Option<RollSession>,
    /// Host clock: total time fed through `update`.
    clock: Duration,
}

impl RollCoordinator {
    pub fn new(dice: Vec<Die>, params: RollParams) -> Self {
        Self {
            dice,
            params,
            session: None,
            clock: Duration::ZERO,
        }
    }

    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    /// Mutable access for highlight updates. Positions and faces belong to the
    /// coordinator while a roll runs.
    pub fn dice_mut(&mut self) -> &mut [Die] {
        &mut self.dice
    }

    pub fn params(&self) -> &RollParams {
        &self.params
    }

    pub fn phase(&self) -> RollPhase {
        if self.session.is_some() {
            RollPhase::Rolling
        } else {
            RollPhase::Idle
        }
    }

    pub fn is_rolling(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&RollSession> {
        self.session.as_ref()
    }

    pub fn faces(&self) -> Vec<FaceValue> {
        self.dice.iter().map(Die::face_value).collect()
    }

    /// Replace the dice set. Refused while a roll is in progress.
    pub fn set_dice(&mut self, dice: Vec<Die>) -> bool {
        if self.is_rolling() {
            return false;
        }
        self.dice = dice;
        true
    }

    /// Start a roll. Returns `false`, changing nothing, if one is running.
    pub fn start_roll(&mut self, sounds: &mut impl SoundEmitter) -> bool {
        if self.is_rolling() {
            debug!("Roll requested while rolling; ignored");
            return false;
        }

        for die in &mut self.dice {
            die.start_roll(&self.params);
        }
        self.session = Some(RollSession {
            tick_index: 0,
            since_tick: Duration::ZERO,
            stage: RollStage::Ticking,
        });
        sounds.emit(SoundCue::Clatter {
            intensity: START_CLATTER,
        });
        debug!(dice = self.dice.len(), ticks = self.params.max_ticks, "Roll started");
        true
    }

    /// Advance the roll by `dt` of host time.
    ///
    /// Runs every tick that fell due, moves settling dice along, and returns
    /// the result on the update where the last die comes to rest.
    pub fn update(
        &mut self,
        dt: Duration,
        rng: &mut impl Rng,
        sounds: &mut impl SoundEmitter,
    ) -> Option<RollCompleted> {
        self.clock += dt;

        let Self {
            dice,
            params,
            session,
            clock,
        } = self;
        let active = session.as_mut()?;

        match active.stage {
            RollStage::Ticking => {
                active.since_tick += dt;
                while active.since_tick >= params.tick_interval && active.tick_index < params.max_ticks {
                    active.since_tick -= params.tick_interval;
                    active.tick_index += 1;
                    let tick = active.tick_index;
                    let now = clock.saturating_sub(active.since_tick);

                    if params.clatter_every > 0 && tick % params.clatter_every == 0 {
                        sounds.emit(SoundCue::Clatter {
                            intensity: 0.15 + rng.gen_range(0.0..0.1),
                        });
                    }

                    for die in dice.iter_mut() {
                        die.tick(tick, params, now, rng, sounds);
                    }
                    trace!(tick, "Roll tick");

                    if tick == params.max_ticks {
                        for die in dice.iter_mut() {
                            die.settle(params, rng);
                        }
                        active.stage = RollStage::Settling {
                            pending: dice.len(),
                        };
                        debug!("Last tick ran; settling");
                        break;
                    }
                }
            }
            RollStage::Settling { mut pending } => {
                for die in dice.iter_mut() {
                    if die.advance_settle(dt) {
                        pending = pending.saturating_sub(1);
                    }
                }
                active.stage = RollStage::Settling { pending };
            }
        }

        if active.stage != (RollStage::Settling { pending: 0 }) {
            return None;
        }

        *session = None;
        sounds.emit(SoundCue::Clatter {
            intensity: FINISH_CLATTER,
        });
        let faces: Vec<FaceValue> = dice.iter().map(Die::face_value).collect();
        debug!(?faces, "Roll completed");
        Some(RollCompleted { faces })
    }

    /// Abort the roll in progress: every die goes straight back to rest and
    /// in-flight settle animations are dropped. Returns `false` when idle.
    pub fn cancel(&mut self) -> bool {
        if self.session.take().is_none() {
            return false;
        }
        for die in &mut self.dice {
            die.force_idle();
        }
        debug!("Roll cancelled");
        true
    }
}
