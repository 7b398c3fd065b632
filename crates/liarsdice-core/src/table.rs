//! Dice table session
//!
//! `Table` is what a host talks to: it turns input events into roll
//! coordinator calls, keeps the selected target value, lays the dice out, and
//! keeps the tally and highlights in step with the dice.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::config::GameConfig;
use crate::coordinator::{RollCompleted, RollCoordinator};
use crate::counter::{apply_highlights, count, CountResult};
use crate::die::Die;
use crate::face::FaceValue;
use crate::render::{render_dice, DieView, Palette, Renderer};
use crate::sound::SoundEmitter;

/// Discrete input from whatever surface the host offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    RollRequested,
    /// Select a target value; selecting the active value again deselects it.
    ValueSelected(FaceValue),
    ValueDeselected,
    AddDie,
    RemoveDie,
    CancelRoll,
}

/// What the table did with an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableResponse {
    RollStarted,
    /// Rejected because a roll is in progress.
    Busy,
    RollCancelled,
    NotRolling,
    SelectionChanged(Option<FaceValue>),
    DiceCountChanged(usize),
    /// The dice count is already at the configured bound.
    DiceCountAtLimit(usize),
}

/// The value the player is counting, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    target: Option<FaceValue>,
}

impl SelectionState {
    pub fn target(&self) -> Option<FaceValue> {
        self.target
    }

    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    /// Toggle `value`: select it, or deselect it when already selected.
    pub fn toggle(&mut self, value: FaceValue) -> Option<FaceValue> {
        self.target = if self.target == Some(value) {
            None
        } else {
            Some(value)
        };
        self.target
    }

    pub fn clear(&mut self) {
        self.target = None;
    }
}

#[derive(Clone, Debug)]
pub struct Table {
    config: GameConfig,
    palette: Palette,
    coordinator: RollCoordinator,
    selection: SelectionState,
    tally: Option<CountResult>,
}

impl Table {
    /// A table of `config.dice_count` dice with random faces.
    pub fn new(config: GameConfig, rng: &mut impl Rng) -> Self {
        let faces: Vec<FaceValue> = (0..config.dice_count)
            .map(|_| FaceValue::random(rng))
            .collect();
        Self::with_faces(config, &faces)
    }

    /// A table showing `faces`, one die per face.
    pub fn with_faces(config: GameConfig, faces: &[FaceValue]) -> Self {
        let dice = config
            .home_positions(faces.len())
            .into_iter()
            .zip(faces)
            .enumerate()
            .map(|(id, (home, face))| Die::new(id, home, face.get() as f64))
            .collect();

        Self {
            palette: config.palette(),
            coordinator: RollCoordinator::new(dice, config.roll_params()),
            config,
            selection: SelectionState::default(),
            tally: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn coordinator(&self) -> &RollCoordinator {
        &self.coordinator
    }

    pub fn dice(&self) -> &[Die] {
        self.coordinator.dice()
    }

    pub fn faces(&self) -> Vec<FaceValue> {
        self.coordinator.faces()
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    /// Tally for the selected value, once the dice are at rest.
    pub fn tally(&self) -> Option<&CountResult> {
        self.tally.as_ref()
    }

    pub fn is_rolling(&self) -> bool {
        self.coordinator.is_rolling()
    }

    pub fn handle(
        &mut self,
        event: InputEvent,
        rng: &mut impl Rng,
        sounds: &mut impl SoundEmitter,
    ) -> TableResponse {
        let response = match event {
            InputEvent::RollRequested => self.roll(sounds),
            InputEvent::ValueSelected(value) => {
                let target = self.selection.toggle(value);
                self.recount();
                TableResponse::SelectionChanged(target)
            }
            InputEvent::ValueDeselected => {
                self.selection.clear();
                self.recount();
                TableResponse::SelectionChanged(None)
            }
            InputEvent::AddDie => self.resize(self.dice().len() + 1, rng),
            InputEvent::RemoveDie => self.resize(self.dice().len().saturating_sub(1), rng),
            InputEvent::CancelRoll => {
                if self.coordinator.cancel() {
                    self.recount();
                    TableResponse::RollCancelled
                } else {
                    TableResponse::NotRolling
                }
            }
        };
        debug!(?event, ?response, "Table input");
        response
    }

    fn roll(&mut self, sounds: &mut impl SoundEmitter) -> TableResponse {
        if self.is_rolling() {
            return TableResponse::Busy;
        }
        self.tally = None;
        apply_highlights(self.coordinator.dice_mut(), None);
        self.coordinator.start_roll(sounds);
        TableResponse::RollStarted
    }

    fn resize(&mut self, wanted: usize, rng: &mut impl Rng) -> TableResponse {
        if self.is_rolling() {
            return TableResponse::Busy;
        }
        let current = self.dice().len();
        if wanted < self.config.min_dice || wanted > self.config.max_dice {
            return TableResponse::DiceCountAtLimit(current);
        }

        let homes = self.config.home_positions(wanted);
        let mut dice: Vec<Die> = self.dice().iter().take(wanted).cloned().collect();
        for (die, home) in dice.iter_mut().zip(&homes) {
            die.set_home(*home);
        }
        for (id, home) in homes.iter().enumerate().skip(dice.len()) {
            dice.push(Die::new(id, *home, FaceValue::random(rng).get() as f64));
        }

        self.coordinator.set_dice(dice);
        self.recount();
        TableResponse::DiceCountChanged(wanted)
    }

    /// Bring tally and highlights in line with the selection and the dice.
    /// While rolling they stay cleared until the roll completes.
    fn recount(&mut self) {
        if self.is_rolling() {
            self.tally = None;
            return;
        }
        self.tally = self
            .selection
            .target()
            .map(|target| count(target, self.coordinator.dice()));
        apply_highlights(self.coordinator.dice_mut(), self.tally.as_ref());
    }

    /// Feed host time to the roll. On completion the tally is recomputed.
    pub fn update(
        &mut self,
        dt: Duration,
        rng: &mut impl Rng,
        sounds: &mut impl SoundEmitter,
    ) -> Option<RollCompleted> {
        let completed = self.coordinator.update(dt, rng, sounds)?;
        self.recount();
        Some(completed)
    }

    pub fn views(&self) -> Vec<DieView> {
        self.dice()
            .iter()
            .map(|die| DieView::of(die, &self.palette))
            .collect()
    }

    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        render_dice(renderer, self.dice(), &self.palette);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::Silent;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn face(v: u8) -> FaceValue {
        FaceValue::try_from(v).unwrap()
    }

    fn table(values: &[u8]) -> Table {
        let faces: Vec<FaceValue> = values.iter().map(|v| face(*v)).collect();
        Table::with_faces(GameConfig::default(), &faces)
    }

    fn lit(table: &Table) -> Vec<bool> {
        table.dice().iter().map(Die::is_highlighted).collect()
    }

    #[test]
    fn test_selection_toggle() {
        let mut selection = SelectionState::default();
        assert_eq!(selection.toggle(face(3)), Some(face(3)));
        assert_eq!(selection.toggle(face(4)), Some(face(4)));
        assert_eq!(selection.toggle(face(4)), None);
        assert!(!selection.is_active());
    }

    #[test]
    fn test_select_highlights_and_deselect_clears() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut t = table(&[1, 1, 3, 4, 1]);

        let response = t.handle(InputEvent::ValueSelected(face(1)), &mut rng, &mut Silent);
        assert_eq!(response, TableResponse::SelectionChanged(Some(face(1))));
        assert_eq!(t.tally().unwrap().count, 3);
        assert_eq!(lit(&t), vec![true, true, false, false, true]);

        t.handle(InputEvent::ValueDeselected, &mut rng, &mut Silent);
        assert!(t.tally().is_none());
        assert!(lit(&t).iter().all(|l| !l));
    }

    #[test]
    fn test_reselecting_same_value_deselects() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut t = table(&[4, 4]);
        t.handle(InputEvent::ValueSelected(face(4)), &mut rng, &mut Silent);
        let response = t.handle(InputEvent::ValueSelected(face(4)), &mut rng, &mut Silent);
        assert_eq!(response, TableResponse::SelectionChanged(None));
        assert!(lit(&t).iter().all(|l| !l));
    }

    #[test]
    fn test_roll_start_clears_highlights() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut t = table(&[2, 2, 2]);
        t.handle(InputEvent::ValueSelected(face(2)), &mut rng, &mut Silent);
        assert!(lit(&t).iter().all(|l| *l));

        assert_eq!(t.handle(InputEvent::RollRequested, &mut rng, &mut Silent), TableResponse::RollStarted);
        assert!(lit(&t).iter().all(|l| !l));
        assert!(t.tally().is_none());
        assert_eq!(t.selection().target(), Some(face(2)));
    }

    #[test]
    fn test_tally_recomputed_after_roll() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut t = table(&[1, 2, 3, 4, 5]);
        t.handle(InputEvent::ValueSelected(face(5)), &mut rng, &mut Silent);
        t.handle(InputEvent::RollRequested, &mut rng, &mut Silent);

        let mut done = None;
        for _ in 0..200 {
            done = t.update(Duration::from_millis(16), &mut rng, &mut Silent);
            if done.is_some() {
                break;
            }
            assert!(t.tally().is_none());
        }
        let done = done.expect("roll should finish");

        let expected = crate::counter::count_faces(face(5), &done.faces);
        assert_eq!(t.tally(), Some(&expected));
        for die in t.dice() {
            assert_eq!(die.is_highlighted(), expected.contains(die.id()));
        }
    }

    #[test]
    fn test_roll_while_rolling_is_busy() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut t = table(&[1, 2]);
        t.handle(InputEvent::RollRequested, &mut rng, &mut Silent);
        t.update(Duration::from_millis(200), &mut rng, &mut Silent);
        let tick = t.coordinator().session().unwrap().tick_index;

        assert_eq!(t.handle(InputEvent::RollRequested, &mut rng, &mut Silent), TableResponse::Busy);
        assert_eq!(t.coordinator().session().unwrap().tick_index, tick);
    }

    #[test]
    fn test_dice_count_bounds() {
        let mut rng = StdRng::seed_from_u64(6);
        let config = GameConfig {
            dice_count: 2,
            min_dice: 1,
            max_dice: 3,
            ..GameConfig::default()
        };
        let mut t = Table::new(config, &mut rng);

        assert_eq!(t.handle(InputEvent::AddDie, &mut rng, &mut Silent), TableResponse::DiceCountChanged(3));
        assert_eq!(t.handle(InputEvent::AddDie, &mut rng, &mut Silent), TableResponse::DiceCountAtLimit(3));
        assert_eq!(t.handle(InputEvent::RemoveDie, &mut rng, &mut Silent), TableResponse::DiceCountChanged(2));
        assert_eq!(t.handle(InputEvent::RemoveDie, &mut rng, &mut Silent), TableResponse::DiceCountChanged(1));
        assert_eq!(t.handle(InputEvent::RemoveDie, &mut rng, &mut Silent), TableResponse::DiceCountAtLimit(1));
        assert_eq!(t.dice().len(), 1);
    }

    #[test]
    fn test_resize_relays_out_and_keeps_faces() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut t = table(&[6, 5, 4]);
        t.handle(InputEvent::AddDie, &mut rng, &mut Silent);

        let homes = t.config().home_positions(4);
        for (die, home) in t.dice().iter().zip(&homes) {
            assert_eq!(die.home(), *home);
            assert_eq!(die.position(), *home);
        }
        let kept: Vec<u8> = t.faces().iter().take(3).map(|f| f.get()).collect();
        assert_eq!(kept, vec![6, 5, 4]);
        assert_eq!(t.dice()[3].id(), 3);
    }

    #[test]
    fn test_resize_rejected_while_rolling() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut t = table(&[1, 2, 3]);
        t.handle(InputEvent::RollRequested, &mut rng, &mut Silent);
        assert_eq!(t.handle(InputEvent::AddDie, &mut rng, &mut Silent), TableResponse::Busy);
        assert_eq!(t.dice().len(), 3);
    }

    #[test]
    fn test_resize_recounts() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut t = table(&[1, 3, 3]);
        t.handle(InputEvent::ValueSelected(face(3)), &mut rng, &mut Silent);
        assert_eq!(t.tally().unwrap().count, 3);

        t.handle(InputEvent::RemoveDie, &mut rng, &mut Silent);
        assert_eq!(t.tally().unwrap().count, 2);
        assert_eq!(lit(&t), vec![true, true]);
    }

    #[test]
    fn test_cancel_restores_tally() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut t = table(&[2, 2]);
        t.handle(InputEvent::ValueSelected(face(2)), &mut rng, &mut Silent);
        t.handle(InputEvent::RollRequested, &mut rng, &mut Silent);
        t.update(Duration::from_millis(120), &mut rng, &mut Silent);

        assert_eq!(t.handle(InputEvent::CancelRoll, &mut rng, &mut Silent), TableResponse::RollCancelled);
        assert!(!t.is_rolling());
        let tally = t.tally().expect("tally after cancel");
        assert_eq!(tally.target, face(2));
        assert_eq!(t.handle(InputEvent::CancelRoll, &mut rng, &mut Silent), TableResponse::NotRolling);
    }

    #[test]
    fn test_views_follow_dice() {
        let t = table(&[3, 6]);
        let views = t.views();
        assert_eq!(views.len(), 2);
        assert_eq!(views[1].face, face(6));
        assert_eq!(views[0].position, t.dice()[0].home());
    }
}
