//! Liar's Dice tally
//!
//! Ones are wild: they count toward every other value. When the target is
//! one itself, only real ones count. Counting never touches the dice;
//! highlighting is a separate step.

use serde::{Deserialize, Serialize};

use crate::die::Die;
use crate::face::FaceValue;

/// Result of counting one target value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResult {
    pub target: FaceValue,
    pub count: usize,
    /// Ids of matching dice, in die order.
    pub matching: Vec<usize>,
}

impl CountResult {
    pub fn contains(&self, id: usize) -> bool {
        self.matching.contains(&id)
    }
}

/// Whether `face` counts toward `target`.
pub fn face_matches(target: FaceValue, face: FaceValue) -> bool {
    face == target || (!target.is_wild() && face.is_wild())
}

/// Count the dice matching `target`.
pub fn count(target: FaceValue, dice: &[Die]) -> CountResult {
    let matching: Vec<usize> = dice
        .iter()
        .filter(|die| face_matches(target, die.face_value()))
        .map(Die::id)
        .collect();

    CountResult {
        target,
        count: matching.len(),
        matching,
    }
}

/// Count bare face values; ids are positions in `faces`.
pub fn count_faces(target: FaceValue, faces: &[FaceValue]) -> CountResult {
    let matching: Vec<usize> = faces
        .iter()
        .enumerate()
        .filter(|(_, face)| face_matches(target, **face))
        .map(|(i, _)| i)
        .collect();

    CountResult {
        target,
        count: matching.len(),
        matching,
    }
}

/// Highlight exactly the dice in `result`; `None` clears every highlight.
pub fn apply_highlights(dice: &mut [Die], result: Option<&CountResult>) {
    for die in dice {
        let lit = result.is_some_and(|r| r.contains(die.id()));
        die.set_highlight(lit);
    }
}
