//! View model handed to renderers.
//!
//! Dice hold data only; once per frame the host builds a [`DieView`] for each
//! die and draws it however it likes.

use bevy_math::Vec2;

use crate::config::ColorSetting;
use crate::die::Die;
use crate::dots::dot_pattern;
use crate::face::FaceValue;

/// Fill and border of a die face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceStyle {
    pub fill: ColorSetting,
    pub border: ColorSetting,
    pub border_width: f32,
}

/// Colors for plain and highlighted dice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub neutral: FaceStyle,
    pub highlight: FaceStyle,
    pub dot: ColorSetting,
}

impl Default for Palette {
    fn default() -> Self {
        crate::config::GameConfig::default().palette()
    }
}

impl Palette {
    pub fn style(&self, highlighted: bool) -> FaceStyle {
        if highlighted {
            self.highlight
        } else {
            self.neutral
        }
    }
}

/// Everything needed to draw one die this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct DieView {
    pub id: usize,
    /// Centre in play-field coordinates (y down).
    pub position: Vec2,
    /// Degrees, clockwise.
    pub rotation: f32,
    pub scale: f32,
    pub face: FaceValue,
    pub highlighted: bool,
    /// Pip offsets in units of the pip spacing (see [`crate::dots`]).
    pub dots: &'static [Vec2],
    pub style: FaceStyle,
    pub dot_color: ColorSetting,
}

impl DieView {
    pub fn of(die: &Die, palette: &Palette) -> Self {
        Self {
            id: die.id(),
            position: die.position(),
            rotation: die.rotation(),
            scale: die.scale(),
            face: die.face_value(),
            highlighted: die.is_highlighted(),
            dots: dot_pattern(die.face_value()),
            style: palette.style(die.is_highlighted()),
            dot_color: palette.dot,
        }
    }

    /// Pip centres for a die of edge `size`, relative to the die centre.
    ///
    /// Pips sit a quarter of the edge apart.
    pub fn dot_positions(&self, size: f32) -> impl Iterator<Item = Vec2> + '_ {
        let spacing = size * 0.25;
        self.dots.iter().map(move |d| *d * spacing)
    }
}

/// A host-side drawing surface.
pub trait Renderer {
    fn draw_die(&mut self, view: &DieView);

    /// Called once after every die of a frame has been drawn.
    fn finish_frame(&mut self) {}
}

/// Draw every die in order, then finish the frame.
pub fn render_dice<R: Renderer + ?Sized>(renderer: &mut R, dice: &[Die], palette: &Palette) {
    for die in dice {
        renderer.draw_die(&DieView::of(die, palette));
    }
    renderer.finish_frame();
}
