//! Terminal drawing for the dice table

use colored::{ColoredString, Colorize};
use liarsdice_core::{CountResult, DieView, FaceValue, Renderer, SoundCue, SoundEmitter, Vec2};
use tracing::debug;

/// How each die is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DiceArt {
    /// One unicode die glyph per die, on a single line.
    #[default]
    Glyphs,
    /// A 3x3 pip grid per die, three lines tall.
    Pips,
}

/// Collects one frame of dice and turns it into text.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    art: DiceArt,
    cells: Vec<Cell>,
    frame: Vec<String>,
}

#[derive(Debug)]
struct Cell {
    rows: Vec<String>,
    highlighted: bool,
    rolling: bool,
    accent: [u8; 4],
}

impl TerminalRenderer {
    pub fn new(art: DiceArt) -> Self {
        Self {
            art,
            ..Self::default()
        }
    }

    /// Lines of the last finished frame.
    pub fn frame(&self) -> &[String] {
        &self.frame
    }

    pub fn take_frame(&mut self) -> Vec<String> {
        std::mem::take(&mut self.frame)
    }
}

impl Renderer for TerminalRenderer {
    fn draw_die(&mut self, view: &DieView) {
        let rows = match self.art {
            DiceArt::Glyphs => vec![format!("[{}]", view.face.glyph())],
            DiceArt::Pips => pip_rows(view.dots).to_vec(),
        };
        self.cells.push(Cell {
            rows,
            highlighted: view.highlighted,
            rolling: view.scale > 1.0,
            accent: view.style.border.to_rgba8(),
        });
    }

    fn finish_frame(&mut self) {
        let height = self.cells.iter().map(|c| c.rows.len()).max().unwrap_or(0);
        self.frame = (0..height)
            .map(|row| {
                self.cells
                    .iter()
                    .map(|cell| paint(cell, &cell.rows[row]).to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        self.cells.clear();
    }
}

fn paint(cell: &Cell, text: &str) -> ColoredString {
    let [r, g, b, _] = cell.accent;
    if cell.highlighted {
        text.truecolor(r, g, b).bold()
    } else if cell.rolling {
        text.dimmed()
    } else {
        text.normal()
    }
}

/// Three rows of a boxed pip grid: `|o o|`, `| o |` and so on.
pub fn pip_rows(dots: &[Vec2]) -> [String; 3] {
    let mut grid = [[' '; 3]; 3];
    for dot in dots {
        grid[grid_index(dot.y)][grid_index(dot.x)] = 'o';
    }
    grid.map(|row| format!("|{}|", row.iter().collect::<String>()))
}

fn grid_index(offset: f32) -> usize {
    if offset < 0.0 {
        0
    } else if offset > 0.0 {
        2
    } else {
        1
    }
}

/// One line summing up a tally, wild ones included.
pub fn tally_line(tally: &CountResult) -> String {
    let noun = if tally.count == 1 { "die" } else { "dice" };
    let wild = if tally.target.is_wild() {
        String::new()
    } else {
        " (ones are wild)".to_string()
    };
    format!("{} {} showing {}{}", tally.count, noun, tally.target, wild)
}

/// Face values as a compact list: `[1, 4, 6]`.
pub fn faces_line(faces: &[FaceValue]) -> String {
    let list: Vec<String> = faces.iter().map(FaceValue::to_string).collect();
    format!("[{}]", list.join(", "))
}

/// Terminal sound sink: cues go to the log.
#[derive(Debug, Default)]
pub struct LogSounds {
    pub played: usize,
}

impl SoundEmitter for LogSounds {
    fn emit(&mut self, cue: SoundCue) {
        self.played += 1;
        match cue {
            SoundCue::Clatter { intensity } => debug!(cue = cue.name(), intensity, "Sound"),
            _ => debug!(cue = cue.name(), "Sound"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liarsdice_core::{dot_pattern, Die, Palette};

    fn face(v: u8) -> FaceValue {
        FaceValue::try_from(v).unwrap()
    }

    #[test]
    fn test_pip_rows() {
        assert_eq!(pip_rows(dot_pattern(face(1))), ["|   |", "| o |", "|   |"]);
        assert_eq!(pip_rows(dot_pattern(face(5))), ["|o o|", "| o |", "|o o|"]);
        assert_eq!(pip_rows(dot_pattern(face(6))), ["|o o|", "|o o|", "|o o|"]);
    }

    #[test]
    fn test_glyph_frame() {
        colored::control::set_override(false);
        let dice = vec![
            Die::new(0, Vec2::ZERO, 2.0),
            Die::new(1, Vec2::ZERO, 5.0),
        ];
        let mut renderer = TerminalRenderer::new(DiceArt::Glyphs);
        liarsdice_core::render_dice(&mut renderer, &dice, &Palette::default());
        assert_eq!(renderer.frame(), ["[\u{2681}] [\u{2684}]"]);
    }

    #[test]
    fn test_pip_frame_is_three_lines() {
        colored::control::set_override(false);
        let dice = vec![Die::new(0, Vec2::ZERO, 3.0), Die::new(1, Vec2::ZERO, 1.0)];
        let mut renderer = TerminalRenderer::new(DiceArt::Pips);
        liarsdice_core::render_dice(&mut renderer, &dice, &Palette::default());
        let frame = renderer.take_frame();
        assert_eq!(frame, ["|o  | |   |", "| o | | o |", "|  o| |   |"]);
        assert!(renderer.frame().is_empty());
    }

    #[test]
    fn test_tally_line() {
        let tally = liarsdice_core::count_faces(face(3), &[face(1), face(3), face(5)]);
        assert_eq!(tally_line(&tally), "2 dice showing 3 (ones are wild)");

        let ones = liarsdice_core::count_faces(face(1), &[face(1), face(3)]);
        assert_eq!(tally_line(&ones), "1 die showing 1");
    }

    #[test]
    fn test_faces_line() {
        assert_eq!(faces_line(&[face(1), face(4), face(6)]), "[1, 4, 6]");
        assert_eq!(faces_line(&[]), "[]");
    }

    #[test]
    fn test_log_sounds_counts_cues() {
        let mut sounds = LogSounds::default();
        sounds.emit(SoundCue::WallThud);
        sounds.emit(SoundCue::Clatter { intensity: 0.4 });
        assert_eq!(sounds.played, 2);
    }
}
