//! Game settings types and loading
//!
//! Settings live in a RON file. Every field has a default, so a settings file
//! only needs to mention what it changes.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use bevy_math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::render::{FaceStyle, Palette};

// ============================================================================
// Colors
// ============================================================================

/// Simple serializable RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorSetting {
    #[serde(default = "default_alpha")]
    pub a: f32,
    #[serde(default)]
    pub r: f32,
    #[serde(default)]
    pub g: f32,
    #[serde(default)]
    pub b: f32,
}

fn default_alpha() -> f32 {
    1.0
}

impl Default for ColorSetting {
    fn default() -> Self {
        Self::WHITE
    }
}

impl ColorSetting {
    pub const WHITE: ColorSetting = ColorSetting::rgb(0xFFFFFF);
    pub const BLACK: ColorSetting = ColorSetting::rgb(0x000000);

    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn rgb(hex: u32) -> Self {
        Self {
            a: 1.0,
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }

    /// Components as 0-255 bytes, `[r, g, b, a]`.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    /// Parse from various string formats:
    /// - "A:1.0 R:0.5 G:0.3 B:0.2"
    /// - "1.0,0.5,0.3,0.2" (ARGB order) or "0.5,0.3,0.2" (RGB)
    /// - "#FF8844" or "#AAFF8844" (hex)
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();

        if input.starts_with('#') {
            return Self::parse_hex(input);
        }

        if input.contains(':') {
            return Self::parse_labeled(input);
        }

        if input.contains(',') {
            return Self::parse_csv(input);
        }

        None
    }

    fn parse_hex(input: &str) -> Option<Self> {
        let hex = input.trim_start_matches('#');
        let byte = |i: usize| -> Option<f32> {
            let s = hex.get(i..i + 2)?;
            Some(u8::from_str_radix(s, 16).ok()? as f32 / 255.0)
        };

        match hex.len() {
            6 => Some(Self {
                a: 1.0,
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
            }),
            // ARGB
            8 => Some(Self {
                a: byte(0)?,
                r: byte(2)?,
                g: byte(4)?,
                b: byte(6)?,
            }),
            _ => None,
        }
    }

    fn parse_labeled(input: &str) -> Option<Self> {
        let mut color = Self {
            a: 1.0,
            r: 0.0,
            g: 0.0,
            b: 0.0,
        };

        for part in input.split_whitespace() {
            if let Some((label, value)) = part.split_once(':') {
                let val: f32 = value.trim_end_matches(',').parse().ok()?;
                let val = val.clamp(0.0, 1.0);
                match label.to_uppercase().as_str() {
                    "A" => color.a = val,
                    "R" => color.r = val,
                    "G" => color.g = val,
                    "B" => color.b = val,
                    _ => {}
                }
            }
        }

        Some(color)
    }

    fn parse_csv(input: &str) -> Option<Self> {
        let parts = input
            .split(',')
            .map(|p| p.trim().parse::<f32>().map(|v| v.clamp(0.0, 1.0)))
            .collect::<Result<Vec<_>, _>>()
            .ok()?;

        match parts.as_slice() {
            [a, r, g, b] => Some(Self { a: *a, r: *r, g: *g, b: *b }),
            [r, g, b] => Some(Self { a: 1.0, r: *r, g: *g, b: *b }),
            _ => None,
        }
    }

}

impl FromStr for ColorSetting {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            ConfigError::invalid(
                "color",
                format!("`{}` is not #RRGGBB, #AARRGGBB, R,G,B or A:_ R:_ G:_ B:_", s.trim()),
            )
        })
    }
}

// ============================================================================
// Roll timing and motion
// ============================================================================

/// Roll animation settings as stored in the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollSettings {
    /// Distance moved per tick, in play-field pixels.
    pub speed: f32,
    /// Number of ticks in one roll.
    pub max_ticks: u32,
    pub tick_interval_ms: u64,
    /// Number of discrete spin steps spread over the roll.
    pub rotation_steps: u32,
    /// Degrees spun over a whole roll.
    pub total_rotation: f32,
    pub settle_ms: u64,
    /// Scale dice are lifted to while rolling.
    pub roll_scale: f32,
    /// Rotation jumps larger than this (degrees) click.
    pub rotation_sound_threshold: f32,
    pub rotation_sound_cooldown_ms: u64,
    /// Rattle every N ticks; 0 disables the rattle.
    pub clatter_every: u32,
}

impl Default for RollSettings {
    fn default() -> Self {
        Self {
            speed: 50.0,
            max_ticks: 36,
            tick_interval_ms: 40,
            rotation_steps: 5,
            total_rotation: 1080.0,
            settle_ms: 300,
            roll_scale: 1.15,
            rotation_sound_threshold: 50.0,
            rotation_sound_cooldown_ms: 200,
            clatter_every: 3,
        }
    }
}

/// Everything a die and the coordinator need to run a roll.
#[derive(Debug, Clone, PartialEq)]
pub struct RollParams {
    pub max_ticks: u32,
    pub tick_interval: Duration,
    pub rotation_steps: u32,
    pub total_rotation: f32,
    pub speed: f32,
    /// Play-field size; dice bounce off `0..=field.x` and `0..=field.y`.
    pub field: Vec2,
    pub settle_duration: Duration,
    pub roll_scale: f32,
    pub rotation_sound_threshold: f32,
    pub rotation_sound_cooldown: Duration,
    pub clatter_every: u32,
}

impl Default for RollParams {
    fn default() -> Self {
        GameConfig::default().roll_params()
    }
}

impl RollParams {
    /// Ticks between two spin steps.
    pub fn ticks_per_step(&self) -> u32 {
        self.max_ticks.div_ceil(self.rotation_steps.max(1)).max(1)
    }

    pub fn rotation_per_step(&self) -> f32 {
        self.total_rotation / self.rotation_steps.max(1) as f32
    }

    /// Rotation the die jumps to on `tick_index`, or `None` when the spin
    /// holds still on that tick.
    ///
    /// Steps land on multiples of `ticks_per_step` and on the final tick.
    /// When the final tick is itself a multiple and fewer than
    /// `rotation_steps` steps fit, the spin ends short of `total_rotation`.
    pub fn rotation_at(&self, tick_index: u32) -> Option<f32> {
        let per = self.ticks_per_step();
        if tick_index == 0 || (tick_index % per != 0 && tick_index != self.max_ticks) {
            return None;
        }
        let step = tick_index.div_ceil(per).min(self.rotation_steps);
        Some(step as f32 * self.rotation_per_step())
    }

    /// First half of the roll bounces, second half returns home.
    pub fn is_bounce_phase(&self, tick_index: u32) -> bool {
        (tick_index as f32 / self.max_ticks as f32) < 0.5
    }
}

// ============================================================================
// Palette
// ============================================================================

/// Die colors as stored in the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteSettings {
    pub fill: ColorSetting,
    pub border: ColorSetting,
    pub border_width: f32,
    pub highlight_fill: ColorSetting,
    pub highlight_border: ColorSetting,
    pub highlight_border_width: f32,
    pub dot: ColorSetting,
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self {
            fill: ColorSetting::WHITE,
            border: ColorSetting::BLACK,
            border_width: 3.0,
            // Light green face with a green border while counted.
            highlight_fill: ColorSetting::rgb(0xD4EDDA),
            highlight_border: ColorSetting::rgb(0x27AE60),
            highlight_border_width: 4.0,
            dot: ColorSetting::BLACK,
        }
    }
}

// ============================================================================
// Game settings
// ============================================================================

/// Game settings (loaded from a RON file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_field_width")]
    pub field_width: f32,

    #[serde(default = "default_field_height")]
    pub field_height: f32,

    #[serde(default = "default_background_color")]
    pub background_color: ColorSetting,

    /// Edge length of a die, in play-field pixels.
    #[serde(default = "default_die_size")]
    pub die_size: f32,

    /// Horizontal gap between two dice at rest.
    #[serde(default = "default_die_gap")]
    pub die_gap: f32,

    #[serde(default = "default_dice_count")]
    pub dice_count: usize,

    #[serde(default = "default_min_dice")]
    pub min_dice: usize,

    #[serde(default = "default_max_dice")]
    pub max_dice: usize,

    #[serde(default)]
    pub roll: RollSettings,

    #[serde(default)]
    pub palette: PaletteSettings,
}

fn default_field_width() -> f32 {
    800.0
}
fn default_field_height() -> f32 {
    600.0
}
fn default_background_color() -> ColorSetting {
    ColorSetting::rgb(0x2C3E50)
}
fn default_die_size() -> f32 {
    40.0
}
fn default_die_gap() -> f32 {
    20.0
}
fn default_dice_count() -> usize {
    5
}
fn default_min_dice() -> usize {
    1
}
fn default_max_dice() -> usize {
    10
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: default_field_width(),
            field_height: default_field_height(),
            background_color: default_background_color(),
            die_size: default_die_size(),
            die_gap: default_die_gap(),
            dice_count: default_dice_count(),
            min_dice: default_min_dice(),
            max_dice: default_max_dice(),
            roll: RollSettings::default(),
            palette: PaletteSettings::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate settings from RON text.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&text)?;
        info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Load settings from `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Pretty RON, suitable as a starting settings file.
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |field: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be a positive number, got {value}")))
            }
        };

        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        positive("die_size", self.die_size)?;
        positive("roll.speed", self.roll.speed)?;
        positive("roll.roll_scale", self.roll.roll_scale)?;

        if !(self.die_gap.is_finite() && self.die_gap >= 0.0) {
            return Err(ConfigError::invalid("die_gap", "must be zero or positive"));
        }
        if self.min_dice == 0 {
            return Err(ConfigError::invalid("min_dice", "at least one die is required"));
        }
        if self.min_dice > self.max_dice {
            return Err(ConfigError::invalid(
                "min_dice",
                format!("{} is larger than max_dice {}", self.min_dice, self.max_dice),
            ));
        }
        if !(self.min_dice..=self.max_dice).contains(&self.dice_count) {
            return Err(ConfigError::invalid(
                "dice_count",
                format!("{} is outside {}..={}", self.dice_count, self.min_dice, self.max_dice),
            ));
        }
        if self.roll.max_ticks == 0 {
            return Err(ConfigError::invalid("roll.max_ticks", "must be at least 1"));
        }
        if self.roll.rotation_steps == 0 {
            return Err(ConfigError::invalid("roll.rotation_steps", "must be at least 1"));
        }
        if self.roll.tick_interval_ms == 0 {
            return Err(ConfigError::invalid("roll.tick_interval_ms", "must be at least 1"));
        }

        Ok(())
    }

    pub fn field(&self) -> Vec2 {
        Vec2::new(self.field_width, self.field_height)
    }

    pub fn roll_params(&self) -> RollParams {
        RollParams {
            max_ticks: self.roll.max_ticks,
            tick_interval: Duration::from_millis(self.roll.tick_interval_ms),
            rotation_steps: self.roll.rotation_steps,
            total_rotation: self.roll.total_rotation,
            speed: self.roll.speed,
            field: self.field(),
            settle_duration: Duration::from_millis(self.roll.settle_ms),
            roll_scale: self.roll.roll_scale,
            rotation_sound_threshold: self.roll.rotation_sound_threshold,
            rotation_sound_cooldown: Duration::from_millis(self.roll.rotation_sound_cooldown_ms),
            clatter_every: self.roll.clatter_every,
        }
    }

    pub fn palette(&self) -> Palette {
        let p = &self.palette;
        Palette {
            neutral: FaceStyle {
                fill: p.fill,
                border: p.border,
                border_width: p.border_width,
            },
            highlight: FaceStyle {
                fill: p.highlight_fill,
                border: p.highlight_border,
                border_width: p.highlight_border_width,
            },
            dot: p.dot,
        }
    }

    /// Rest positions of `count` dice: one row centred in the play field.
    pub fn home_positions(&self, count: usize) -> Vec<Vec2> {
        let n = count as f32;
        let row_width = n * self.die_size + (n - 1.0).max(0.0) * self.die_gap;
        let start_x = self.field_width / 2.0 - row_width / 2.0 + self.die_size / 2.0;
        let y = self.field_height / 2.0;

        (0..count)
            .map(|i| Vec2::new(start_x + i as f32 * (self.die_size + self.die_gap), y))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_setting_parse_hex_rgb() {
        let color = ColorSetting::parse("#FF8844").unwrap();
        assert!((color.r - 1.0).abs() < 0.01);
        assert!((color.g - 0.533).abs() < 0.01);
        assert!((color.b - 0.267).abs() < 0.01);
        assert!((color.a - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_color_setting_parse_hex_argb() {
        let color = ColorSetting::parse("#80FF8844").unwrap();
        assert!((color.a - 0.502).abs() < 0.01);
        assert!((color.r - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_color_setting_parse_labeled() {
        let color = ColorSetting::parse("A:0.5 R:1.0 G:0.5 B:0.25").unwrap();
        assert!((color.a - 0.5).abs() < 0.01);
        assert!((color.r - 1.0).abs() < 0.01);
        assert!((color.g - 0.5).abs() < 0.01);
        assert!((color.b - 0.25).abs() < 0.01);
    }

    #[test]
    fn test_color_setting_parse_csv() {
        let argb = ColorSetting::parse("0.5,1.0,0.5,0.25").unwrap();
        assert!((argb.a - 0.5).abs() < 0.01);
        assert!((argb.b - 0.25).abs() < 0.01);

        let rgb = ColorSetting::parse("1.0, 0.0, 0.0").unwrap();
        assert_eq!(rgb.a, 1.0);
        assert_eq!(rgb.r, 1.0);

        assert!(ColorSetting::parse("1,2").is_none());
        assert!(ColorSetting::parse("#12345").is_none());
        assert!(ColorSetting::parse("green").is_none());
    }

    #[test]
    fn test_color_setting_rgb_bytes() {
        let green = ColorSetting::rgb(0x27AE60);
        assert_eq!(green.to_rgba8(), [0x27, 0xAE, 0x60, 0xFF]);
    }

    #[test]
    fn test_color_setting_from_str() {
        let green: ColorSetting = "#27AE60".parse().unwrap();
        assert_eq!(green.to_rgba8(), [0x27, 0xAE, 0x60, 0xFF]);

        let err = "green".parse::<ColorSetting>().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "color", .. }));
        assert!(err.to_string().contains("`green`"));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dice_count, 5);
        assert_eq!(config.roll.max_ticks, 36);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = GameConfig::from_ron("(dice_count: 3, roll: (max_ticks: 12))").unwrap();
        assert_eq!(config.dice_count, 3);
        assert_eq!(config.roll.max_ticks, 12);
        assert_eq!(config.roll.rotation_steps, 5);
        assert_eq!(config.field_width, 800.0);
    }

    #[test]
    fn test_ron_round_trip_of_defaults() {
        let text = GameConfig::default().to_ron().unwrap();
        assert_eq!(GameConfig::from_ron(&text).unwrap(), GameConfig::default());
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let cases = [
            "(min_dice: 0)",
            "(min_dice: 6, max_dice: 4)",
            "(dice_count: 11)",
            "(roll: (max_ticks: 0))",
            "(roll: (rotation_steps: 0))",
            "(roll: (tick_interval_ms: 0))",
            "(die_size: -4.0)",
            "(field_width: 0.0)",
        ];
        for text in cases {
            assert!(
                matches!(GameConfig::from_ron(text), Err(ConfigError::Invalid { .. })),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(GameConfig::from_ron("(dice_count: \"five\")"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = GameConfig::load(Path::new("definitely/not/here.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_rotation_schedule_reference() {
        let params = RollParams::default();
        assert_eq!(params.ticks_per_step(), 8);
        assert_eq!(params.rotation_per_step(), 216.0);

        let changes: Vec<(u32, f32)> = (1..=36)
            .filter_map(|t| params.rotation_at(t).map(|r| (t, r)))
            .collect();
        assert_eq!(
            changes,
            vec![(8, 216.0), (16, 432.0), (24, 648.0), (32, 864.0), (36, 1080.0)]
        );
    }

    #[test]
    fn test_rotation_schedule_lands_short() {
        let params = RollParams {
            max_ticks: 12,
            ..RollParams::default()
        };
        // ceil(12 / 5) = 3, so only four steps fit.
        let last = (1..=12).filter_map(|t| params.rotation_at(t)).last();
        assert_eq!(last, Some(864.0));
    }

    #[test]
    fn test_bounce_phase_split() {
        let params = RollParams::default();
        assert!(params.is_bounce_phase(1));
        assert!(params.is_bounce_phase(17));
        assert!(!params.is_bounce_phase(18));
        assert!(!params.is_bounce_phase(36));
    }

    #[test]
    fn test_home_positions_are_centred() {
        let config = GameConfig::default();
        let homes = config.home_positions(5);
        assert_eq!(homes.len(), 5);
        // 5 * 40 + 4 * 20 = 280 wide, starting at 400 - 140 + 20.
        assert_eq!(homes[0], Vec2::new(280.0, 300.0));
        assert_eq!(homes[4], Vec2::new(520.0, 300.0));
        assert_eq!(config.home_positions(1), vec![Vec2::new(400.0, 300.0)]);
    }
}
