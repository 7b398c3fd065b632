// Hide console window on Windows for release builds (GUI app).
// In debug builds, keep the console so panics/backtraces are visible.
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;
use colored::Colorize;
use liarsdice::dice2d::LiarsDicePlugin;
use liarsdice_core::{ColorSetting, GameConfig};

/// Liar's Dice - dice table
#[derive(Parser)]
#[command(name = "liarsdice")]
#[command(author, version, about = "Liar's Dice - animated dice table with wild-ones counting")]
struct Cli {
    /// Settings file (RON). Defaults are used when omitted or unreadable.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Number of dice to start with
    #[arg(short, long)]
    dice: Option<usize>,

    /// Border colour of counted dice, e.g. #E67E22 or 0.9,0.5,0.1
    #[arg(long, value_parser = parse_color)]
    highlight_color: Option<ColorSetting>,

    /// Print the default settings as RON and exit
    #[arg(long)]
    print_settings: bool,
}

fn parse_color(s: &str) -> Result<ColorSetting, String> {
    s.parse::<ColorSetting>().map_err(|e| e.to_string())
}

/// Settings from the command line. A bad settings file falls back to the
/// defaults; a bad dice count is reported and ignored.
fn load_config(cli: &Cli) -> GameConfig {
    let mut config = GameConfig::load_or_default(cli.settings.as_deref()).unwrap_or_else(|e| {
        eprintln!("{} {} - using default settings", "Warning:".yellow().bold(), e);
        GameConfig::default()
    });

    if let Some(count) = cli.dice {
        let previous = config.dice_count;
        config.dice_count = count;
        if let Err(e) = config.validate() {
            eprintln!("{} {}", "Warning:".yellow().bold(), e);
            config.dice_count = previous;
        }
    }
    if let Some(color) = cli.highlight_color {
        config.palette.highlight_border = color;
    }
    config
}

fn main() {
    let cli = Cli::parse();

    if cli.print_settings {
        match GameConfig::default().to_ron() {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                std::process::exit(1);
            }
        }
        return;
    }

    let config = load_config(&cli);
    let resolution = (config.field_width as u32, config.field_height as u32);

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Liar's Dice".to_string(),
                        resolution: resolution.into(),
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(bevy::log::LogPlugin {
                    level: bevy::log::Level::INFO,
                    filter: "info,wgpu=error,liarsdice_core=info".to_string(),
                    ..default()
                }),
        )
        .add_plugins(LiarsDicePlugin { config })
        .run();
}
