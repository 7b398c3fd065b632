//! Liar's Dice CLI
//!
//! Rolls and counts Liar's Dice in the terminal, driving the same roll engine
//! as the windowed table.

mod terminal;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use liarsdice_core::{
    count_faces, ColorSetting, CountResult, FaceValue, GameConfig, InputEvent, RollCompleted, Table,
    TableResponse,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use terminal::{faces_line, tally_line, DiceArt, LogSounds, TerminalRenderer};

/// Liar's Dice - roll and count dice
#[derive(Parser)]
#[command(name = "liars")]
#[command(author, version, about = "Liar's Dice - roll and count dice in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (RON). Defaults are used when omitted.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Seed the dice for a reproducible session
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Border colour of counted dice, e.g. #E67E22 or 0.9,0.5,0.1
    #[arg(long, global = true, value_parser = parse_color)]
    highlight_color: Option<ColorSetting>,

    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll the dice once
    Roll {
        /// Number of dice on the table
        #[arg(short, long)]
        dice: Option<usize>,

        /// Count this value (1-6) once the dice land; ones are wild
        #[arg(short, long, value_parser = parse_face)]
        target: Option<FaceValue>,

        /// Play the roll animation in real time
        #[arg(short, long)]
        animate: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Count a value in a list of faces
    Count {
        /// Value to count (1-6); ones are wild for every other value
        #[arg(short, long, value_parser = parse_face)]
        target: FaceValue,

        /// Face values on the table
        #[arg(required = true, value_parser = parse_face)]
        faces: Vec<FaceValue>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive table: roll, select values, add and remove dice
    Play {
        /// Number of dice to start with
        #[arg(short, long)]
        dice: Option<usize>,
    },

    /// Print the settings in effect as RON
    Settings,
}

// ============================================================================
// Argument parsing
// ============================================================================

fn parse_face(s: &str) -> Result<FaceValue, String> {
    s.parse::<FaceValue>().map_err(|e| e.to_string())
}

fn parse_color(s: &str) -> Result<ColorSetting, String> {
    s.parse::<ColorSetting>().map_err(|e| e.to_string())
}

/// A line typed at the interactive table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayCommand {
    Event(InputEvent),
    Help,
    Quit,
}

fn parse_play_command(line: &str) -> Option<PlayCommand> {
    let line = line.trim();
    let command = match line.to_ascii_lowercase().as_str() {
        "r" | "roll" => PlayCommand::Event(InputEvent::RollRequested),
        "0" | "d" | "deselect" => PlayCommand::Event(InputEvent::ValueDeselected),
        "+" | "add" => PlayCommand::Event(InputEvent::AddDie),
        "-" | "remove" => PlayCommand::Event(InputEvent::RemoveDie),
        "c" | "cancel" => PlayCommand::Event(InputEvent::CancelRoll),
        "h" | "?" | "help" => PlayCommand::Help,
        "q" | "quit" | "exit" => PlayCommand::Quit,
        _ => PlayCommand::Event(InputEvent::ValueSelected(line.parse().ok()?)),
    };
    Some(command)
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v`; the default is quiet.
fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init()
        .ok();
}

fn run(cli: Cli) -> Result<(), String> {
    let config = GameConfig::load_or_default(cli.settings.as_deref()).map_err(|e| e.to_string())?;
    let config = with_highlight_color(config, cli.highlight_color);
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match cli.command {
        Commands::Roll {
            dice,
            target,
            animate,
            json,
        } => {
            let config = with_dice_count(config, dice)?;
            let runtime = tokio::runtime::Runtime::new().map_err(|e| e.to_string())?;
            let report = runtime.block_on(run_roll(config, target, animate && !json, &mut rng))?;
            if json {
                print_json(&report)?;
            } else {
                print_report(&report);
            }
        }
        Commands::Count {
            target,
            faces,
            json,
        } => {
            let tally = count_faces(target, &faces);
            if json {
                print_json(&tally)?;
            } else {
                print_count(&faces, &tally);
            }
        }
        Commands::Play { dice } => {
            let config = with_dice_count(config, dice)?;
            let runtime = tokio::runtime::Runtime::new().map_err(|e| e.to_string())?;
            runtime.block_on(run_play(config, &mut rng))?;
        }
        Commands::Settings => {
            println!("{}", config.to_ron().map_err(|e| e.to_string())?);
        }
    }
    Ok(())
}

fn with_dice_count(mut config: GameConfig, dice: Option<usize>) -> Result<GameConfig, String> {
    if let Some(count) = dice {
        config.dice_count = count;
        config.validate().map_err(|e| e.to_string())?;
    }
    Ok(config)
}

fn with_highlight_color(mut config: GameConfig, color: Option<ColorSetting>) -> GameConfig {
    if let Some(color) = color {
        debug!(rgba = ?color.to_rgba8(), "Highlight colour from the command line");
        config.palette.highlight_border = color;
    }
    config
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

// ============================================================================
// Roll
// ============================================================================

#[derive(Debug, Serialize)]
struct RollReport {
    faces: Vec<FaceValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tally: Option<CountResult>,
    #[serde(skip)]
    board: Vec<String>,
}

/// Run one roll to completion.
///
/// Animated rolls follow the wall clock; otherwise time is fed in whole tick
/// intervals so the roll finishes immediately.
async fn run_roll(
    config: GameConfig,
    target: Option<FaceValue>,
    animate: bool,
    rng: &mut StdRng,
) -> Result<RollReport, String> {
    let mut table = Table::new(config, rng);
    let mut sounds = LogSounds::default();
    if let Some(target) = target {
        table.handle(InputEvent::ValueSelected(target), rng, &mut sounds);
    }

    table.handle(InputEvent::RollRequested, rng, &mut sounds);
    let interval = table.coordinator().params().tick_interval;
    let completed = if animate {
        animate_roll(&mut table, rng, &mut sounds).await?
    } else {
        finish_roll(&mut table, interval, rng, &mut sounds)?
    };
    info!(faces = %faces_line(&completed.faces), sounds = sounds.played, "Roll finished");

    let mut renderer = TerminalRenderer::new(DiceArt::Pips);
    table.render(&mut renderer);
    Ok(RollReport {
        faces: completed.faces,
        tally: table.tally().cloned(),
        board: renderer.take_frame(),
    })
}

fn finish_roll(
    table: &mut Table,
    step: Duration,
    rng: &mut StdRng,
    sounds: &mut LogSounds,
) -> Result<RollCompleted, String> {
    // Ticks plus the settle animation, with headroom.
    let params = table.coordinator().params();
    let settle_steps = params.settle_duration.as_millis() / step.as_millis().max(1);
    let budget = params.max_ticks as u128 + settle_steps + 4;

    for _ in 0..budget {
        if let Some(done) = table.update(step, rng, sounds) {
            return Ok(done);
        }
    }
    Err("roll did not come to rest".to_string())
}

async fn animate_roll(
    table: &mut Table,
    rng: &mut StdRng,
    sounds: &mut LogSounds,
) -> Result<RollCompleted, String> {
    let mut renderer = TerminalRenderer::new(DiceArt::Glyphs);
    let mut frames = tokio::time::interval(table.coordinator().params().tick_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = Instant::now();

    loop {
        frames.tick().await;
        let now = Instant::now();
        let done = table.update(now - last, rng, sounds);
        last = now;

        table.render(&mut renderer);
        redraw_line(&renderer.take_frame().join(" "))?;
        if let Some(done) = done {
            println!();
            return Ok(done);
        }
    }
}

fn redraw_line(line: &str) -> Result<(), String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "\r\x1b[2K{}", line).map_err(|e| e.to_string())?;
    stdout.flush().map_err(|e| e.to_string())
}

fn print_report(report: &RollReport) {
    println!("\n{}", "═══════════════════════════════════════".cyan());
    println!("{}", "Rolling:".bold().white());
    for line in &report.board {
        println!("  {}", line);
    }
    println!("{} {}", "Faces:".bold().white(), faces_line(&report.faces).yellow().bold());
    if let Some(tally) = &report.tally {
        println!("{} {}", "Count:".bold().white(), tally_line(tally).bright_green().bold());
    }
    println!("{}", "═══════════════════════════════════════".cyan());
}

fn print_count(faces: &[FaceValue], tally: &CountResult) {
    let marked: Vec<String> = faces
        .iter()
        .enumerate()
        .map(|(i, face)| {
            if tally.contains(i) {
                format!("[{}]", face).bright_green().bold().to_string()
            } else {
                format!("[{}]", face).dimmed().to_string()
            }
        })
        .collect();

    println!("\n{}", "═══════════════════════════════════════".cyan());
    println!("{} {}", "Dice:".bold().white(), marked.join(" "));
    println!("{} {}", "Count:".bold().white(), tally_line(tally).bright_green().bold());
    println!("{}", "═══════════════════════════════════════".cyan());
}

// ============================================================================
// Interactive table
// ============================================================================

fn describe(response: TableResponse) -> String {
    match response {
        TableResponse::RollStarted => "Rolling...".to_string(),
        TableResponse::Busy => "Wait for the dice to land".to_string(),
        TableResponse::RollCancelled => "Roll cancelled".to_string(),
        TableResponse::NotRolling => "Nothing to cancel".to_string(),
        TableResponse::SelectionChanged(Some(value)) => format!("Counting {}s", value),
        TableResponse::SelectionChanged(None) => "Selection cleared".to_string(),
        TableResponse::DiceCountChanged(n) => format!("{} dice on the table", n),
        TableResponse::DiceCountAtLimit(n) => format!("Already at {} dice", n),
    }
}

fn print_help() {
    println!("{}", "Commands:".bold().yellow());
    println!("  r        roll the dice");
    println!("  1-6      count a value (again to clear)");
    println!("  0        clear the selection");
    println!("  + / -    add or remove a die");
    println!("  c        cancel a roll");
    println!("  q        quit");
}

fn print_table(table: &Table) {
    let mut renderer = TerminalRenderer::new(DiceArt::Pips);
    table.render(&mut renderer);
    for line in renderer.take_frame() {
        println!("  {}", line);
    }
    if let Some(tally) = table.tally() {
        println!("  {}", tally_line(tally).bright_green().bold());
    }
}

async fn run_play(config: GameConfig, rng: &mut StdRng) -> Result<(), String> {
    let mut table = Table::new(config, rng);
    let mut sounds = LogSounds::default();
    let mut glyphs = TerminalRenderer::new(DiceArt::Glyphs);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut frames = tokio::time::interval(table.coordinator().params().tick_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = Instant::now();

    print_help();
    print_table(&table);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.map_err(|e| e.to_string())? else {
                    break;
                };
                match parse_play_command(&line) {
                    Some(PlayCommand::Quit) => break,
                    Some(PlayCommand::Help) => print_help(),
                    Some(PlayCommand::Event(event)) => {
                        let response = table.handle(event, rng, &mut sounds);
                        if response == TableResponse::RollStarted {
                            last = Instant::now();
                        }
                        println!("{}", describe(response).cyan());
                        if !table.is_rolling() {
                            print_table(&table);
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => println!("{} '{}' (h for help)", "Unknown command".red(), line.trim()),
                }
            }
            _ = frames.tick(), if table.is_rolling() => {
                let now = Instant::now();
                let done = table.update(now - last, rng, &mut sounds);
                last = now;

                table.render(&mut glyphs);
                redraw_line(&glyphs.take_frame().join(" "))?;
                if let Some(done) = done {
                    println!();
                    debug!(faces = %faces_line(&done.faces), "Roll landed");
                    print_table(&table);
                }
            }
        }
    }

    info!(sounds = sounds.played, "Leaving the table");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
