//! Cat Life - Entry Point
//!
//! Sets up logging, builds the game from the command line, then either runs
//! a fixed number of frames headless or drives the interactive loop: one
//! task owns the game and multiplexes the frame clock with player input.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use cat_life::core::config::{Difficulty, GameMode, SimulationConfig};
use cat_life::core::error::Result;
use cat_life::core::Phase;
use cat_life::persistence::{FileStore, KeyValueStore, MemoryStore};
use cat_life::simulation::{Game, GameMessage, GameSession, LogCategory, SessionObserver, SessionSettings};
use clap::Parser;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing_subscriber::EnvFilter;

/// Cat Life - look after a household of cats
#[derive(Parser, Debug)]
#[command(name = "cat-life")]
#[command(about = "Keep six cats fed, clean, calm and indoors, one day at a time")]
struct Args {
    /// Random seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// easy, normal or hard
    #[arg(long, default_value = "normal")]
    difficulty: Difficulty,

    /// challenge or endless
    #[arg(long, default_value = "challenge")]
    mode: GameMode,

    /// Name for the high score table
    #[arg(long, default_value = "Player")]
    name: String,

    /// TOML file overriding simulation constants (difficulty scaling is then skipped)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for saved games and high scores; without it nothing is kept
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Continue the saved game if there is one
    #[arg(long = "continue")]
    resume: bool,

    /// Run this many frames without input, print the state and exit
    #[arg(long)]
    headless_ticks: Option<u64>,
}

/// Prints narration to stdout and a header whenever the phase changes
#[derive(Default)]
struct ConsoleObserver {
    shown: Option<(u32, Phase)>,
}

impl SessionObserver for ConsoleObserver {
    fn render(&mut self, session: &GameSession) {
        let now = (session.day(), session.phase());
        if self.shown != Some(now) {
            self.shown = Some(now);
            println!(
                "\n=== Day {} - {} | Score {} | Energy {}/{} ===",
                now.0,
                now.1,
                session.score,
                session.energy,
                session.config.max_energy
            );
        }
    }

    fn log(&mut self, message: &GameMessage) {
        let prefix = match message.category {
            LogCategory::Warning => "! ",
            LogCategory::Energy => "  ",
            LogCategory::Event => "* ",
            LogCategory::Health => "+ ",
            LogCategory::Game | LogCategory::Player | LogCategory::Summary => "",
        };
        println!("{prefix}{}", message.text);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cat_life=info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::from_toml_file(path)?,
        None => SimulationConfig::for_difficulty(args.difficulty),
    };
    config.validate()?;

    let seed = args
        .seed
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis().unsigned_abs());
    tracing::info!(seed, difficulty = %args.difficulty, mode = %args.mode, "Cat Life starting...");

    let store: Box<dyn KeyValueStore> = match &args.save_dir {
        Some(dir) => Box::new(FileStore::open(dir)?),
        None => Box::new(MemoryStore::new()),
    };
    let settings = SessionSettings {
        player_name: args.name.clone(),
        difficulty: args.difficulty,
        mode: args.mode,
    };
    let observer = Box::new(ConsoleObserver::default());

    let mut game = if args.resume {
        Game::resume_or_new(settings, config, seed, observer, store)
    } else {
        Game::new(settings, config, seed, observer, store)
    };

    if let Some(frames) = args.headless_ticks {
        run_headless(&mut game, frames);
        return Ok(());
    }

    println!("\n=== CAT LIFE ===");
    println!("Six cats, four rooms, one tired human. Type 'help' for commands.");

    // The runtime only drives timers and the input channel
    let rt = Runtime::new()?;
    rt.block_on(run_interactive(&mut game))?;

    println!("\nGoodbye! Final score: {}", game.session().score);
    Ok(())
}

fn run_headless(game: &mut Game, frames: u64) {
    let frame_ms = game.session().config.frame_ms;
    for _ in 0..frames {
        game.tick(frame_ms);
        if game.session().is_game_over() || game.session().clock.is_day_over() {
            break;
        }
    }
    println!("{}", game.session().status_report());
}

async fn run_interactive(game: &mut Game) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    // Blocking stdin reads stay off the runtime
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut frames = tokio::time::interval(Duration::from_millis(game.session().config.frame_ms));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = Instant::now();
    prompt(&mut io::stdout())?;

    loop {
        tokio::select! {
            _ = frames.tick() => {
                let now = Instant::now();
                let elapsed = now.duration_since(last).as_millis() as u64;
                last = now;
                game.tick(elapsed);
            }
            line = rx.recv() => {
                let Some(line) = line else { break };
                game.execute(&line);
                if game.is_finished() {
                    break;
                }
                prompt(&mut io::stdout())?;
            }
        }
    }
    Ok(())
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    out.write_all(b"> ")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_prompt_reports_flush_failure() {
        let mut out = Vec::new();
        prompt(&mut out).unwrap();
        assert_eq!(out, b"> ");
        assert_eq!(prompt(&mut BrokenPipe).unwrap_err().kind(), io::ErrorKind::BrokenPipe);
    }
}
