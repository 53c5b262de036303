//! # Delve Main Entry Point
//!
//! Parses arguments, sets up logging and runs the text adventure loop on
//! standard input, or prints a generated level with `--summary`.

use clap::Parser;
use delve::{
    AdventureSession, DelveError, DelveResult, Difficulty, GenerationConfig, Generator,
    InputHandler, Level, LevelGenerator, PlayerInput, RoomId,
};
use log::{debug, info};
use std::io::{self, BufRead, Write};

/// Command line arguments for Delve.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "A grid dungeon crawl with guaranteed-solvable levels")]
#[command(version)]
struct Args {
    /// Random seed for level generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Difficulty (1-3, easy, normal or hard); asked for interactively if omitted
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Number of levels in the adventure
    #[arg(long, default_value_t = delve::config::DEFAULT_LEVEL_COUNT)]
    levels: u32,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print a generated level and exit
    #[arg(long)]
    summary: bool,
}

fn main() -> DelveResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Starting Delve v{} with seed {}", delve::VERSION, seed);

    if args.summary {
        return print_summary(args.difficulty.unwrap_or(Difficulty::Normal), seed);
    }

    run_game(&args, seed)
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        use tracing::Level;

        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_target(false)
            .init();
    }
}

/// Generates one level and prints its layout.
fn print_summary(difficulty: Difficulty, seed: u64) -> DelveResult<()> {
    let config = GenerationConfig::for_difficulty(seed, difficulty, 1);
    let mut rng = delve::generation::utils::create_rng(&config);
    let generator = LevelGenerator::for_difficulty(difficulty);
    let level = generator.generate(&config, &mut rng)?;
    debug!("{} produced level {}", generator.generator_type(), level.number);

    println!("Seed: {}", seed);
    println!("Difficulty: {}", difficulty);
    println!("Size: {}x{}", level.width, level.height);
    println!("Start: {}  Treasure: {}", level.start, level.treasure);
    println!("Barriers: {}", level.graph.active_barrier_count());
    println!("Solvable: {}", level.is_solvable());
    println!();
    println!("{}", render_grid(&level));
    println!("S start, T treasure, B barrier, P puzzle, ? hidden passage, ! trap");
    Ok(())
}

fn render_grid(level: &Level) -> String {
    let mut rows = Vec::new();
    for y in 0..level.height {
        let row: String = (0..level.width)
            .map(|x| {
                let id = RoomId::new(x, y);
                match level.room(id) {
                    _ if id == level.start => 'S',
                    _ if id == level.treasure => 'T',
                    Some(room) if room.has_active_barrier() => 'B',
                    Some(room) if room.active_contents().any(|i| i.is_active_trap()) => '!',
                    Some(room) if room.unsolved_puzzle().is_some() => 'P',
                    Some(room) if room.has_hidden_passages => '?',
                    Some(_) => '.',
                    None => ' ',
                }
            })
            .collect();
        rows.push(row);
    }
    rows.join("\n")
}

/// Runs the interactive loop until the adventure ends or input runs out.
fn run_game(args: &Args, seed: u64) -> DelveResult<()> {
    let mut session = AdventureSession::with_level_count(seed, args.levels);
    let handler = InputHandler::new();

    let welcome = session.begin()?;
    match args.difficulty {
        Some(difficulty) => println!("{}", session.select_difficulty(difficulty)?.message),
        None => {
            println!("{}", welcome);
        }
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !session.is_over() {
        print!("> ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let result = handler
            .parse_line(&line, session.phase)
            .and_then(|input| match input {
                PlayerInput::SelectDifficulty(difficulty) => session.select_difficulty(difficulty),
                PlayerInput::Command(command) => session.execute(command),
                PlayerInput::RestartChoice(true) => session.restart_level(),
                PlayerInput::RestartChoice(false) => Ok(session.end_game()),
            });

        match result {
            Ok(outcome) => println!("{}\n", outcome.message),
            Err(DelveError::InvalidCommand(message)) => println!("{}\n", message),
            Err(err) => return Err(err),
        }
    }

    if !session.is_over() {
        println!("{}", session.end_game().message);
    }
    Ok(())
}
