//! Arena CLI: run bot-vs-bot experiments from the command line.
//!
//! Usage:
//!   cargo run --release --bin arena -- --games 1000 --bots hard,easy
//!   cargo run --release --bin arena -- --games 200 --bots heuristic,random,random,random

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use ludo_engine::engine::arena::run_arena;
use ludo_engine::engine::bot_profiles::{load_default_profiles, load_profiles};
use ludo_engine::engine::bot_strategy::BotStrategy;

#[derive(Parser)]
#[command(name = "arena", about = "Run bot-vs-bot arena experiments for Ludo")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    games: usize,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Rotate seat positions between games
    #[arg(long, default_value = "true")]
    alternate_seats: bool,

    /// Path to bot_profiles.toml
    #[arg(long, env = "LUDO_BOT_PROFILES")]
    profiles: Option<PathBuf>,

    /// Profiles to seat, one per player (2 to 4). Repeats get a numeric suffix.
    #[arg(long, value_delimiter = ',', default_value = "heuristic,random")]
    bots: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let profiles = match &cli.profiles {
        Some(path) => load_profiles(path).unwrap_or_else(|e| {
            eprintln!("Error loading profiles: {}", e);
            std::process::exit(1);
        }),
        None => load_default_profiles(),
    };

    let mut strategies: HashMap<String, Box<dyn BotStrategy>> = HashMap::new();
    for (seat, name) in cli.bots.iter().enumerate() {
        let strategy = profiles.strategy(name).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            eprintln!("Available profiles: {:?}", profiles.profiles.keys().collect::<Vec<_>>());
            std::process::exit(1);
        });
        let label = if strategies.contains_key(name) {
            format!("{}#{}", name, seat + 1)
        } else {
            name.clone()
        };
        eprintln!("  seat {}: {} ({})", seat + 1, label, strategy.name());
        strategies.insert(label, strategy);
    }

    eprintln!(
        "Arena: {} games, seed={}, alternate_seats={}",
        cli.games, cli.seed, cli.alternate_seats
    );

    let progress_cb = |done: usize, total: usize| {
        if done % 10 == 0 || done == total {
            eprint!("\r  [{}/{}] games completed", done, total);
        }
    };

    let result = run_arena(
        &strategies,
        cli.games,
        cli.seed,
        cli.alternate_seats,
        Some(&progress_cb),
    )
    .unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    eprintln!("\r                                    "); // clear progress line
    println!("{}", result.summary());
}
