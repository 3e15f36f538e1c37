use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ludo_engine::engine::bot_profiles::{load_default_profiles, load_profiles};
use ludo_engine::engine::models::GameConfig;
use ludo_engine::games::ludo::events::GameEvent;
use ludo_engine::games::ludo::rules::distinct_moves;
use ludo_engine::games::ludo::view::GameView;
use ludo_engine::games::ludo::{Color, LudoSession, TokenId, TurnPhase};

#[derive(Parser)]
#[command(name = "ludo", about = "Play Ludo in the terminal against people or bots")]
struct Cli {
    /// Number of players (2, 3 or 4)
    #[arg(short, long, default_value = "4", env = "LUDO_PLAYERS")]
    players: u8,

    /// Colors played by the computer, e.g. `green,blue`
    #[arg(long, value_delimiter = ',', env = "LUDO_CPU")]
    cpu: Vec<Color>,

    /// Seed for the dice; random when omitted
    #[arg(long, env = "LUDO_SEED")]
    seed: Option<u64>,

    /// Path to bot_profiles.toml (default: auto-discover)
    #[arg(long, env = "LUDO_BOT_PROFILES")]
    profiles: Option<PathBuf>,

    /// Bot profile or difficulty tier for computer seats
    #[arg(long, default_value = "default", env = "LUDO_BOT")]
    bot: String,

    /// Print events and views as JSON lines instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let profiles = match &cli.profiles {
        Some(path) => load_profiles(path)?,
        None => load_default_profiles(),
    };
    let bot = profiles.strategy(&cli.bot)?;

    let config = GameConfig {
        random_seed: cli.seed,
        ..Default::default()
    };
    let mut session = LudoSession::from_config(config).with_bot(bot);
    session.set_player_count(cli.players)?;
    for color in &cli.cpu {
        session.toggle_computer(*color)?;
    }
    let started = session.start()?;
    tracing::info!(bot = session.bot_name(), "session ready");
    report(&cli, &started.events, &started.view)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while session.phase() != TurnPhase::GameOver {
        if session.is_computer_turn() {
            if let Some(step) = session.step_computer()? {
                report(&cli, &step.events, &step.view)?;
            }
            continue;
        }

        let view = session.view();
        let choices = match (view.phase, view.dice) {
            (TurnPhase::AwaitingSelection, Some(dice)) => {
                distinct_moves(&session.state().board, view.current, dice)
            }
            _ => Vec::new(),
        };
        let prompt = match view.phase {
            TurnPhase::AwaitingSelection => format!(
                "{} > token ({}): ",
                view.current,
                choices
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            _ => format!("{} > press enter to roll: ", view.current),
        };
        print!("{prompt}");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let input = line.trim();
        if input == "q" || input == "quit" {
            break;
        }

        let step = match view.phase {
            TurnPhase::AwaitingSelection => match parse_selection(input, &choices, &view.moveable) {
                Some(id) => session.select(id),
                None => {
                    println!("Pick one of the listed tokens.");
                    continue;
                }
            },
            _ => session.roll(),
        };
        match step {
            Ok(step) => report(&cli, &step.events, &step.view)?,
            Err(rejection) => println!("{rejection}"),
        }
    }

    Ok(())
}

/// Accepts a token id (`red-2`) or a 1-based position in `choices`.
fn parse_selection(input: &str, choices: &[TokenId], moveable: &[TokenId]) -> Option<TokenId> {
    if input.is_empty() && choices.len() == 1 {
        return choices.first().copied();
    }
    if let Ok(n) = input.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| choices.get(i)).copied();
    }
    input.parse::<TokenId>().ok().filter(|id| moveable.contains(id))
}

fn report(cli: &Cli, events: &[GameEvent], view: &GameView) -> Result<(), serde_json::Error> {
    if cli.json {
        for event in events {
            println!("{}", serde_json::to_string(event)?);
        }
        println!("{}", serde_json::to_string(view)?);
        return Ok(());
    }

    for event in events {
        match event {
            GameEvent::DiceRolled { player, value } => println!("  {player} rolled {value}"),
            GameEvent::TokenMoved { token, to, kind, .. } => {
                println!("  {token} {kind:?} to {to}")
            }
            GameEvent::TokenCaptured { by, victim, .. } => {
                println!("  {by} captured {victim}")
            }
            _ => {}
        }
    }
    for p in &view.players {
        println!(
            "  {:>6}{}: base {}  board {}  home {}",
            p.name,
            if p.computer { " (cpu)" } else { "" },
            p.at_base,
            p.on_board,
            p.finished
        );
    }
    println!("{}", view.message);
    Ok(())
}
