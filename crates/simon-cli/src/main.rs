use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use simon_core::{flash_interval, EngineConfig, GameEvent, GameRuntime, Symbol};
use tracing_subscriber::EnvFilter;

mod simulate;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init()
        .ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Play(args) => execute_play(args),
        Commands::Simulate(args) => execute_simulate(args),
        Commands::Curve(args) => execute_curve(args),
    }
}

#[derive(Parser)]
#[command(author, version, about = "Two-button memory game")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively, one command per line.
    Play(PlayArgs),
    /// Run headless games against a bot and report how far it got.
    Simulate(SimulateArgs),
    /// Print the replay interval for each level.
    Curve(CurveArgs),
}

#[derive(Args)]
struct PlayArgs {
    /// Seed for a reproducible sequence.
    #[arg(long)]
    seed: Option<u64>,
    /// Engine configuration (JSON).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct SimulateArgs {
    /// Number of games to play.
    #[arg(long, default_value_t = 100)]
    games: u32,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Probability that the bot presses the right button.
    #[arg(long, default_value_t = 0.95, value_parser = parse_probability)]
    accuracy: f64,
    /// Stop a game once this many levels are cleared.
    #[arg(long, default_value_t = 50)]
    max_level: u32,
    /// Emit the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CurveArgs {
    #[arg(long, default_value_t = 12)]
    levels: u32,
}

fn parse_probability(value: &str) -> Result<f64, String> {
    let p: f64 = value
        .parse()
        .map_err(|err| format!("{value} is not a number: {err}"))?;
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(format!("{value} is outside 0.0..=1.0"))
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    EngineConfig::from_json_str(&data)
        .with_context(|| format!("{} is not a valid engine config", path.display()))
}

fn execute_play(args: PlayArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut runtime = GameRuntime::spawn(&config).context("failed to start game engine")?;
    let events = runtime.events().clone();
    let printer = thread::Builder::new()
        .name("simon-printer".into())
        .spawn(move || {
            for event in events.iter() {
                println!("{}", describe(event));
            }
        })
        .context("failed to spawn event printer")?;

    println!("Commands: s = start, a / b = press a button, q = quit");
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read from stdin")?;
        match line.trim() {
            "" => continue,
            "q" | "quit" => break,
            "s" | "start" => runtime.start()?,
            other => match other.parse::<Symbol>() {
                Ok(symbol) => runtime.press(symbol)?,
                Err(err) => eprintln!("{err}"),
            },
        }
    }

    runtime.shutdown();
    drop(runtime);
    printer
        .join()
        .map_err(|_| anyhow!("event printer panicked"))?;
    Ok(())
}

fn describe(event: GameEvent) -> String {
    match event {
        GameEvent::GameStarted => "== new game ==".to_owned(),
        GameEvent::GameEnded => "game over (s to play again)".to_owned(),
        GameEvent::ButtonsEnabled => "[your turn]".to_owned(),
        GameEvent::ButtonsDisabled => "[watch]".to_owned(),
        GameEvent::FlashSymbol(symbol) => format!("  {symbol}"),
        GameEvent::ProgressUpdate(percent) => format!("progress {percent}%"),
        GameEvent::ProgressReset => "progress 0%".to_owned(),
    }
}

fn execute_simulate(args: SimulateArgs) -> Result<()> {
    let settings = simulate::SimulationSettings {
        games: args.games,
        seed: args.seed,
        accuracy: args.accuracy,
        max_level: args.max_level,
    };
    let report = simulate::run(&settings);

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("failed to serialise report")?;
        println!("{json}");
        return Ok(());
    }

    println!(
        "Simulated {} games (seed {}, accuracy {:.2})",
        report.games, report.seed, report.accuracy
    );
    println!("  Best level cleared: {}", report.best_level);
    println!("  Mean levels cleared: {:.2}", report.mean_levels_completed);
    println!("  Games hitting the cap: {}", report.capped_games);
    println!("  Mean replay time: {:.1}s", report.mean_replay_seconds);
    println!("  Levels cleared:");
    for (levels, games) in &report.histogram {
        println!("    {levels:>3}: {games}");
    }
    Ok(())
}

fn execute_curve(args: CurveArgs) -> Result<()> {
    println!("level  interval");
    for level in 1..=args.levels {
        println!("{level:>5}  {:>5} ms", flash_interval(level).as_millis());
    }
    Ok(())
}
