//! Headless batch play against a bot with a configurable hit rate.

use std::collections::BTreeMap;
use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use simon_core::{ManualTimer, NullSink, Phase, PressOutcome, RoundEngine, SeededSymbols};

#[derive(Debug, Clone)]
pub struct SimulationSettings {
    pub games: u32,
    pub seed: u64,
    /// Probability the bot presses the expected symbol.
    pub accuracy: f64,
    /// Games that clear this many levels stop there.
    pub max_level: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub games: u32,
    pub seed: u64,
    pub accuracy: f64,
    pub max_level: u32,
    pub best_level: u32,
    pub mean_levels_completed: f64,
    pub capped_games: u32,
    /// Mean fake-clock time spent watching replays, per game.
    pub mean_replay_seconds: f64,
    /// Levels completed -> number of games.
    pub histogram: BTreeMap<u32, u32>,
}

struct GameResult {
    levels_completed: u32,
    capped: bool,
    replay_time: Duration,
}

pub fn run(settings: &SimulationSettings) -> SimulationReport {
    let mut bot = StdRng::seed_from_u64(settings.seed.rotate_left(32));
    let mut histogram = BTreeMap::new();
    let mut total_completed = 0u64;
    let mut total_replay = Duration::ZERO;
    let mut best_level = 0;
    let mut capped_games = 0;

    for game in 0..settings.games {
        let symbols = SeededSymbols::new(settings.seed.wrapping_add(u64::from(game)));
        let result = play_one(symbols, &mut bot, settings);
        tracing::debug!(
            game,
            levels_completed = result.levels_completed,
            "simulated game finished"
        );

        *histogram.entry(result.levels_completed).or_insert(0) += 1;
        total_completed += u64::from(result.levels_completed);
        total_replay += result.replay_time;
        best_level = best_level.max(result.levels_completed);
        if result.capped {
            capped_games += 1;
        }
    }

    let games = settings.games.max(1) as f64;
    SimulationReport {
        games: settings.games,
        seed: settings.seed,
        accuracy: settings.accuracy,
        max_level: settings.max_level,
        best_level,
        mean_levels_completed: total_completed as f64 / games,
        capped_games,
        mean_replay_seconds: total_replay.as_secs_f64() / games,
        histogram,
    }
}

fn play_one(symbols: SeededSymbols, bot: &mut StdRng, settings: &SimulationSettings) -> GameResult {
    let clock = ManualTimer::new();
    let mut engine = RoundEngine::new(clock.clone(), symbols, NullSink);
    engine.start();

    let mut capped = false;
    loop {
        while engine.phase() == Phase::Replaying {
            match clock.next_tick() {
                Some(token) => engine.on_tick(token),
                None => break,
            }
        }
        if engine.session().levels_completed() >= settings.max_level {
            capped = true;
            break;
        }
        let Some(expected) = engine.session().expected_symbol() else {
            break;
        };
        let symbol = if bot.gen_bool(settings.accuracy) {
            expected
        } else {
            expected.other()
        };
        if engine.press(symbol) == PressOutcome::Mismatch {
            break;
        }
    }

    GameResult {
        levels_completed: engine.session().levels_completed(),
        capped,
        replay_time: clock.now(),
    }
}
