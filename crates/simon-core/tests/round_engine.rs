use std::time::Duration;

use simon_core::{
    flash_interval, GameEvent, ManualTimer, Phase, PlayerAction, PressOutcome, RoundEngine,
    ScriptedSymbols, Symbol,
};

type Engine = RoundEngine<ManualTimer, ScriptedSymbols, Vec<GameEvent>>;

fn engine_with(script: &[Symbol]) -> (Engine, ManualTimer) {
    let clock = ManualTimer::new();
    let engine = RoundEngine::new(
        clock.clone(),
        ScriptedSymbols::new(script.iter().copied()),
        Vec::new(),
    );
    (engine, clock)
}

/// Deliver ticks until the engine stops replaying.
fn finish_replay(engine: &mut Engine, clock: &ManualTimer) {
    while engine.phase() == Phase::Replaying {
        let token = clock.next_tick().expect("replay timer armed");
        engine.on_tick(token);
    }
}

fn drain(engine: &mut Engine) -> Vec<GameEvent> {
    std::mem::take(engine.events_mut())
}

/// Reproduce the current sequence exactly.
fn play_back(engine: &mut Engine) {
    let sequence = engine.sequence().to_vec();
    for symbol in sequence {
        assert_ne!(engine.press(symbol), PressOutcome::Mismatch);
    }
}

fn count(events: &[GameEvent], wanted: GameEvent) -> usize {
    events.iter().filter(|event| **event == wanted).count()
}

#[test]
fn first_level_end_to_end() {
    let (mut engine, clock) = engine_with(&[Symbol::A, Symbol::B]);

    engine.start();
    assert_eq!(engine.phase(), Phase::Replaying);
    assert_eq!(engine.sequence(), &[Symbol::A]);
    assert_eq!(clock.armed_interval(), Some(Duration::from_millis(990)));
    assert_eq!(
        drain(&mut engine),
        vec![GameEvent::GameStarted, GameEvent::ButtonsDisabled]
    );

    let token = clock.next_tick().unwrap();
    engine.on_tick(token);
    assert_eq!(drain(&mut engine), vec![GameEvent::FlashSymbol(Symbol::A)]);
    assert_eq!(engine.phase(), Phase::Replaying);

    let token = clock.next_tick().unwrap();
    engine.on_tick(token);
    assert_eq!(
        drain(&mut engine),
        vec![GameEvent::ProgressReset, GameEvent::ButtonsEnabled]
    );
    assert_eq!(engine.phase(), Phase::AwaitingInput);
    assert!(!clock.is_armed());
    assert_eq!(clock.now(), Duration::from_millis(1980));

    assert_eq!(
        engine.press(Symbol::A),
        PressOutcome::LevelComplete { next_level: 2 }
    );
    assert_eq!(
        drain(&mut engine),
        vec![GameEvent::ProgressUpdate(100), GameEvent::ButtonsDisabled]
    );
    assert_eq!(engine.sequence(), &[Symbol::A, Symbol::B]);
    assert_eq!(engine.phase(), Phase::Replaying);
    assert_eq!(clock.armed_interval(), Some(Duration::from_millis(960)));
}

#[test]
fn mismatch_ends_the_game() {
    let (mut engine, clock) = engine_with(&[Symbol::A, Symbol::B]);
    engine.start();
    finish_replay(&mut engine, &clock);
    play_back(&mut engine);
    finish_replay(&mut engine, &clock);
    assert_eq!(engine.sequence(), &[Symbol::A, Symbol::B]);
    drain(&mut engine);

    assert_eq!(engine.press(Symbol::B), PressOutcome::Mismatch);
    assert_eq!(engine.phase(), Phase::Ended);
    assert_eq!(
        drain(&mut engine),
        vec![
            GameEvent::GameEnded,
            GameEvent::ButtonsDisabled,
            GameEvent::ProgressReset
        ]
    );
    assert!(!clock.is_armed());
    assert_eq!(engine.session().levels_completed(), 1);
}

#[test]
fn mismatch_midway_emits_exactly_one_game_ended() {
    let (mut engine, clock) = engine_with(&[Symbol::A, Symbol::B, Symbol::A]);
    engine.start();
    for _ in 0..2 {
        finish_replay(&mut engine, &clock);
        play_back(&mut engine);
    }
    finish_replay(&mut engine, &clock);
    assert_eq!(engine.level(), 3);

    assert_eq!(engine.press(Symbol::A), PressOutcome::Matched { progress: 33 });
    assert_eq!(engine.press(Symbol::A), PressOutcome::Mismatch);
    assert_eq!(engine.press(Symbol::A), PressOutcome::Ignored);
    assert_eq!(engine.press(Symbol::B), PressOutcome::Ignored);

    let events = drain(&mut engine);
    assert_eq!(count(&events, GameEvent::GameEnded), 1);
    assert_eq!(engine.phase(), Phase::Ended);
}

#[test]
fn correct_play_grows_the_sequence_one_symbol_per_level() {
    let script = [Symbol::B, Symbol::B, Symbol::A, Symbol::B, Symbol::A];
    let (mut engine, clock) = engine_with(&script);
    engine.start();

    for level in 1..=12u32 {
        assert_eq!(engine.level(), level);
        assert_eq!(engine.sequence().len(), level as usize);
        assert_eq!(clock.armed_interval(), Some(flash_interval(level)));

        let before = engine.sequence().to_vec();
        finish_replay(&mut engine, &clock);
        let flashed: Vec<Symbol> = engine
            .events()
            .iter()
            .filter_map(|event| match event {
                GameEvent::FlashSymbol(symbol) => Some(*symbol),
                _ => None,
            })
            .collect();
        assert_eq!(flashed, before);

        play_back(&mut engine);
        assert_eq!(&engine.sequence()[..before.len()], before.as_slice());
        assert_eq!(engine.phase(), Phase::Replaying);
        assert_eq!(count(engine.events(), GameEvent::GameEnded), 0);
        drain(&mut engine);
    }
}

#[test]
fn progress_counts_up_through_the_level() {
    let (mut engine, clock) = engine_with(&[Symbol::A]);
    engine.start();
    for _ in 0..3 {
        finish_replay(&mut engine, &clock);
        play_back(&mut engine);
    }
    finish_replay(&mut engine, &clock);
    assert_eq!(engine.level(), 4);
    drain(&mut engine);

    play_back(&mut engine);
    let progress: Vec<u8> = engine
        .events()
        .iter()
        .filter_map(|event| match event {
            GameEvent::ProgressUpdate(percent) => Some(*percent),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![25, 50, 75, 100]);
}

#[test]
fn restart_from_every_phase_begins_level_one() {
    let (mut engine, clock) = engine_with(&[Symbol::B, Symbol::A]);
    assert_eq!(engine.phase(), Phase::Idle);

    let restart = |engine: &mut Engine| {
        engine.apply(PlayerAction::Start);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.sequence().len(), 1);
        assert_eq!(engine.phase(), Phase::Replaying);
        assert_eq!(engine.session().input_cursor(), 0);
        assert_eq!(engine.session().replay_cursor(), 0);
        assert_eq!(clock.armed_interval(), Some(flash_interval(1)));
    };

    restart(&mut engine);

    // Mid-replay.
    engine.on_tick(clock.next_tick().unwrap());
    restart(&mut engine);

    // Awaiting input at level 2.
    finish_replay(&mut engine, &clock);
    play_back(&mut engine);
    finish_replay(&mut engine, &clock);
    assert_eq!(engine.phase(), Phase::AwaitingInput);
    restart(&mut engine);

    // Ended.
    finish_replay(&mut engine, &clock);
    let wrong = engine.session().expected_symbol().unwrap().other();
    engine.press(wrong);
    assert_eq!(engine.phase(), Phase::Ended);
    restart(&mut engine);
}

#[test]
fn restart_discards_the_previous_sequence() {
    let (mut engine, clock) = engine_with(&[Symbol::A, Symbol::B, Symbol::B]);
    engine.start();
    finish_replay(&mut engine, &clock);
    play_back(&mut engine);
    assert_eq!(engine.sequence(), &[Symbol::A, Symbol::B]);

    engine.start();
    assert_eq!(engine.sequence(), &[Symbol::B]);
    assert_eq!(count(engine.events(), GameEvent::GameStarted), 2);
}

#[test]
fn restart_replaces_the_running_timer() {
    let (mut engine, clock) = engine_with(&[Symbol::A]);
    engine.start();
    let first = engine.active_timer().unwrap();
    engine.start();
    let second = engine.active_timer().unwrap();
    assert_ne!(first, second);
    assert_eq!(clock.starts(), 2);
    assert_eq!(clock.next_tick(), Some(second));
}

#[test]
fn snapshot_reflects_the_session() {
    let (mut engine, clock) = engine_with(&[Symbol::B]);
    engine.start();
    finish_replay(&mut engine, &clock);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.level, 1);
    assert_eq!(snapshot.sequence, vec![Symbol::B]);
    assert_eq!(snapshot.phase, Phase::AwaitingInput);
    assert_eq!(snapshot.replay_cursor, 1);
    assert_eq!(snapshot.levels_completed, 0);
}
