//! The round/sequence state machine.

use simon_rt::{ReplayTimer, Symbol, SymbolSource, TimerToken};
use tracing::{debug, info, trace};

use crate::events::{EventSink, GameEvent};
use crate::session::{GameSession, Phase, SessionSnapshot};
use crate::speed::flash_interval;

/// Inbound actions a presentation layer can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Start,
    Press(Symbol),
}

/// What a press did. Informational only; none of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// Input is not being accepted right now.
    Ignored,
    Matched { progress: u8 },
    /// The whole sequence was reproduced and the next level has begun.
    LevelComplete { next_level: u32 },
    Mismatch,
}

/// Owns one game session and the timer replaying it.
///
/// The engine is driven from outside: [`start`](Self::start) and [`press`](Self::press)
/// for player actions, [`on_tick`](Self::on_tick) for every tick of the armed replay timer.
/// All notifications go to the [`EventSink`].
pub struct RoundEngine<T, R, E> {
    session: GameSession,
    timer: T,
    symbols: R,
    events: E,
    active_timer: Option<TimerToken>,
}

impl<T: ReplayTimer, R: SymbolSource, E: EventSink> RoundEngine<T, R, E> {
    pub fn new(timer: T, symbols: R, events: E) -> Self {
        Self {
            session: GameSession::new(),
            timer,
            symbols,
            events,
            active_timer: None,
        }
    }

    /// Discard the current session, whatever its phase, and begin level 1.
    pub fn start(&mut self) {
        self.stop_timer();
        self.session.reset();
        info!("game started");
        self.events.emit(GameEvent::GameStarted);
        self.begin_level();
    }

    pub fn apply(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::Start => self.start(),
            PlayerAction::Press(symbol) => {
                self.press(symbol);
            }
        }
    }

    /// Check a button press against the sequence.
    pub fn press(&mut self, symbol: Symbol) -> PressOutcome {
        let Some(expected) = self.session.expected_symbol() else {
            trace!(%symbol, phase = ?self.session.phase(), "press ignored");
            return PressOutcome::Ignored;
        };

        if symbol != expected {
            self.end_game();
            return PressOutcome::Mismatch;
        }

        self.session.advance_input();
        let progress = self.session.progress_percent();
        self.events.emit(GameEvent::ProgressUpdate(progress));

        let outcome = if self.session.input_complete() {
            self.begin_level();
            PressOutcome::LevelComplete {
                next_level: self.session.level(),
            }
        } else {
            PressOutcome::Matched { progress }
        };
        self.session.debug_check();
        outcome
    }

    /// Handle one tick of the replay timer armed with `token`.
    pub fn on_tick(&mut self, token: TimerToken) {
        if self.session.phase() != Phase::Replaying || self.active_timer != Some(token) {
            trace!(token = token.id(), "stale replay tick");
            return;
        }

        match self.session.next_flash() {
            Some(symbol) => {
                trace!(%symbol, cursor = self.session.replay_cursor(), "flash");
                self.events.emit(GameEvent::FlashSymbol(symbol));
            }
            None => {
                self.stop_timer();
                self.session.set_phase(Phase::AwaitingInput);
                self.events.emit(GameEvent::ProgressReset);
                self.events.emit(GameEvent::ButtonsEnabled);
                debug!(level = self.session.level(), "replay finished, awaiting input");
            }
        }
        self.session.debug_check();
    }

    fn begin_level(&mut self) {
        let symbol = self.symbols.next_symbol();
        self.session.push_level(symbol);
        self.events.emit(GameEvent::ButtonsDisabled);

        let level = self.session.level();
        let interval = flash_interval(level);
        self.stop_timer();
        self.active_timer = Some(self.timer.start(interval));
        debug!(
            level,
            interval_ms = interval.as_millis() as u64,
            "level begins"
        );
        self.session.debug_check();
    }

    fn end_game(&mut self) {
        self.session.set_phase(Phase::Ended);
        self.stop_timer();
        info!(
            level = self.session.level(),
            levels_completed = self.session.levels_completed(),
            "game ended"
        );
        self.events.emit(GameEvent::GameEnded);
        self.events.emit(GameEvent::ButtonsDisabled);
        self.events.emit(GameEvent::ProgressReset);
    }

    fn stop_timer(&mut self) {
        if let Some(token) = self.active_timer.take() {
            self.timer.stop(token);
        }
    }
}

impl<T, R, E> RoundEngine<T, R, E> {
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn level(&self) -> u32 {
        self.session.level()
    }

    pub fn sequence(&self) -> &[Symbol] {
        self.session.sequence()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Token of the armed replay timer, if replay is running.
    pub fn active_timer(&self) -> Option<TimerToken> {
        self.active_timer
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    pub fn into_parts(self) -> (T, R, E) {
        (self.timer, self.symbols, self.events)
    }
}
