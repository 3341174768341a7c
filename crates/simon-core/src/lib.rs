//! Simon Core
//! ==========
//! The round/sequence state machine of a two-button memory game. The engine grows a
//! random sequence one symbol per level, replays it on a speed curve that tightens with
//! every level, and checks the player's presses against it. It has no rendering, audio or
//! clock of its own; hosts drive it with actions and replay ticks and render the
//! [`GameEvent`]s it emits.

mod config;
pub mod engine;
pub mod events;
pub mod runtime;
pub mod session;
pub mod speed;

pub use config::EngineConfig;
pub use engine::{PlayerAction, PressOutcome, RoundEngine};
pub use events::{EventSink, GameEvent, NullSink};
pub use runtime::{GameRuntime, RuntimeError};
pub use session::{GameSession, Phase, SessionSnapshot};
pub use speed::{flash_interval, BASE_INTERVAL_MS, FLOOR_INTERVAL_MS, STEP_MS};

pub use simon_rt::{
    ManualTimer, ReplayTimer, ScriptedSymbols, SeededSymbols, Symbol, SymbolSource, TimerToken,
};
