//! Timing and randomness primitives shared by the Simon round engine and its hosts.

pub mod symbol;
pub mod timer;

pub use symbol::{ParseSymbolError, ScriptedSymbols, SeededSymbols, Symbol, SymbolSource};
pub use timer::{ChannelTimer, ManualTimer, ReplayTimer, TimerCommand, TimerToken};
