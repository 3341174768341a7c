//! Button identities and the pluggable sources that draw them.

use std::fmt;
use std::str::FromStr;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// One of the two buttons a player can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    A,
    B,
}

impl Symbol {
    pub const ALL: [Symbol; 2] = [Symbol::A, Symbol::B];

    /// The opposite button.
    #[inline]
    pub fn other(self) -> Symbol {
        match self {
            Symbol::A => Symbol::B,
            Symbol::B => Symbol::A,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Symbol::A => "A",
            Symbol::B => "B",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown symbol `{0}` (expected `a` or `b`)")]
pub struct ParseSymbolError(String);

impl FromStr for Symbol {
    type Err = ParseSymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "1" => Ok(Symbol::A),
            "b" | "2" => Ok(Symbol::B),
            other => Err(ParseSymbolError(other.to_owned())),
        }
    }
}

/// Supplies the symbol appended to the sequence at the start of each level.
pub trait SymbolSource {
    fn next_symbol(&mut self) -> Symbol;
}

impl<S: SymbolSource + ?Sized> SymbolSource for Box<S> {
    fn next_symbol(&mut self) -> Symbol {
        (**self).next_symbol()
    }
}

/// Uniform 50/50 draws from a seedable generator.
#[derive(Debug, Clone)]
pub struct SeededSymbols {
    rng: StdRng,
}

impl SeededSymbols {
    /// Reproducible source: the same seed always yields the same symbols.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl SymbolSource for SeededSymbols {
    fn next_symbol(&mut self) -> Symbol {
        if self.rng.gen_bool(0.5) {
            Symbol::A
        } else {
            Symbol::B
        }
    }
}

/// Replays a fixed script, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ScriptedSymbols {
    script: Vec<Symbol>,
    cursor: usize,
}

impl ScriptedSymbols {
    pub fn new<I: IntoIterator<Item = Symbol>>(script: I) -> Self {
        let script: Vec<Symbol> = script.into_iter().collect();
        assert!(!script.is_empty(), "symbol script must not be empty");
        Self { script, cursor: 0 }
    }

    /// Number of symbols handed out so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl SymbolSource for ScriptedSymbols {
    fn next_symbol(&mut self) -> Symbol {
        let symbol = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        symbol
    }
}
