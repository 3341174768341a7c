use serde::{Deserialize, Serialize};
use simon_rt::SeededSymbols;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed seed for reproducible sequences. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Bound on player actions waiting for the runtime worker.
    pub action_queue_capacity: usize,
    /// Bound on undelivered notifications; 0 means unbounded.
    pub event_queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            action_queue_capacity: 64,
            event_queue_capacity: 0,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_action_queue_capacity(mut self, capacity: usize) -> Self {
        self.action_queue_capacity = capacity;
        self
    }

    pub fn with_event_queue_capacity(mut self, capacity: usize) -> Self {
        self.event_queue_capacity = capacity;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Symbol source matching the configured seed.
    pub fn symbol_source(&self) -> SeededSymbols {
        match self.seed {
            Some(seed) => SeededSymbols::new(seed),
            None => SeededSymbols::from_entropy(),
        }
    }
}
