//! Per-game state: the growing sequence and the two cursors walking it.

use serde::{Deserialize, Serialize};
use simon_rt::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    /// The sequence is being flashed back to the player.
    Replaying,
    /// Buttons are live and presses are checked against the sequence.
    AwaitingInput,
    /// The player missed. Only a fresh start leaves this phase.
    Ended,
}

impl Phase {
    /// Whether a round is underway.
    pub fn in_round(self) -> bool {
        matches!(self, Phase::Replaying | Phase::AwaitingInput)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSession {
    level: u32,
    sequence: Vec<Symbol>,
    replay_cursor: usize,
    input_cursor: usize,
    phase: Phase,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn sequence(&self) -> &[Symbol] {
        &self.sequence
    }

    pub fn replay_cursor(&self) -> usize {
        self.replay_cursor
    }

    pub fn input_cursor(&self) -> usize {
        self.input_cursor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Levels the player fully reproduced in this game.
    pub fn levels_completed(&self) -> u32 {
        self.level.saturating_sub(1)
    }

    /// Symbol the player has to press next, while input is being accepted.
    pub fn expected_symbol(&self) -> Option<Symbol> {
        match self.phase {
            Phase::AwaitingInput => self.sequence.get(self.input_cursor).copied(),
            _ => None,
        }
    }

    /// Share of the sequence reproduced so far, rounded to a whole percent.
    ///
    /// Only a complete reproduction reports 100.
    pub fn progress_percent(&self) -> u8 {
        let level = self.level as usize;
        if level == 0 {
            return 0;
        }
        if self.input_cursor >= level {
            return 100;
        }
        let rounded = (self.input_cursor * 100 + level / 2) / level;
        rounded.min(99) as u8
    }

    /// Drop everything and return to level 0.
    pub(crate) fn reset(&mut self) {
        self.level = 0;
        self.sequence.clear();
        self.replay_cursor = 0;
        self.input_cursor = 0;
        self.phase = Phase::Idle;
    }

    /// Grow the sequence by one symbol and rewind both cursors.
    pub(crate) fn push_level(&mut self, symbol: Symbol) {
        self.level += 1;
        self.sequence.push(symbol);
        self.replay_cursor = 0;
        self.input_cursor = 0;
        self.phase = Phase::Replaying;
    }

    /// Next symbol to flash, advancing the replay cursor.
    pub(crate) fn next_flash(&mut self) -> Option<Symbol> {
        if self.replay_cursor >= self.level as usize {
            return None;
        }
        let symbol = self.sequence.get(self.replay_cursor).copied()?;
        self.replay_cursor += 1;
        Some(symbol)
    }

    pub(crate) fn advance_input(&mut self) {
        self.input_cursor += 1;
    }

    pub(crate) fn input_complete(&self) -> bool {
        self.input_cursor == self.level as usize
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn debug_check(&self) {
        let level = self.level as usize;
        if self.phase.in_round() {
            debug_assert_eq!(self.sequence.len(), level, "sequence length drifted from level");
        }
        debug_assert!(self.input_cursor <= level, "input cursor past level");
        debug_assert!(self.replay_cursor <= level, "replay cursor past level");
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            level: self.level,
            sequence: self.sequence.clone(),
            replay_cursor: self.replay_cursor,
            input_cursor: self.input_cursor,
            phase: self.phase,
            levels_completed: self.levels_completed(),
        }
    }
}

/// Serialisable copy of a session for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub level: u32,
    pub sequence: Vec<Symbol>,
    pub replay_cursor: usize,
    pub input_cursor: usize,
    pub phase: Phase,
    pub levels_completed: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_at(level: u32, input_cursor: usize) -> GameSession {
        let mut session = GameSession::new();
        for _ in 0..level {
            session.push_level(Symbol::A);
        }
        session.set_phase(Phase::AwaitingInput);
        for _ in 0..input_cursor {
            session.advance_input();
        }
        session
    }

    #[test]
    fn progress_rounds_to_nearest_percent() {
        assert_eq!(session_at(3, 0).progress_percent(), 0);
        assert_eq!(session_at(3, 1).progress_percent(), 33);
        assert_eq!(session_at(3, 2).progress_percent(), 67);
        assert_eq!(session_at(8, 1).progress_percent(), 13);
        assert_eq!(session_at(3, 3).progress_percent(), 100);
    }

    #[test]
    fn progress_never_reports_full_early() {
        assert_eq!(session_at(250, 249).progress_percent(), 99);
    }

    #[test]
    fn idle_session_has_no_progress() {
        let session = GameSession::new();
        assert_eq!(session.progress_percent(), 0);
        assert_eq!(session.levels_completed(), 0);
        assert_eq!(session.expected_symbol(), None);
    }

    #[test]
    fn replay_cursor_stops_at_level() {
        let mut session = GameSession::new();
        session.push_level(Symbol::B);
        session.push_level(Symbol::A);
        assert_eq!(session.next_flash(), Some(Symbol::B));
        assert_eq!(session.next_flash(), Some(Symbol::A));
        assert_eq!(session.next_flash(), None);
        assert_eq!(session.replay_cursor(), 2);
    }

    #[test]
    fn snapshot_serialises_phase_names() {
        let snapshot = session_at(2, 1).snapshot();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["phase"], "awaiting_input");
        assert_eq!(json["sequence"], serde_json::json!(["a", "a"]));
        assert_eq!(json["levels_completed"], 1);
    }
}
