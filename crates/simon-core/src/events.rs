//! Notifications for the presentation layer.

use crossbeam_channel::{Sender, TrySendError};
use serde::{Deserialize, Serialize};
use simon_rt::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted,
    /// The player missed; show the end-of-game state.
    GameEnded,
    ButtonsEnabled,
    ButtonsDisabled,
    /// Momentarily highlight a button during replay.
    FlashSymbol(Symbol),
    /// Progress indicator value in percent.
    ProgressUpdate(u8),
    ProgressReset,
}

/// Receiver of engine notifications. Delivery is fire-and-forget.
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl EventSink for Sender<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        match self.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(?event, "event queue full, dropping notification");
            }
            Err(TrySendError::Disconnected(event)) => {
                tracing::trace!(?event, "event receiver dropped");
            }
        }
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: GameEvent) {
        (**self).emit(event);
    }
}

/// Sink that discards everything, for hosts that only poll engine state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}
