//! Wall-clock host for a [`RoundEngine`].
//!
//! A single worker thread owns the engine. Player actions, replay ticks and the stop
//! signal all arrive through one `select!`, so every stimulus runs to completion before
//! the next is looked at.

use std::thread;
use std::time::Instant;

use crossbeam_channel::{bounded, never, select, tick, unbounded, Receiver, Sender};
use simon_rt::{ChannelTimer, Symbol, SymbolSource, TimerCommand, TimerToken};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::engine::{PlayerAction, RoundEngine};
use crate::events::GameEvent;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("failed to spawn engine worker: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("engine worker is not running")]
    Disconnected,
}

pub struct GameRuntime {
    action_tx: Sender<PlayerAction>,
    events: Receiver<GameEvent>,
    stop_tx: Sender<()>,
    worker: Option<thread::JoinHandle<()>>,
}

impl GameRuntime {
    /// Spawn a worker whose symbols come from the configured seed.
    pub fn spawn(config: &EngineConfig) -> Result<Self, RuntimeError> {
        Self::spawn_with(config, config.symbol_source())
    }

    pub fn spawn_with<R>(config: &EngineConfig, symbols: R) -> Result<Self, RuntimeError>
    where
        R: SymbolSource + Send + 'static,
    {
        let (action_tx, action_rx) = bounded(config.action_queue_capacity.max(1));
        let (event_tx, event_rx) = match config.event_queue_capacity {
            0 => unbounded(),
            capacity => bounded(capacity),
        };
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let worker = thread::Builder::new()
            .name("simon-round-engine".into())
            .spawn(move || {
                let (timer, timer_rx) = ChannelTimer::pair();
                let engine = RoundEngine::new(timer, symbols, event_tx);
                run_worker(engine, timer_rx, action_rx, stop_rx);
            })?;

        Ok(Self {
            action_tx,
            events: event_rx,
            stop_tx,
            worker: Some(worker),
        })
    }

    pub fn send(&self, action: PlayerAction) -> Result<(), RuntimeError> {
        self.action_tx
            .send(action)
            .map_err(|_| RuntimeError::Disconnected)
    }

    pub fn start(&self) -> Result<(), RuntimeError> {
        self.send(PlayerAction::Start)
    }

    pub fn press(&self, symbol: Symbol) -> Result<(), RuntimeError> {
        self.send(PlayerAction::Press(symbol))
    }

    /// Notifications emitted by the engine, in order.
    pub fn events(&self) -> &Receiver<GameEvent> {
        &self.events
    }

    pub fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.stop_tx.send(());
            if worker.join().is_err() {
                warn!("engine worker panicked");
            }
        }
    }
}

impl Drop for GameRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker<R: SymbolSource>(
    mut engine: RoundEngine<ChannelTimer, R, Sender<GameEvent>>,
    timer_rx: Receiver<TimerCommand>,
    action_rx: Receiver<PlayerAction>,
    stop_rx: Receiver<()>,
) {
    let mut ticker: Option<(TimerToken, Receiver<Instant>)> = None;

    loop {
        // Apply whatever the previous stimulus did to the replay timer.
        for command in timer_rx.try_iter() {
            match command {
                TimerCommand::Start { token, interval } => {
                    ticker = Some((token, tick(interval)));
                }
                TimerCommand::Stop { token } => {
                    if ticker.as_ref().map_or(false, |(armed, _)| *armed == token) {
                        ticker = None;
                    }
                }
            }
        }

        let tick_rx = match &ticker {
            Some((_, rx)) => rx.clone(),
            None => never(),
        };

        select! {
            recv(stop_rx) -> _ => break,
            recv(action_rx) -> action => match action {
                Ok(action) => engine.apply(action),
                Err(_) => break,
            },
            recv(tick_rx) -> _ => {
                if let Some((token, _)) = &ticker {
                    engine.on_tick(*token);
                }
            }
        }
    }

    debug!(level = engine.level(), "engine worker exiting");
}
