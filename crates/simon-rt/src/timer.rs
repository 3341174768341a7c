//! Repeating replay timers.
//!
//! The round engine never sleeps or reads a clock itself. It arms a [`ReplayTimer`] and the
//! host delivers each tick back to it together with the [`TimerToken`] the timer was armed
//! with. [`ManualTimer`] drives ticks by hand for tests and simulations; [`ChannelTimer`]
//! forwards the requests to a host loop that owns a real ticker.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

/// Identity of one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Minimal "repeat at interval, cancelable" scheduler.
pub trait ReplayTimer {
    /// Arm a repeating timer. Any previously armed timer is replaced.
    fn start(&mut self, interval: Duration) -> TimerToken;

    /// Disarm the timer identified by `token`. Stale tokens are ignored.
    fn stop(&mut self, token: TimerToken);
}

impl<T: ReplayTimer + ?Sized> ReplayTimer for Box<T> {
    fn start(&mut self, interval: Duration) -> TimerToken {
        (**self).start(interval)
    }

    fn stop(&mut self, token: TimerToken) {
        (**self).stop(token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start { token: TimerToken, interval: Duration },
    Stop { token: TimerToken },
}

/// Timer that forwards start/stop requests to whoever owns the receiving end.
#[derive(Debug)]
pub struct ChannelTimer {
    next_token: u64,
    tx: Sender<TimerCommand>,
}

impl ChannelTimer {
    pub fn new(tx: Sender<TimerCommand>) -> Self {
        Self { next_token: 0, tx }
    }

    /// Create a timer together with the receiver its commands arrive on.
    pub fn pair() -> (Self, Receiver<TimerCommand>) {
        let (tx, rx) = unbounded();
        (Self::new(tx), rx)
    }

    fn send(&self, command: TimerCommand) {
        if self.tx.send(command).is_err() {
            tracing::trace!(?command, "timer host gone, dropping command");
        }
    }
}

impl ReplayTimer for ChannelTimer {
    fn start(&mut self, interval: Duration) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.send(TimerCommand::Start { token, interval });
        token
    }

    fn stop(&mut self, token: TimerToken) {
        self.send(TimerCommand::Stop { token });
    }
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    token: TimerToken,
    interval: Duration,
    next_due: Duration,
}

#[derive(Debug, Default)]
struct ManualState {
    now: Duration,
    next_token: u64,
    armed: Option<Armed>,
    started: u64,
}

/// Deterministic fake clock. Clones share the same state, so a test keeps one handle
/// while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    inner: Arc<Mutex<ManualState>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed fake time.
    pub fn now(&self) -> Duration {
        self.inner.lock().now
    }

    pub fn is_armed(&self) -> bool {
        self.inner.lock().armed.is_some()
    }

    /// Interval of the currently armed timer, if any.
    pub fn armed_interval(&self) -> Option<Duration> {
        self.inner.lock().armed.map(|armed| armed.interval)
    }

    /// Total number of times a timer has been armed.
    pub fn starts(&self) -> u64 {
        self.inner.lock().started
    }

    /// Jump to the next due tick and return the token it fires for.
    pub fn next_tick(&self) -> Option<TimerToken> {
        let mut state = self.inner.lock();
        let armed = state.armed.as_mut()?;
        let token = armed.token;
        let due = armed.next_due;
        armed.next_due += armed.interval;
        state.now = due;
        Some(token)
    }

    /// Move the clock forward by `by`, returning every tick that fell due, in order.
    pub fn advance(&self, by: Duration) -> Vec<TimerToken> {
        let mut state = self.inner.lock();
        let target = state.now + by;
        let mut fired = Vec::new();
        if let Some(armed) = state.armed.as_mut() {
            while armed.next_due <= target {
                fired.push(armed.token);
                armed.next_due += armed.interval;
            }
        }
        state.now = target;
        fired
    }
}

impl ReplayTimer for ManualTimer {
    fn start(&mut self, interval: Duration) -> TimerToken {
        assert!(!interval.is_zero(), "replay interval must be non-zero");
        let mut state = self.inner.lock();
        state.next_token += 1;
        state.started += 1;
        let token = TimerToken(state.next_token);
        let next_due = state.now + interval;
        state.armed = Some(Armed {
            token,
            interval,
            next_due,
        });
        token
    }

    fn stop(&mut self, token: TimerToken) {
        let mut state = self.inner.lock();
        if state.armed.map_or(false, |armed| armed.token == token) {
            state.armed = None;
        }
    }
}
