//! Debounced query scheduling.
//!
//! Every push restarts the quiescence window. A value is emitted on the
//! settled channel only if nothing else was pushed before its window ran out.

use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::generation::Generation;

pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DebounceState {
    #[default]
    Idle,
    Pending(String),
    Settled(String),
}

#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    generation: Generation,
    state: Arc<Mutex<DebounceState>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    settled_tx: mpsc::UnboundedSender<String>,
}

impl Debouncer {
    pub fn new(window: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            window,
            generation: Generation::new(),
            state: Arc::new(Mutex::new(DebounceState::Idle)),
            timer: Mutex::new(None),
            settled_tx,
        };
        (debouncer, settled_rx)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn state(&self) -> DebounceState {
        self.state.lock().clone()
    }

    /// Record a raw input change. Must be called from within a tokio runtime.
    pub fn push(&self, raw: impl Into<String>) {
        let raw = raw.into();
        let token = self.generation.advance();
        *self.state.lock() = DebounceState::Pending(raw.clone());

        let window = self.window;
        let state = Arc::clone(&self.state);
        let tx = self.settled_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(window).await;

            let mut state = state.lock();
            if !token.is_current() {
                return;
            }
            *state = DebounceState::Settled(raw.clone());
            drop(state);

            if tx.send(raw).is_err() {
                tracing::debug!("settled query dropped, no consumer");
            }
        });

        if let Some(previous) = self.timer.lock().replace(task) {
            previous.abort();
        }
    }

    /// Drop any pending value without emitting it.
    pub fn cancel(&self) {
        self.generation.invalidate();
        if let Some(timer) = self.timer.lock().take() {
            timer.abort();
        }

        let mut state = self.state.lock();
        if matches!(*state, DebounceState::Pending(_)) {
            *state = DebounceState::Idle;
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.get_mut().take() {
            timer.abort();
        }
    }
}
