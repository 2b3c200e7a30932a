//! Monotonic generation counters for discarding superseded async work.
//!
//! Each unit of work takes a [`Token`] when it starts. Starting newer work
//! advances the counter, after which every older token reports stale.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Clone, Default)]
pub struct Generation {
    current: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
pub struct Token {
    id: u64,
    current: Arc<AtomicU64>,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding every token handed out before.
    pub fn advance(&self) -> Token {
        let id = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        Token { id, current: Arc::clone(&self.current) }
    }

    /// Supersede outstanding tokens without starting new work.
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }
}

impl Token {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.id
    }
}
