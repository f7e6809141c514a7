//! Render sessions and the generation counter that identifies them
//!
//! Every document load opens a new session. Restore retries carry the token of
//! the session that scheduled them and are dropped once that session is closed
//! or superseded.

use crate::{Entry, ScrollGeometry};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generation number of one document load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(u64);

impl SessionToken {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Shared source of session tokens. Cloning yields a handle to the same clock.
///
/// The low bit marks the current session as closed (view torn down) without
/// starting a new generation.
#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    state: Arc<AtomicU64>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersede the current session and return the token of a fresh one.
    pub fn begin(&self) -> SessionToken {
        let prev = self
            .state
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| Some(((v >> 1) + 1) << 1))
            .unwrap_or_else(|v| v);
        SessionToken((prev >> 1) + 1)
    }

    /// Close the current session without starting a new one.
    pub fn invalidate(&self) {
        self.state.fetch_or(1, Ordering::SeqCst);
    }

    /// True while `token` is the open, most recent session.
    pub fn is_current(&self, token: SessionToken) -> bool {
        self.state.load(Ordering::SeqCst) == token.0 << 1
    }
}

/// State of one document load
#[derive(Debug, Clone)]
pub struct RenderSession {
    pub token: SessionToken,
    pub entry: Entry,
    /// Last geometry reported by the surface
    pub geometry: ScrollGeometry,
    /// False while the user is actively scrolling
    pub settled: bool,
    /// Set once the surface reports load-finished
    pub loaded: bool,
}

impl RenderSession {
    pub fn new(token: SessionToken, entry: Entry) -> Self {
        Self {
            token,
            entry,
            geometry: ScrollGeometry::default(),
            settled: true,
            loaded: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_supersedes_old_one() {
        let clock = SessionClock::new();
        let first = clock.begin();
        assert!(clock.is_current(first));
        let second = clock.begin();
        assert!(!clock.is_current(first));
        assert!(clock.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn invalidate_leaves_no_current_session() {
        let clock = SessionClock::new();
        let shared = clock.clone();
        let t = clock.begin();
        shared.invalidate();
        assert!(!clock.is_current(t));
        let next = clock.begin();
        assert!(!clock.is_current(t));
        assert!(clock.is_current(next));
        assert_eq!(next.generation(), t.generation() + 1);
    }
}
