//! Per-session smoothing state for hosted deployments.
//!
//! Sessions are independent: the registry lock only guards the map, and a
//! session's state is taken out for the duration of a step so two frames for
//! the same session cannot interleave on one accumulator.

use std::collections::HashMap;

use parking_lot::RwLock;
use physique_core::{SessionId, SmoothingConfig};
use physique_vision::SmoothingState;
use tracing::{debug, info, warn};

/// Smoothing accumulators keyed by session
pub struct SessionRegistry {
    config: SmoothingConfig,
    sessions: RwLock<HashMap<SessionId, SmoothingState>>,
}

impl SessionRegistry {
    pub fn new(config: SmoothingConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a session with fresh accumulators
    pub fn create(&self) -> SessionId {
        let id = SessionId::new();
        self.sessions.write().insert(id, SmoothingState::new(self.config.clone()));
        info!(session = ?id, "scan session created");
        id
    }

    /// Discard a session's accumulators, e.g. on template switch
    ///
    /// Returns false for unknown sessions.
    pub fn reset(&self, id: SessionId) -> bool {
        let mut sessions = self.sessions.write();
        match sessions.get_mut(&id) {
            Some(state) => {
                state.reset();
                debug!(session = ?id, "scan session reset");
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: SessionId) -> Option<SmoothingState> {
        let removed = self.sessions.write().remove(&id);
        if removed.is_some() {
            debug!(session = ?id, "scan session removed");
        }
        removed
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Run `f` on the session's state and store the state it returns
    ///
    /// The state is removed while `f` runs, so a concurrent call for the same
    /// session sees it as absent and returns `None` instead of racing.
    pub fn with_state<R>(
        &self,
        id: SessionId,
        f: impl FnOnce(SmoothingState) -> (SmoothingState, R),
    ) -> Option<R> {
        let Some(state) = self.sessions.write().remove(&id) else {
            warn!(session = ?id, "no scan state available for session");
            return None;
        };
        let (next, out) = f(state);
        self.sessions.write().insert(id, next);
        Some(out)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(SmoothingConfig::default())
    }
}
