use std::sync::{Arc, Mutex};

use super::game_state::GameState;
use super::types::{GameStatus, SessionPhase};

/// Everything a front-end needs to redraw after a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateUpdate {
    pub phase: SessionPhase,
    pub status: GameStatus,
    pub state: GameState,
    /// Rating written by the terminal transition that produced this update.
    pub rating: Option<i64>,
}

pub trait GameBroadcaster: Send {
    fn broadcast_state(&self, update: &StateUpdate);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBroadcaster;

impl GameBroadcaster for NoopBroadcaster {
    fn broadcast_state(&self, _update: &StateUpdate) {}
}

/// Keeps every update, for front-ends that poll and for tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingBroadcaster {
    updates: Arc<Mutex<Vec<StateUpdate>>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<StateUpdate> {
        self.updates
            .lock()
            .map(|updates| updates.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<StateUpdate> {
        self.updates
            .lock()
            .ok()
            .and_then(|updates| updates.last().cloned())
    }
}

impl GameBroadcaster for RecordingBroadcaster {
    fn broadcast_state(&self, update: &StateUpdate) {
        if let Ok(mut updates) = self.updates.lock() {
            updates.push(update.clone());
        }
    }
}
