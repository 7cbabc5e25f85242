use tactoken_common::games::tictactoe::{GameBroadcaster, StateUpdate};
use tokio::sync::mpsc;

/// Forwards session updates to the terminal loop.
#[derive(Clone)]
pub struct TerminalBroadcaster {
    update_tx: mpsc::UnboundedSender<StateUpdate>,
}

impl TerminalBroadcaster {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StateUpdate>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (Self { update_tx }, update_rx)
    }
}

impl GameBroadcaster for TerminalBroadcaster {
    fn broadcast_state(&self, update: &StateUpdate) {
        // Receiver is gone only during shutdown.
        let _ = self.update_tx.send(update.clone());
    }
}
