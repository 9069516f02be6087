//! Connection lifecycle tracking for the echo client

use crate::error::{AppError, Result};
use crate::types::ConnectionState;

/// Records the state trail of one connection and rejects illegal moves
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    state: ConnectionState,
    trail: Vec<ConnectionState>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            trail: vec![ConnectionState::Disconnected],
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Every state visited so far, oldest first
    pub fn trail(&self) -> &[ConnectionState] {
        &self.trail
    }

    /// Whether `to` may follow `from`
    pub fn is_legal(from: ConnectionState, to: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (from, to),
            (Disconnected, Connected)
                | (Connected, Sent)
                | (Sent, Received)
                | (Received, Closed)
        ) || (to == Failed && !from.is_terminal())
    }

    /// Move to `to`, returning the previous state
    pub fn advance(&mut self, to: ConnectionState) -> Result<ConnectionState> {
        let from = self.state;
        if !Self::is_legal(from, to) {
            return Err(AppError::internal(format!(
                "illegal connection transition {} -> {}",
                from, to
            )));
        }
        self.state = to;
        self.trail.push(to);
        Ok(from)
    }

    /// Mark the connection failed; a no-op once terminal
    pub fn fail(&mut self) -> Option<ConnectionState> {
        self.advance(ConnectionState::Failed).ok()
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}
