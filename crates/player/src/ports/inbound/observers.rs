//! Callbacks the notification bus delivers to.
//!
//! Observers are registered by `Arc`; the same `Arc` must be passed back to
//! unsubscribe. Plain closures implement both traits.

use serde::{Deserialize, Serialize};
use underworld_domain::StateDelta;

/// Server message used when the player character has died.
pub const PLAYER_IS_DEAD: &str = "PlayerIsDeadError";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No game selected or no credential; nothing was sent.
    MissingSession,
    /// The server rejected the action.
    Domain,
}

/// A user-facing error notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSignal {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorSignal {
    pub fn missing_session(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::MissingSession,
            message: message.into(),
        }
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Domain,
            message: message.into(),
        }
    }

    /// True when the server reported the player character as dead.
    ///
    /// Consumers usually escalate this one to a blocking notice.
    pub fn is_player_dead(&self) -> bool {
        self.code == ErrorCode::Domain && self.message.trim() == PLAYER_IS_DEAD
    }
}

pub trait StateObserver: Send + Sync {
    fn on_state_delta(&self, delta: &StateDelta);
}

impl<F> StateObserver for F
where
    F: Fn(&StateDelta) + Send + Sync,
{
    fn on_state_delta(&self, delta: &StateDelta) {
        self(delta)
    }
}

pub trait ErrorObserver: Send + Sync {
    fn on_error(&self, signal: &ErrorSignal);
}

impl<F> ErrorObserver for F
where
    F: Fn(&ErrorSignal) + Send + Sync,
{
    fn on_error(&self, signal: &ErrorSignal) {
        self(signal)
    }
}
