//! Action errors and their translation into user-facing signals.

use underworld_domain::MissingSessionError;

use crate::application::gateway::GatewayError;
use crate::infrastructure::messaging::NotificationBus;
use crate::ports::inbound::{ErrorSignal, PLAYER_IS_DEAD};
use crate::ports::outbound::TransportError;

/// The error a dispatch call resolves to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// Session incomplete; nothing was sent.
    #[error(transparent)]
    MissingSession(#[from] MissingSessionError),

    /// The server rejected the action; `message` is what it said, verbatim.
    #[error("{message}")]
    Domain {
        message: String,
        status: Option<u16>,
    },

    /// A failure with no message worth showing the player.
    #[error(transparent)]
    Transport(TransportError),
}

impl ActionError {
    pub fn is_player_dead(&self) -> bool {
        matches!(
            self,
            ActionError::Domain { message, .. } if message.trim() == PLAYER_IS_DEAD
        )
    }
}

/// Map a gateway failure to the signal to publish, if any, and the error to
/// return to the caller.
///
/// Missing-session errors, plain server messages and rejected responses
/// produce exactly one signal, whatever the message holds. Connection
/// failures and bodies that could not be read or decoded produce none and
/// are handed back as [`ActionError::Transport`].
pub fn classify(error: GatewayError) -> (Option<ErrorSignal>, ActionError) {
    match error {
        GatewayError::MissingSession(missing) => (
            Some(ErrorSignal::missing_session(missing.to_string())),
            ActionError::MissingSession(missing),
        ),
        GatewayError::Transport(TransportError::Message(message)) => (
            Some(ErrorSignal::domain(message.clone())),
            ActionError::Domain {
                message,
                status: None,
            },
        ),
        GatewayError::Transport(TransportError::Response { status, body }) => (
            Some(ErrorSignal::domain(body.clone())),
            ActionError::Domain {
                message: body,
                status: Some(status),
            },
        ),
        GatewayError::Transport(
            other @ (TransportError::Network(_) | TransportError::Decode(_)),
        ) => (None, ActionError::Transport(other)),
    }
}

/// Publishes classified failures on the error channel.
#[derive(Clone)]
pub struct ErrorTranslator {
    bus: NotificationBus,
}

impl ErrorTranslator {
    pub fn new(bus: NotificationBus) -> Self {
        Self { bus }
    }

    /// Publish at most one signal for `error` and return what the caller sees.
    pub fn translate(&self, error: GatewayError) -> ActionError {
        let (signal, action_error) = classify(error);
        match signal {
            Some(signal) => {
                tracing::debug!(code = ?signal.code, "Publishing action error");
                self.bus.publish_error(&signal);
            }
            None => {
                tracing::warn!(error = %action_error, "Unclassified action failure");
            }
        }
        action_error
    }
}
