//! Session context: which game is selected and who is playing it.
//!
//! The session is owned by an external collaborator (local storage, a login
//! flow); this layer only reads it. Both fields must be present before any
//! action may reach the network.

use std::fmt;

use thiserror::Error;

use crate::ids::GameId;

/// API token identifying the player to the game server.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Snapshot of the session values as the session collaborator holds them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub game_id: Option<GameId>,
    pub credential: Option<Credential>,
}

impl Session {
    pub fn new(game_id: impl Into<GameId>, credential: Credential) -> Self {
        Self {
            game_id: Some(game_id.into()),
            credential: Some(credential),
        }
    }

    /// The credential alone, for calls made before a game is selected.
    pub fn require_credential(&self) -> Result<Credential, MissingSessionError> {
        self.credential
            .clone()
            .ok_or(MissingSessionError::Credential)
    }

    /// Check that both values are set and return them together.
    pub fn require(&self) -> Result<SessionKeys, MissingSessionError> {
        match (&self.game_id, &self.credential) {
            (Some(game_id), Some(credential)) => Ok(SessionKeys {
                game_id: game_id.clone(),
                credential: credential.clone(),
            }),
            (None, Some(_)) => Err(MissingSessionError::GameId),
            (Some(_), None) => Err(MissingSessionError::Credential),
            (None, None) => Err(MissingSessionError::Both),
        }
    }
}

/// A session that passed [`Session::require`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    pub game_id: GameId,
    pub credential: Credential,
}

/// Raised before any network call when the session is incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MissingSessionError {
    #[error("Missing required parameters: game id")]
    GameId,
    #[error("Missing required parameters: credential")]
    Credential,
    #[error("Missing required parameters: game id and credential")]
    Both,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_session_yields_keys() {
        let session = Session::new("g1", Credential::new("token"));
        let keys = session.require().unwrap();

        assert_eq!(keys.game_id.as_str(), "g1");
        assert_eq!(keys.credential.expose(), "token");
    }

    #[test]
    fn reports_which_value_is_missing() {
        let no_game = Session {
            game_id: None,
            credential: Some(Credential::new("token")),
        };
        assert_eq!(no_game.require(), Err(MissingSessionError::GameId));

        let no_token = Session {
            game_id: Some(GameId::new("g1")),
            credential: None,
        };
        assert_eq!(no_token.require(), Err(MissingSessionError::Credential));

        assert_eq!(Session::default().require(), Err(MissingSessionError::Both));
    }

    #[test]
    fn credential_is_enough_without_a_game() {
        let session = Session {
            game_id: None,
            credential: Some(Credential::new("token")),
        };
        assert_eq!(session.require_credential(), Ok(Credential::new("token")));
        assert_eq!(
            Session::default().require_credential(),
            Err(MissingSessionError::Credential)
        );
    }

    #[test]
    fn credential_debug_is_redacted() {
        let rendered = format!("{:?}", Credential::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
