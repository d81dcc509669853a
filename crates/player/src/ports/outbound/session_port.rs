//! Access to the externally owned session.

use underworld_domain::{Credential, GameId, Session};

/// Source of the current game id and credential.
///
/// Read once per dispatch; the action and its follow-ups all use that one
/// snapshot. Only game setup writes to it.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SessionPort: Send + Sync {
    fn current(&self) -> Session;
    fn set_game_id(&self, game_id: GameId);
    fn clear_game_id(&self);
    fn set_credential(&self, credential: Credential);
}
