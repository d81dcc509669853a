//! Responses from the game and character setup endpoints.

use serde::{Deserialize, Serialize};

use crate::ids::{GameId, PlayerCharacterId};
use crate::snapshot::PerformAction;

/// A freshly generated game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedGame {
    pub game_id: GameId,
    /// Actions available in the new game's first room.
    #[serde(default)]
    pub actions: Vec<PerformAction>,
}

/// A freshly generated player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPlayerCharacter {
    pub player_character_id: PlayerCharacterId,
    /// Whether the server already made it the current character.
    #[serde(default)]
    pub set_as_current: bool,
}
