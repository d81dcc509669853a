//! Game server boundary.
//!
//! One method per action endpoint, the three state reads used for
//! reconciliation, and the setup calls that pick a game and a character.
//! Adapters own the wire format; callers see only domain types and
//! [`TransportError`].

use async_trait::async_trait;
use serde_json::Value;
use underworld_domain::{
    AttackNpc, CastSpellOnNpc, CastSpellOnPlayer, Credential, ExitRoom, GameId, GeneratedGame,
    GeneratedPlayerCharacter, InspectFixture, InspectNpc, LookAtFixture, LookAtNpc, LootFixture,
    LootNpc, MovePlayerItem, OpenFixture, OpenFixtureHiddenCompartment, PerformAction,
    PlayerCharacter, PlayerCharacterId, ResponseEnvelope, Room, SellPlayerItem, SessionKeys,
    ThrowItemAtNpc, UseItemOnPlayer,
};

/// Failures raised by a [`GameApiPort`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The server rejected the call with a plain message.
    #[error("{0}")]
    Message(String),

    /// Non-success HTTP status; `body` is the response body read as text.
    #[error("Server responded with {status}: {body}")]
    Response { status: u16, body: String },

    /// The request never completed or its body could not be read.
    #[error("Request failed: {0}")]
    Network(String),

    /// A success response whose body did not match the expected shape.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn message(message: impl ToString) -> Self {
        Self::Message(message.to_string())
    }

    pub fn response(status: u16, body: impl ToString) -> Self {
        Self::Response {
            status,
            body: body.to_string(),
        }
    }

    pub fn network(message: impl ToString) -> Self {
        Self::Network(message.to_string())
    }

    pub fn decode(message: impl ToString) -> Self {
        Self::Decode(message.to_string())
    }
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait GameApiPort: Send + Sync {
    // Actions
    async fn attack_npc(
        &self,
        session: &SessionKeys,
        args: &AttackNpc,
    ) -> Result<ResponseEnvelope, TransportError>;
    async fn exit_room(
        &self,
        session: &SessionKeys,
        args: &ExitRoom,
    ) -> Result<ResponseEnvelope, TransportError>;
    async fn loot_npc(
        &self,
        session: &SessionKeys,
        args: &LootNpc,
    ) -> Result<ResponseEnvelope, TransportError>;
    async fn loot_fixture(
        &self,
        session: &SessionKeys,
        args: &LootFixture,
    ) -> Result<ResponseEnvelope, TransportError>;
    async fn cast_spell_on_player(
        &self,
        session: &SessionKeys,
        args: &CastSpellOnPlayer,
    ) -> Result<ResponseEnvelope, TransportError>;
    async fn cast_spell_on_npc(
        &self,
        session: &SessionKeys,
        args: &CastSpellOnNpc,
    ) -> Result<ResponseEnvelope, TransportError>;
    async fn use_item_on_player(
        &self,
        session: &SessionKeys,
        args: &UseItemOnPlayer,
    ) -> Result<ResponseEnvelope, TransportError>;
    async fn move_player_item(
        &self,
        session: &SessionKeys,
        args: &MovePlayerItem,
    ) -> Result<ResponseEnvelope, TransportError>;
    async fn inspect_fixture(
        &self,
        session: &SessionKeys,
        args: &InspectFixture,
    ) -> Result<ResponseEnvelope, TransportError>;
    async fn inspect_npc(
        &self,
        session: &SessionKeys,
        args: &InspectNpc,
    ) -> Result<ResponseEnvelope, TransportError>;
    async fn open_fixture(
        &self,
        session: &SessionKeys,
        args: &OpenFixture,
    ) -> Result<ResponseEnvelope, TransportError>;
    async fn open_fixture_hidden_compartment(
        &self,
        session: &SessionKeys,
        args: &OpenFixtureHiddenCompartment,
    ) -> Result<ResponseEnvelope, TransportError>;
    async fn sell_player_item(
        &self,
        session: &SessionKeys,
        args: &SellPlayerItem,
    ) -> Result<ResponseEnvelope, TransportError>;
    async fn throw_item_at_npc(
        &self,
        session: &SessionKeys,
        args: &ThrowItemAtNpc,
    ) -> Result<ResponseEnvelope, TransportError>;

    // Look-at endpoints answer with a bare view payload and no events.
    async fn look_at_fixture(
        &self,
        session: &SessionKeys,
        args: &LookAtFixture,
    ) -> Result<Value, TransportError>;
    async fn look_at_npc(
        &self,
        session: &SessionKeys,
        args: &LookAtNpc,
    ) -> Result<Value, TransportError>;

    // State reads
    async fn current_room(&self, session: &SessionKeys) -> Result<Room, TransportError>;
    /// The current character belongs to the player, not to a game.
    async fn current_player(&self, credential: &Credential)
        -> Result<PlayerCharacter, TransportError>;
    async fn current_actions(
        &self,
        session: &SessionKeys,
    ) -> Result<Vec<PerformAction>, TransportError>;

    // Setup
    async fn game_ids(&self, credential: &Credential) -> Result<Vec<GameId>, TransportError>;
    async fn generate_game(&self, credential: &Credential)
        -> Result<GeneratedGame, TransportError>;
    async fn generate_player_character(
        &self,
        credential: &Credential,
    ) -> Result<GeneratedPlayerCharacter, TransportError>;
    async fn set_current_player_character(
        &self,
        credential: &Credential,
        id: &PlayerCharacterId,
    ) -> Result<(), TransportError>;
}
