//! Action gateway: the only path from an intent to the server.

use std::sync::Arc;

use underworld_domain::{ActionIntent, MissingSessionError, ResponseEnvelope, SessionKeys};

use crate::ports::outbound::{GameApiPort, SessionPort, TransportError};

/// Why a gateway call produced no envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    MissingSession(#[from] MissingSessionError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// The raw outcome of one action call.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    /// The session the call was made with. Follow-up reads reuse it.
    pub session: SessionKeys,
    pub envelope: ResponseEnvelope,
}

/// Validates the session and forwards an intent to its single endpoint.
///
/// Does no reconciliation and publishes nothing.
#[derive(Clone)]
pub struct ActionGateway {
    api: Arc<dyn GameApiPort>,
    session: Arc<dyn SessionPort>,
}

impl ActionGateway {
    pub fn new(api: Arc<dyn GameApiPort>, session: Arc<dyn SessionPort>) -> Self {
        Self { api, session }
    }

    /// Execute `intent` against the server.
    ///
    /// Fails with [`GatewayError::MissingSession`] before touching the network
    /// if either session value is absent.
    pub async fn execute(&self, intent: &ActionIntent) -> Result<Dispatched, GatewayError> {
        let session = self.session.current().require()?;
        let envelope = self.call(&session, intent).await?;
        Ok(Dispatched { session, envelope })
    }

    async fn call(
        &self,
        session: &SessionKeys,
        intent: &ActionIntent,
    ) -> Result<ResponseEnvelope, TransportError> {
        let api = &self.api;
        match intent {
            ActionIntent::AttackNpc(args) => api.attack_npc(session, args).await,
            ActionIntent::ExitRoom(args) => api.exit_room(session, args).await,
            ActionIntent::LootNpc(args) => api.loot_npc(session, args).await,
            ActionIntent::LootFixture(args) => api.loot_fixture(session, args).await,
            ActionIntent::CastSpellOnPlayer(args) => api.cast_spell_on_player(session, args).await,
            ActionIntent::CastSpellOnNpc(args) => api.cast_spell_on_npc(session, args).await,
            ActionIntent::UseItemOnPlayer(args) => api.use_item_on_player(session, args).await,
            ActionIntent::MovePlayerItem(args) => api.move_player_item(session, args).await,
            ActionIntent::InspectFixture(args) => api.inspect_fixture(session, args).await,
            ActionIntent::InspectNpc(args) => api.inspect_npc(session, args).await,
            ActionIntent::OpenFixture(args) => api.open_fixture(session, args).await,
            ActionIntent::OpenFixtureHiddenCompartment(args) => {
                api.open_fixture_hidden_compartment(session, args).await
            }
            ActionIntent::SellPlayerItem(args) => api.sell_player_item(session, args).await,
            ActionIntent::ThrowItemAtNpc(args) => api.throw_item_at_npc(session, args).await,
            ActionIntent::LookAtFixture(args) => api
                .look_at_fixture(session, args)
                .await
                .map(ResponseEnvelope::inspection),
            ActionIntent::LookAtNpc(args) => api
                .look_at_npc(session, args)
                .await
                .map(ResponseEnvelope::inspection),
        }
    }
}
