//! Action service: the single entry point for player actions.
//!
//! `dispatch` runs one intent through the gateway and the reconciliation
//! engine, then publishes exactly one outcome: a state delta on success or
//! (for classifiable failures) one error signal.

use std::sync::Arc;

use tracing::Instrument;
use underworld_domain::{
    ActionIntent, AttackNpc, CastSpellOnNpc, CastSpellOnPlayer, ExitRoom, InspectFixture,
    InspectNpc, LookAtFixture, LookAtNpc, LootFixture, LootNpc, MovePlayerItem, OpenFixture,
    OpenFixtureHiddenCompartment, SellPlayerItem, StateDelta, ThrowItemAtNpc, UseItemOnPlayer,
};
use uuid::Uuid;

use crate::application::error::{ActionError, ErrorTranslator};
use crate::application::gateway::{ActionGateway, GatewayError};
use crate::application::reconciliation::ReconciliationEngine;
use crate::infrastructure::messaging::NotificationBus;
use crate::ports::inbound::{ErrorObserver, StateObserver};
use crate::ports::outbound::{GameApiPort, SessionPort};

/// Dispatches player actions and publishes their outcomes.
///
/// Concurrent dispatches are independent; each publishes when it completes.
#[derive(Clone)]
pub struct ActionService {
    gateway: ActionGateway,
    engine: ReconciliationEngine,
    translator: ErrorTranslator,
    bus: NotificationBus,
}

impl ActionService {
    pub fn new(
        api: Arc<dyn GameApiPort>,
        session: Arc<dyn SessionPort>,
        bus: NotificationBus,
    ) -> Self {
        Self {
            gateway: ActionGateway::new(Arc::clone(&api), session),
            engine: ReconciliationEngine::new(api),
            translator: ErrorTranslator::new(bus.clone()),
            bus,
        }
    }

    /// Execute `intent`, reconcile the result, and publish it.
    ///
    /// The delta is published only after every follow-up read has finished.
    /// On failure nothing is published on the state channel.
    pub async fn dispatch(
        &self,
        intent: impl Into<ActionIntent>,
    ) -> Result<StateDelta, ActionError> {
        let intent = intent.into();
        let kind = intent.kind();
        let dispatch_id = Uuid::new_v4();
        let span = tracing::debug_span!("dispatch", %dispatch_id, action = %kind);

        async move {
            tracing::debug!("Dispatching action");
            match self.run(&intent).await {
                Ok(delta) => {
                    tracing::debug!(events = delta.events.len(), "Publishing state delta");
                    self.bus.publish_state_delta(&delta);
                    Ok(delta)
                }
                Err(error) => Err(self.translator.translate(error)),
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self, intent: &ActionIntent) -> Result<StateDelta, GatewayError> {
        let dispatched = self.gateway.execute(intent).await?;
        let delta = self
            .engine
            .reconcile(intent.kind(), &dispatched.session, dispatched.envelope)
            .await?;
        Ok(delta)
    }

    pub fn subscribe_to_state_deltas(&self, observer: Arc<dyn StateObserver>) -> bool {
        self.bus.subscribe_to_state_deltas(observer)
    }

    pub fn unsubscribe_from_state_deltas(&self, observer: &Arc<dyn StateObserver>) -> bool {
        self.bus.unsubscribe_from_state_deltas(observer)
    }

    pub fn subscribe_to_errors(&self, observer: Arc<dyn ErrorObserver>) -> bool {
        self.bus.subscribe_to_errors(observer)
    }

    pub fn unsubscribe_from_errors(&self, observer: &Arc<dyn ErrorObserver>) -> bool {
        self.bus.unsubscribe_from_errors(observer)
    }

    /// Get a reference to the underlying notification bus
    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    pub async fn attack_npc(&self, args: AttackNpc) -> Result<StateDelta, ActionError> {
        self.dispatch(args).await
    }

    pub async fn exit_room(&self, args: ExitRoom) -> Result<StateDelta, ActionError> {
        self.dispatch(args).await
    }

    pub async fn loot_npc(&self, args: LootNpc) -> Result<StateDelta, ActionError> {
        self.dispatch(args).await
    }

    pub async fn loot_fixture(&self, args: LootFixture) -> Result<StateDelta, ActionError> {
        self.dispatch(args).await
    }

    pub async fn cast_spell_on_player(
        &self,
        args: CastSpellOnPlayer,
    ) -> Result<StateDelta, ActionError> {
        self.dispatch(args).await
    }

    pub async fn cast_spell_on_npc(
        &self,
        args: CastSpellOnNpc,
    ) -> Result<StateDelta, ActionError> {
        self.dispatch(args).await
    }

    pub async fn use_item_on_player(
        &self,
        args: UseItemOnPlayer,
    ) -> Result<StateDelta, ActionError> {
        self.dispatch(args).await
    }

    pub async fn move_player_item(
        &self,
        args: MovePlayerItem,
    ) -> Result<StateDelta, ActionError> {
        self.dispatch(args).await
    }

    pub async fn inspect_fixture(
        &self,
        args: InspectFixture,
    ) -> Result<StateDelta, ActionError> {
        self.dispatch(args).await
    }

    pub async fn inspect_npc(&self, args: InspectNpc) -> Result<StateDelta, ActionError> {
        self.dispatch(args).await
    }

    pub async fn look_at_fixture(&self, args: LookAtFixture) -> Result<StateDelta, ActionError> {
        self.dispatch(args).await
    }

    pub async fn look_at_npc(&self, args: LookAtNpc) -> Result<StateDelta, ActionError> {
        self.dispatch(args).await
    }

    pub async fn open_fixture(&self, args: OpenFixture) -> Result<StateDelta, ActionError> {
        self.dispatch(args).await
    }

    pub async fn open_fixture_hidden_compartment(
        &self,
        args: OpenFixtureHiddenCompartment,
    ) -> Result<StateDelta, ActionError> {
        self.dispatch(args).await
    }

    pub async fn sell_player_item(
        &self,
        args: SellPlayerItem,
    ) -> Result<StateDelta, ActionError> {
        self.dispatch(args).await
    }

    pub async fn throw_item_at_npc(
        &self,
        args: ThrowItemAtNpc,
    ) -> Result<StateDelta, ActionError> {
        self.dispatch(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::{fixtures, RecordingErrorObserver, RecordingStateObserver};
    use crate::ports::inbound::ErrorSignal;
    use crate::ports::outbound::{MockGameApiPort, MockSessionPort, TransportError};
    use serde_json::json;
    use underworld_domain::{
        Credential, DomainEvent, EventName, ExitId, FixtureId, ItemId, MissingSessionError,
        NpcId, Session,
    };

    struct Harness {
        service: ActionService,
        deltas: Arc<RecordingStateObserver>,
        errors: Arc<RecordingErrorObserver>,
    }

    fn harness(api: MockGameApiPort, session: Session) -> Harness {
        let mut session_port = MockSessionPort::new();
        session_port
            .expect_current()
            .returning(move || session.clone());

        let service = ActionService::new(
            Arc::new(api),
            Arc::new(session_port),
            NotificationBus::new(),
        );
        let deltas = RecordingStateObserver::new();
        let errors = RecordingErrorObserver::new();
        service.subscribe_to_state_deltas(Arc::clone(&deltas) as Arc<dyn StateObserver>);
        service.subscribe_to_errors(Arc::clone(&errors) as Arc<dyn ErrorObserver>);

        Harness {
            service,
            deltas,
            errors,
        }
    }

    #[tokio::test]
    async fn exit_room_publishes_reconciled_delta() {
        let mut api = MockGameApiPort::new();
        api.expect_exit_room()
            .times(1)
            .returning(|_, _| Ok(fixtures::envelope(vec![EventName::RoomExited])));
        api.expect_current_room()
            .times(1)
            .returning(|_| Ok(fixtures::room("R2")));
        api.expect_current_player().times(0);

        let h = harness(api, fixtures::session());
        let delta = h
            .service
            .exit_room(ExitRoom {
                exit_id: ExitId::new("E1"),
            })
            .await
            .unwrap();

        assert_eq!(delta.room, Some(fixtures::room("R2")));
        assert_eq!(h.deltas.deltas(), vec![delta]);
        assert!(h.errors.signals().is_empty());
    }

    #[tokio::test]
    async fn player_dead_publishes_one_error_and_no_delta() {
        let mut api = MockGameApiPort::new();
        api.expect_attack_npc()
            .times(1)
            .returning(|_, _| Err(TransportError::response(400, "PlayerIsDeadError")));

        let h = harness(api, fixtures::session());
        let result = h
            .service
            .attack_npc(AttackNpc {
                npc_id: NpcId::new("N1"),
            })
            .await;

        let error = result.unwrap_err();
        assert!(error.is_player_dead());
        assert_eq!(h.errors.signals(), vec![ErrorSignal::domain("PlayerIsDeadError")]);
        assert!(h.deltas.deltas().is_empty());
    }

    #[tokio::test]
    async fn missing_session_never_reaches_the_server() {
        let api = MockGameApiPort::new();
        let h = harness(
            api,
            Session {
                game_id: Some("g1".into()),
                credential: None,
            },
        );

        let result = h
            .service
            .loot_npc(LootNpc {
                npc_id: NpcId::new("N1"),
                item_ids: vec![ItemId::new("I1")],
            })
            .await;

        assert_eq!(
            result,
            Err(ActionError::MissingSession(MissingSessionError::Credential))
        );
        assert_eq!(h.errors.signals().len(), 1);
        assert!(h.deltas.deltas().is_empty());
    }

    #[tokio::test]
    async fn look_at_fixture_delivers_synthesized_event() {
        let payload = json!({"fixture": {"id": "F1", "name": "Chest"}});
        let mut api = MockGameApiPort::new();
        {
            let payload = payload.clone();
            api.expect_look_at_fixture()
                .times(1)
                .returning(move |_, _| Ok(payload.clone()));
        }
        api.expect_current_actions()
            .times(1)
            .returning(|_| Ok(fixtures::actions()));

        let h = harness(api, fixtures::session());
        let delta = h
            .service
            .look_at_fixture(LookAtFixture {
                fixture_id: FixtureId::new("F1"),
            })
            .await
            .unwrap();

        assert_eq!(
            delta.events,
            vec![DomainEvent::new(EventName::FixtureViewed, Some(payload))]
        );
        assert_eq!(h.deltas.deltas().len(), 1);
    }

    #[tokio::test]
    async fn failed_follow_up_publishes_nothing_on_state_channel() {
        let mut api = MockGameApiPort::new();
        api.expect_inspect_npc()
            .returning(|_, _| Ok(fixtures::envelope(vec![EventName::NpcHealthDiscovered])));
        api.expect_current_room()
            .returning(|_| Ok(fixtures::room("R1")));
        api.expect_current_player()
            .returning(|_| Err(TransportError::response(500, "Database unavailable")));

        let h = harness(api, fixtures::session());
        let result = h
            .service
            .inspect_npc(InspectNpc {
                npc_id: NpcId::new("N1"),
                discover_health: true,
                discover_name: false,
                discover_packed_items: false,
                discover_hidden_items: false,
            })
            .await;

        assert!(matches!(result, Err(ActionError::Domain { .. })));
        assert!(h.deltas.deltas().is_empty());
        assert_eq!(h.errors.signals(), vec![ErrorSignal::domain("Database unavailable")]);
    }

    #[tokio::test]
    async fn empty_rejection_body_still_reaches_error_observers() {
        let mut api = MockGameApiPort::new();
        api.expect_exit_room()
            .times(1)
            .returning(|_, _| Err(TransportError::response(502, "")));

        let h = harness(api, fixtures::session());
        let result = h
            .service
            .exit_room(ExitRoom {
                exit_id: ExitId::new("E1"),
            })
            .await;

        assert_eq!(
            result,
            Err(ActionError::Domain {
                message: String::new(),
                status: Some(502),
            })
        );
        assert_eq!(h.errors.signals(), vec![ErrorSignal::domain("")]);
        assert!(h.deltas.deltas().is_empty());
    }

    #[tokio::test]
    async fn unsubscribed_observer_stops_receiving() {
        let mut api = MockGameApiPort::new();
        api.expect_sell_player_item().times(2).returning(|_, _| {
            Ok(fixtures::envelope(vec![EventName::PlayerItemRemoved])
                .with_room(fixtures::room("R1"))
                .with_player(fixtures::player("P1")))
        });

        let h = harness(api, fixtures::session());
        let sell = || SellPlayerItem {
            item_id: ItemId::new("I1"),
        };

        h.service.sell_player_item(sell()).await.unwrap();
        let observer = Arc::clone(&h.deltas) as Arc<dyn StateObserver>;
        assert!(h.service.unsubscribe_from_state_deltas(&observer));
        h.service.sell_player_item(sell()).await.unwrap();

        assert_eq!(h.deltas.deltas().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_dispatches_each_publish_once() {
        let mut api = MockGameApiPort::new();
        api.expect_cast_spell_on_player().times(2).returning(|_, _| {
            Ok(fixtures::envelope(vec![EventName::PlayerSpellUsed])
                .with_room(fixtures::room("R1"))
                .with_player(fixtures::player("P1")))
        });

        let h = harness(api, Session::new("g1", Credential::new("token")));
        let cast = || CastSpellOnPlayer {
            spell_id: underworld_domain::SpellId::new("S1"),
        };

        let (first, second) = tokio::join!(
            h.service.cast_spell_on_player(cast()),
            h.service.cast_spell_on_player(cast())
        );

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(h.deltas.deltas().len(), 2);
    }
}
