//! Reconciliation: turn an action's raw response into a complete state delta.
//!
//! The engine holds no state between calls. Given the same action kind and
//! envelope it always issues the same follow-up reads.

mod policy;

pub use policy::{policy_for, Fields, FollowUpPlan, ReconciliationPolicy};

use std::sync::Arc;

use underworld_domain::{
    ActionKind, DomainEvent, PerformAction, PlayerCharacter, ResponseEnvelope, Room, SessionKeys,
    StateDelta,
};

use crate::ports::outbound::{GameApiPort, TransportError};

#[derive(Clone)]
pub struct ReconciliationEngine {
    api: Arc<dyn GameApiPort>,
}

impl ReconciliationEngine {
    pub fn new(api: Arc<dyn GameApiPort>) -> Self {
        Self { api }
    }

    /// Fill in whatever the policy for `kind` requires and the envelope lacks.
    ///
    /// Follow-up reads run concurrently. If any of them fails the whole
    /// reconciliation fails and no partial delta is produced.
    pub async fn reconcile(
        &self,
        kind: ActionKind,
        session: &SessionKeys,
        envelope: ResponseEnvelope,
    ) -> Result<StateDelta, TransportError> {
        let policy = policy_for(kind);

        let drift = policy.drift(&envelope);
        if !drift.is_empty() {
            tracing::warn!(
                action = %kind,
                room = drift.room,
                player = drift.player,
                actions = drift.actions,
                "Response is missing fields this endpoint normally returns"
            );
        }

        let plan = policy.plan(&envelope);
        tracing::debug!(
            action = %kind,
            reads = plan.count(),
            room = plan.room,
            player = plan.player,
            actions = plan.actions,
            "Planned follow-up reads"
        );

        let (room, player, actions) = self.follow_up(session, plan).await?;

        let ResponseEnvelope {
            events,
            actions: native_actions,
            current_room,
            current_player,
            inspection,
        } = envelope;

        let events = match policy.synthesized_event {
            Some(name) => vec![DomainEvent::new(name, inspection)],
            None => events,
        };

        Ok(StateDelta {
            events,
            room: current_room.or(room),
            player: current_player.or(player),
            actions: native_actions.or(actions),
        })
    }

    async fn follow_up(
        &self,
        session: &SessionKeys,
        plan: FollowUpPlan,
    ) -> Result<(Option<Room>, Option<PlayerCharacter>, Option<Vec<PerformAction>>), TransportError>
    {
        let room = async {
            if plan.room {
                self.api.current_room(session).await.map(Some)
            } else {
                Ok(None)
            }
        };
        let player = async {
            if plan.player {
                self.api.current_player(&session.credential).await.map(Some)
            } else {
                Ok(None)
            }
        };
        let actions = async {
            if plan.actions {
                self.api.current_actions(session).await.map(Some)
            } else {
                Ok(None)
            }
        };

        futures_util::try_join!(room, player, actions)
    }
}
