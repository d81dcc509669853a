//! Per-action reconciliation policy.
//!
//! Each action kind declares which state fields its endpoint returns natively,
//! which fields the resulting delta must carry, and whether it needs a
//! synthesized event. Everything the reconciliation engine does is derived
//! from this table.

use underworld_domain::{ActionKind, EventName, ResponseEnvelope};

/// A subset of the reconcilable state fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fields {
    pub room: bool,
    pub player: bool,
    pub actions: bool,
}

impl Fields {
    pub const NONE: Fields = Fields::new(false, false, false);
    pub const ACTIONS: Fields = Fields::new(false, false, true);
    pub const ROOM_ACTIONS: Fields = Fields::new(true, false, true);
    pub const PLAYER_ACTIONS: Fields = Fields::new(false, true, true);
    pub const ALL: Fields = Fields::new(true, true, true);

    pub const fn new(room: bool, player: bool, actions: bool) -> Self {
        Self {
            room,
            player,
            actions,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.room || self.player || self.actions)
    }

    pub fn count(&self) -> usize {
        [self.room, self.player, self.actions]
            .into_iter()
            .filter(|set| *set)
            .count()
    }

    /// Fields of `self` the envelope does not carry.
    pub fn missing_from(&self, envelope: &ResponseEnvelope) -> Fields {
        Fields {
            room: self.room && envelope.current_room.is_none(),
            player: self.player && envelope.current_player.is_none(),
            actions: self.actions && envelope.actions.is_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationPolicy {
    pub kind: ActionKind,
    /// Fields the endpoint is known to include in its response.
    pub native: Fields,
    /// Fields the resulting delta must always carry.
    pub required: Fields,
    /// Event to emit in place of native events, for endpoints that have none.
    pub synthesized_event: Option<EventName>,
}

impl ReconciliationPolicy {
    const fn new(kind: ActionKind, native: Fields, required: Fields) -> Self {
        Self {
            kind,
            native,
            required,
            synthesized_event: None,
        }
    }

    fn synthesizing(mut self, event: EventName) -> Self {
        self.synthesized_event = Some(event);
        self
    }

    /// Which follow-up reads `envelope` still needs.
    pub fn plan(&self, envelope: &ResponseEnvelope) -> FollowUpPlan {
        self.required.missing_from(envelope)
    }

    /// Native fields the envelope was expected to carry but did not.
    pub fn drift(&self, envelope: &ResponseEnvelope) -> Fields {
        self.native.missing_from(envelope)
    }
}

/// Follow-up reads to issue after an action call: one per set field.
pub type FollowUpPlan = Fields;

/// The reconciliation policy for `kind`.
pub fn policy_for(kind: ActionKind) -> ReconciliationPolicy {
    use ActionKind::*;

    match kind {
        AttackNpc => ReconciliationPolicy::new(kind, Fields::ACTIONS, Fields::ALL),
        ExitRoom => ReconciliationPolicy::new(kind, Fields::ACTIONS, Fields::ROOM_ACTIONS),
        LootNpc | LootFixture => ReconciliationPolicy::new(kind, Fields::ACTIONS, Fields::ALL),
        CastSpellOnPlayer | CastSpellOnNpc => {
            ReconciliationPolicy::new(kind, Fields::ALL, Fields::ALL)
        }
        UseItemOnPlayer | MovePlayerItem | SellPlayerItem => {
            ReconciliationPolicy::new(kind, Fields::ALL, Fields::PLAYER_ACTIONS)
        }
        ThrowItemAtNpc => ReconciliationPolicy::new(kind, Fields::ACTIONS, Fields::ALL),
        InspectFixture => ReconciliationPolicy::new(kind, Fields::ACTIONS, Fields::ROOM_ACTIONS),
        InspectNpc => ReconciliationPolicy::new(kind, Fields::ACTIONS, Fields::ALL),
        LookAtFixture => ReconciliationPolicy::new(kind, Fields::NONE, Fields::ACTIONS)
            .synthesizing(EventName::FixtureViewed),
        LookAtNpc => ReconciliationPolicy::new(kind, Fields::NONE, Fields::ACTIONS)
            .synthesizing(EventName::NpcViewed),
        OpenFixture | OpenFixtureHiddenCompartment => {
            ReconciliationPolicy::new(kind, Fields::ALL, Fields::ALL)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures;

    #[test]
    fn every_kind_requires_fresh_actions() {
        for kind in ActionKind::ALL {
            let policy = policy_for(kind);
            assert_eq!(policy.kind, kind);
            assert!(policy.required.actions, "{kind} must require actions");
        }
    }

    #[test]
    fn only_look_at_kinds_synthesize_events() {
        for kind in ActionKind::ALL {
            let policy = policy_for(kind);
            match kind {
                ActionKind::LookAtNpc => {
                    assert_eq!(policy.synthesized_event, Some(EventName::NpcViewed))
                }
                ActionKind::LookAtFixture => {
                    assert_eq!(policy.synthesized_event, Some(EventName::FixtureViewed))
                }
                _ => assert_eq!(policy.synthesized_event, None, "{kind}"),
            }
        }
    }

    #[test]
    fn exit_room_plans_only_a_room_read() {
        let envelope = fixtures::envelope(vec![EventName::RoomExited]);
        let plan = policy_for(ActionKind::ExitRoom).plan(&envelope);

        assert_eq!(plan, Fields::new(true, false, false));
        assert_eq!(plan.count(), 1);
    }

    #[test]
    fn attack_plans_room_and_player_reads() {
        let envelope = fixtures::envelope(vec![EventName::NpcHit]);
        let plan = policy_for(ActionKind::AttackNpc).plan(&envelope);

        assert!(plan.room);
        assert!(plan.player);
        assert!(!plan.actions);
    }

    #[test]
    fn native_fields_suppress_follow_ups() {
        let envelope = fixtures::envelope(vec![EventName::PlayerSpellUsed])
            .with_room(fixtures::room("R1"))
            .with_player(fixtures::player("P1"));
        let policy = policy_for(ActionKind::CastSpellOnNpc);

        assert!(policy.plan(&envelope).is_empty());
        assert!(policy.drift(&envelope).is_empty());
    }

    #[test]
    fn missing_native_field_is_drift_and_gets_read() {
        let envelope = fixtures::envelope(vec![EventName::PlayerItemUsed]);
        let policy = policy_for(ActionKind::UseItemOnPlayer);

        assert_eq!(policy.drift(&envelope), Fields::new(true, true, false));
        assert_eq!(policy.plan(&envelope), Fields::new(false, true, false));
    }

    #[test]
    fn look_at_plans_an_actions_read() {
        let envelope = underworld_domain::ResponseEnvelope::inspection(serde_json::json!({}));
        let plan = policy_for(ActionKind::LookAtNpc).plan(&envelope);

        assert_eq!(plan, Fields::ACTIONS);
    }

    #[test]
    fn planning_is_deterministic() {
        let envelope = fixtures::envelope(vec![EventName::NpcHit]);
        for kind in ActionKind::ALL {
            let policy = policy_for(kind);
            assert_eq!(policy.plan(&envelope), policy.plan(&envelope));
            assert_eq!(policy, policy_for(kind));
        }
    }
}
