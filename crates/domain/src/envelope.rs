//! Raw action responses and the reconciled state delta built from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event::DomainEvent;
use crate::snapshot::{PerformAction, PlayerCharacter, Room};

/// The server's response to one action, in whatever shape that endpoint uses.
///
/// `events` is always present on action endpoints. The other fields appear
/// only for endpoints that include them; which ones do has changed as the
/// server evolved. Look-at endpoints have no envelope at all: their raw view
/// payload is carried in `inspection` and `events` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub events: Vec<DomainEvent>,
    #[serde(default)]
    pub actions: Option<Vec<PerformAction>>,
    #[serde(default)]
    pub current_room: Option<Room>,
    #[serde(default)]
    pub current_player: Option<PlayerCharacter>,
    #[serde(skip)]
    pub inspection: Option<Value>,
}

impl ResponseEnvelope {
    pub fn new(events: Vec<DomainEvent>) -> Self {
        Self {
            events,
            actions: None,
            current_room: None,
            current_player: None,
            inspection: None,
        }
    }

    /// Wrap the raw payload of an endpoint that has no native events.
    pub fn inspection(payload: Value) -> Self {
        Self {
            inspection: Some(payload),
            ..Self::new(Vec::new())
        }
    }

    pub fn with_actions(mut self, actions: Vec<PerformAction>) -> Self {
        self.actions = Some(actions);
        self
    }

    pub fn with_room(mut self, room: Room) -> Self {
        self.current_room = Some(room);
        self
    }

    pub fn with_player(mut self, player: PlayerCharacter) -> Self {
        self.current_player = Some(player);
        self
    }
}

/// Everything observers need to know about one completed action.
///
/// `events` holds only what the server attributed to this one invocation.
/// `room`, `player` and `actions` are populated whenever the action kind's
/// policy requires them, so a consumer never has to guess at staleness; a
/// `None` means "unchanged as far as this action is concerned".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDelta {
    pub events: Vec<DomainEvent>,
    pub room: Option<Room>,
    pub player: Option<PlayerCharacter>,
    pub actions: Option<Vec<PerformAction>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventName;
    use serde_json::json;

    #[test]
    fn envelope_with_only_events_and_actions() {
        let envelope: ResponseEnvelope = serde_json::from_value(json!({
            "events": [{"name": "room_exited", "data": null}],
            "actions": []
        }))
        .unwrap();

        assert_eq!(envelope.events.len(), 1);
        assert_eq!(envelope.events[0].name, EventName::RoomExited);
        assert_eq!(envelope.actions, Some(vec![]));
        assert!(envelope.current_room.is_none());
        assert!(envelope.current_player.is_none());
    }

    #[test]
    fn envelope_without_events_is_rejected() {
        let result: Result<ResponseEnvelope, _> =
            serde_json::from_value(json!({"actions": []}));
        assert!(result.is_err());
    }

    #[test]
    fn extra_server_fields_are_ignored() {
        let envelope: ResponseEnvelope = serde_json::from_value(json!({
            "events": [],
            "actions": [],
            "health_discovered": true
        }))
        .unwrap();

        assert!(envelope.events.is_empty());
    }
}
