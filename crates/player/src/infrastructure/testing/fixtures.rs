//! Simple test fixtures used across unit tests.

use std::sync::{Arc, Mutex};

use underworld_domain::{
    Credential, DomainEvent, EventName, PerformAction, PlayerCharacter, ResponseEnvelope, Room,
    Session, SessionKeys, StateDelta,
};

use crate::ports::inbound::{ErrorObserver, ErrorSignal, StateObserver};

pub fn session() -> Session {
    Session::new("g1", Credential::new("token"))
}

pub fn session_keys() -> SessionKeys {
    SessionKeys {
        game_id: "g1".into(),
        credential: Credential::new("token"),
    }
}

pub fn room(id: &str) -> Room {
    Room::new(id)
}

pub fn player(id: &str) -> PlayerCharacter {
    PlayerCharacter::new(id)
}

pub fn actions() -> Vec<PerformAction> {
    vec![PerformAction::named("exit_room")]
}

/// Envelope with data-less events and an actions list, the shape most
/// action endpoints answer with.
pub fn envelope(events: Vec<EventName>) -> ResponseEnvelope {
    ResponseEnvelope::new(
        events
            .into_iter()
            .map(|name| DomainEvent::new(name, None))
            .collect(),
    )
    .with_actions(actions())
}

/// Collects every delta it is handed.
#[derive(Default)]
pub struct RecordingStateObserver {
    deltas: Mutex<Vec<StateDelta>>,
}

impl RecordingStateObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn deltas(&self) -> Vec<StateDelta> {
        self.deltas
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

impl StateObserver for RecordingStateObserver {
    fn on_state_delta(&self, delta: &StateDelta) {
        self.deltas
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(delta.clone());
    }
}

/// Collects every error signal it is handed.
#[derive(Default)]
pub struct RecordingErrorObserver {
    signals: Mutex<Vec<ErrorSignal>>,
}

impl RecordingErrorObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn signals(&self) -> Vec<ErrorSignal> {
        self.signals
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

impl ErrorObserver for RecordingErrorObserver {
    fn on_error(&self, signal: &ErrorSignal) {
        self.signals
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(signal.clone());
    }
}
