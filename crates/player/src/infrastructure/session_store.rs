//! In-memory session storage.

use std::sync::RwLock;

use underworld_domain::{Credential, GameId, Session};

use crate::ports::outbound::SessionPort;

/// Holds the current game id and credential for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    session: RwLock<Session>,
}

impl InMemorySessionStore {
    pub fn new(session: Session) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut Session)) {
        apply(&mut self.session.write().unwrap_or_else(|p| p.into_inner()));
    }
}

impl SessionPort for InMemorySessionStore {
    fn current(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    fn set_game_id(&self, game_id: GameId) {
        self.update(|session| session.game_id = Some(game_id));
    }

    fn clear_game_id(&self) {
        self.update(|session| session.game_id = None);
    }

    fn set_credential(&self, credential: Credential) {
        self.update(|session| session.credential = Some(credential));
    }
}
