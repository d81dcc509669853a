//! Game setup: listing, generating and selecting games, and creating the
//! character that plays them.
//!
//! These calls need only the credential. Failures go through the same error
//! translator as actions, so error observers see them too.

use std::sync::Arc;

use underworld_domain::{Credential, GameId, GeneratedGame, PlayerCharacter};

use crate::application::error::{ActionError, ErrorTranslator};
use crate::application::gateway::GatewayError;
use crate::infrastructure::messaging::NotificationBus;
use crate::ports::outbound::{GameApiPort, SessionPort};

#[derive(Clone)]
pub struct GameService {
    api: Arc<dyn GameApiPort>,
    session: Arc<dyn SessionPort>,
    translator: ErrorTranslator,
}

impl GameService {
    pub fn new(
        api: Arc<dyn GameApiPort>,
        session: Arc<dyn SessionPort>,
        bus: NotificationBus,
    ) -> Self {
        Self {
            api,
            session,
            translator: ErrorTranslator::new(bus),
        }
    }

    /// Ids of every game the player owns.
    pub async fn list_games(&self) -> Result<Vec<GameId>, ActionError> {
        let result = self.fetch_game_ids().await;
        self.finish(result)
    }

    /// Generate a new game and make it the selected one.
    pub async fn new_game(&self) -> Result<GeneratedGame, ActionError> {
        let result = self.generate_and_select().await;
        self.finish(result)
    }

    pub fn select_game(&self, game_id: GameId) {
        tracing::info!(%game_id, "Selected game");
        self.session.set_game_id(game_id);
    }

    pub fn leave_game(&self) {
        self.session.clear_game_id();
    }

    pub fn use_credential(&self, credential: Credential) {
        self.session.set_credential(credential);
    }

    /// Generate a character, make it current if the server did not, and
    /// return the current character as the server now reports it.
    pub async fn new_player(&self) -> Result<PlayerCharacter, ActionError> {
        let result = self.generate_player().await;
        self.finish(result)
    }

    async fn fetch_game_ids(&self) -> Result<Vec<GameId>, GatewayError> {
        let credential = self.credential()?;
        Ok(self.api.game_ids(&credential).await?)
    }

    async fn generate_and_select(&self) -> Result<GeneratedGame, GatewayError> {
        let credential = self.credential()?;
        let game = self.api.generate_game(&credential).await?;
        tracing::info!(game_id = %game.game_id, "Generated game");
        self.session.set_game_id(game.game_id.clone());
        Ok(game)
    }

    async fn generate_player(&self) -> Result<PlayerCharacter, GatewayError> {
        let credential = self.credential()?;
        let generated = self.api.generate_player_character(&credential).await?;
        if !generated.set_as_current {
            self.api
                .set_current_player_character(&credential, &generated.player_character_id)
                .await?;
        }
        Ok(self.api.current_player(&credential).await?)
    }

    fn credential(&self) -> Result<Credential, GatewayError> {
        Ok(self.session.current().require_credential()?)
    }

    fn finish<T>(&self, result: Result<T, GatewayError>) -> Result<T, ActionError> {
        result.map_err(|error| self.translator.translate(error))
    }
}
