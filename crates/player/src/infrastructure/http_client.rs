//! HTTP adapter for the game server API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use underworld_domain::{
    ActionKind, AttackNpc, CastSpellOnNpc, CastSpellOnPlayer, Credential, ExitRoom, GameId,
    GeneratedGame, GeneratedPlayerCharacter, InspectFixture, InspectNpc, LookAtFixture,
    LookAtNpc, LootFixture, LootNpc, MovePlayerItem, OpenFixture, OpenFixtureHiddenCompartment,
    PerformAction, PlayerCharacter, PlayerCharacterId, ResponseEnvelope, Room, SellPlayerItem,
    SessionKeys, ThrowItemAtNpc, UseItemOnPlayer,
};
use url::Url;

use crate::infrastructure::config::ClientConfig;
use crate::ports::outbound::{GameApiPort, TransportError};

/// Header carrying the player's API token.
pub const TOKEN_HEADER: &str = "UNDERWORLD-TOKEN";

const LOOK_AROUND_ROOM: &str = "look_around_room";
const CURRENT_ACTIONS: &str = "current_actions";
const CURRENT_PLAYER_CHARACTER: &str = "current_player_character";
const GAMES: &str = "games";
const GAME: &str = "game";
const PLAYER_CHARACTER: &str = "player_character";
const GENERATE: &str = "generate";
const SET_AS_CURRENT: &str = "set_as_current";

/// Client for the game server's JSON API
#[derive(Clone)]
pub struct HttpGameApi {
    client: Client,
    api_base: Url,
}

impl HttpGameApi {
    pub fn new(api_base: Url, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_base }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_base.clone(), config.request_timeout)
    }

    /// `<base>/game/<game_id>/<endpoint>`, with the game id percent-encoded.
    pub fn game_url(&self, session: &SessionKeys, endpoint: &str) -> Result<Url, TransportError> {
        self.url(&[GAME, session.game_id.as_str(), endpoint])
    }

    fn url(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::network(format!("Invalid API base: {}", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post_action<B, T>(
        &self,
        session: &SessionKeys,
        kind: ActionKind,
        args: &B,
    ) -> Result<T, TransportError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.game_url(session, kind.endpoint())?;
        tracing::debug!(action = %kind, %url, "POST action");
        self.send(self.client.post(url).json(args), &session.credential)
            .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        credential: &Credential,
    ) -> Result<T, TransportError> {
        self.execute(request, credential)
            .await?
            .json()
            .await
            .map_err(|e| TransportError::decode(e.to_string()))
    }

    /// Send `request` with the token attached; non-2xx becomes
    /// [`TransportError::Response`] carrying the body text.
    async fn execute(
        &self,
        request: RequestBuilder,
        credential: &Credential,
    ) -> Result<Response, TransportError> {
        let response = request
            .header(TOKEN_HEADER, credential.expose())
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::network(e.to_string()))?;
            return Err(TransportError::response(status.as_u16(), body));
        }
        Ok(response)
    }
}

#[async_trait]
impl GameApiPort for HttpGameApi {
    async fn attack_npc(
        &self,
        session: &SessionKeys,
        args: &AttackNpc,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.post_action(session, ActionKind::AttackNpc, args).await
    }

    async fn exit_room(
        &self,
        session: &SessionKeys,
        args: &ExitRoom,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.post_action(session, ActionKind::ExitRoom, args).await
    }

    async fn loot_npc(
        &self,
        session: &SessionKeys,
        args: &LootNpc,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.post_action(session, ActionKind::LootNpc, args).await
    }

    async fn loot_fixture(
        &self,
        session: &SessionKeys,
        args: &LootFixture,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.post_action(session, ActionKind::LootFixture, args).await
    }

    async fn cast_spell_on_player(
        &self,
        session: &SessionKeys,
        args: &CastSpellOnPlayer,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.post_action(session, ActionKind::CastSpellOnPlayer, args)
            .await
    }

    async fn cast_spell_on_npc(
        &self,
        session: &SessionKeys,
        args: &CastSpellOnNpc,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.post_action(session, ActionKind::CastSpellOnNpc, args)
            .await
    }

    async fn use_item_on_player(
        &self,
        session: &SessionKeys,
        args: &UseItemOnPlayer,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.post_action(session, ActionKind::UseItemOnPlayer, args)
            .await
    }

    async fn move_player_item(
        &self,
        session: &SessionKeys,
        args: &MovePlayerItem,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.post_action(session, ActionKind::MovePlayerItem, args)
            .await
    }

    async fn inspect_fixture(
        &self,
        session: &SessionKeys,
        args: &InspectFixture,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.post_action(session, ActionKind::InspectFixture, args)
            .await
    }

    async fn inspect_npc(
        &self,
        session: &SessionKeys,
        args: &InspectNpc,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.post_action(session, ActionKind::InspectNpc, args).await
    }

    async fn open_fixture(
        &self,
        session: &SessionKeys,
        args: &OpenFixture,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.post_action(session, ActionKind::OpenFixture, args).await
    }

    async fn open_fixture_hidden_compartment(
        &self,
        session: &SessionKeys,
        args: &OpenFixtureHiddenCompartment,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.post_action(session, ActionKind::OpenFixtureHiddenCompartment, args)
            .await
    }

    async fn sell_player_item(
        &self,
        session: &SessionKeys,
        args: &SellPlayerItem,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.post_action(session, ActionKind::SellPlayerItem, args)
            .await
    }

    async fn throw_item_at_npc(
        &self,
        session: &SessionKeys,
        args: &ThrowItemAtNpc,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.post_action(session, ActionKind::ThrowItemAtNpc, args)
            .await
    }

    async fn look_at_fixture(
        &self,
        session: &SessionKeys,
        args: &LookAtFixture,
    ) -> Result<Value, TransportError> {
        self.post_action(session, ActionKind::LookAtFixture, args)
            .await
    }

    async fn look_at_npc(
        &self,
        session: &SessionKeys,
        args: &LookAtNpc,
    ) -> Result<Value, TransportError> {
        self.post_action(session, ActionKind::LookAtNpc, args).await
    }

    async fn current_room(&self, session: &SessionKeys) -> Result<Room, TransportError> {
        let url = self.game_url(session, LOOK_AROUND_ROOM)?;
        self.send(self.client.post(url), &session.credential).await
    }

    async fn current_player(
        &self,
        credential: &Credential,
    ) -> Result<PlayerCharacter, TransportError> {
        let url = self.url(&[CURRENT_PLAYER_CHARACTER])?;
        self.send(self.client.get(url), credential).await
    }

    async fn current_actions(
        &self,
        session: &SessionKeys,
    ) -> Result<Vec<PerformAction>, TransportError> {
        let url = self.game_url(session, CURRENT_ACTIONS)?;
        self.send(self.client.post(url), &session.credential).await
    }

    async fn game_ids(&self, credential: &Credential) -> Result<Vec<GameId>, TransportError> {
        let url = self.url(&[GAMES])?;
        self.send(self.client.get(url), credential).await
    }

    async fn generate_game(&self, credential: &Credential) -> Result<GeneratedGame, TransportError> {
        let url = self.url(&[GAME, GENERATE])?;
        tracing::debug!(%url, "POST generate game");
        self.send(self.client.post(url).json(&serde_json::json!({})), credential)
            .await
    }

    async fn generate_player_character(
        &self,
        credential: &Credential,
    ) -> Result<GeneratedPlayerCharacter, TransportError> {
        let url = self.url(&[PLAYER_CHARACTER, GENERATE])?;
        tracing::debug!(%url, "POST generate player character");
        self.send(self.client.post(url).json(&serde_json::json!({})), credential)
            .await
    }

    async fn set_current_player_character(
        &self,
        credential: &Credential,
        id: &PlayerCharacterId,
    ) -> Result<(), TransportError> {
        let url = self.url(&[PLAYER_CHARACTER, id.as_str(), SET_AS_CURRENT])?;
        // The body is a plain acknowledgement; only the status matters.
        self.execute(self.client.post(url), credential).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;
    use underworld_domain::{Credential, EventName, ExitId, NpcId};

    /// Accept one connection, answer it, and hand back the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        let base = Url::parse(&format!("http://{addr}/api/")).unwrap();
        (base, handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }

    fn client(base: Url) -> HttpGameApi {
        HttpGameApi::new(base, Duration::from_secs(5))
    }

    #[test]
    fn game_url_encodes_the_game_id() {
        let api = client(Url::parse("http://localhost:8080/api/").unwrap());
        let session = SessionKeys {
            game_id: "game one/2".into(),
            credential: Credential::new("token"),
        };

        let url = api.game_url(&session, "exit_room").unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/game/game%20one%2F2/exit_room"
        );
    }

    #[test]
    fn current_player_is_outside_the_game_path() {
        let api = client(Url::parse("http://localhost:8080/api/").unwrap());
        let url = api.url(&[CURRENT_PLAYER_CHARACTER]).unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/current_player_character"
        );
    }

    #[tokio::test]
    async fn posts_action_with_token_and_decodes_envelope() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"events":[{"name":"room_exited","data":null}],"actions":[]}"#,
        )
        .await;

        let envelope = client(base)
            .exit_room(
                &fixtures::session_keys(),
                &ExitRoom {
                    exit_id: ExitId::new("E1"),
                },
            )
            .await
            .unwrap();

        assert_eq!(envelope.events[0].name, EventName::RoomExited);
        assert_eq!(envelope.actions, Some(vec![]));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/game/g1/exit_room HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("underworld-token: token"));
        assert!(request.contains(r#"{"exit_id":"E1"}"#));
    }

    #[tokio::test]
    async fn rejection_body_is_returned_as_text() {
        let (base, server) = serve_once("400 Bad Request", "PlayerIsDeadError").await;

        let result = client(base)
            .attack_npc(
                &fixtures::session_keys(),
                &AttackNpc {
                    npc_id: NpcId::new("N1"),
                },
            )
            .await;

        assert_eq!(
            result,
            Err(TransportError::response(400, "PlayerIsDeadError"))
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn undecodable_success_body_is_a_decode_error() {
        let (base, server) = serve_once("200 OK", r#"{"unexpected":true}"#).await;

        let result = client(base)
            .exit_room(
                &fixtures::session_keys(),
                &ExitRoom {
                    exit_id: ExitId::new("E1"),
                },
            )
            .await;

        assert!(matches!(result, Err(TransportError::Decode(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn current_player_uses_get() {
        let (base, server) = serve_once("200 OK", r#"{"id":"P1","name":"Ash"}"#).await;

        let player = client(base)
            .current_player(&fixtures::session_keys().credential)
            .await
            .unwrap();

        assert_eq!(player.id, "P1");
        assert_eq!(player.name.as_deref(), Some("Ash"));
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/current_player_character HTTP/1.1"));
    }

    #[tokio::test]
    async fn lists_game_ids_with_get() {
        let (base, server) = serve_once("200 OK", r#"["g1","g2"]"#).await;

        let ids = client(base)
            .game_ids(&Credential::new("token"))
            .await
            .unwrap();

        assert_eq!(ids, vec![GameId::new("g1"), GameId::new("g2")]);
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/games HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("underworld-token: token"));
    }

    #[tokio::test]
    async fn generate_game_posts_and_decodes() {
        let (base, server) =
            serve_once("201 Created", r#"{"game_id":"g9","actions":[]}"#).await;

        let game = client(base)
            .generate_game(&Credential::new("token"))
            .await
            .unwrap();

        assert_eq!(game.game_id, GameId::new("g9"));
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/game/generate HTTP/1.1"));
    }

    #[tokio::test]
    async fn generate_player_character_reads_current_flag() {
        let (base, server) = serve_once(
            "201 Created",
            r#"{"player_character_id":"pc-1","set_as_current":false}"#,
        )
        .await;

        let generated = client(base)
            .generate_player_character(&Credential::new("token"))
            .await
            .unwrap();

        assert_eq!(generated.player_character_id, PlayerCharacterId::new("pc-1"));
        assert!(!generated.set_as_current);
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/player_character/generate HTTP/1.1"));
    }

    #[tokio::test]
    async fn set_current_player_character_ignores_plain_text_body() {
        let (base, server) = serve_once("200 OK", "Good to go").await;

        client(base)
            .set_current_player_character(&Credential::new("token"), &PlayerCharacterId::new("pc-1"))
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/player_character/pc-1/set_as_current HTTP/1.1"));
    }

    #[tokio::test]
    async fn connection_failure_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base = Url::parse(&format!("http://{addr}/api/")).unwrap();
        let result = client(base)
            .current_room(&fixtures::session_keys())
            .await;

        assert!(matches!(result, Err(TransportError::Network(_))));
    }
}
