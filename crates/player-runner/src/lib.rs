//! Console front end for the player client core.
//!
//! Reads one JSON command per line: either an action intent such as
//! `{"exit_room": {"exit_id": "E1"}}` or a setup command such as
//! `{"new_game": {}}`. Outcomes are rendered through two observers: an event
//! log and an error notice.

use std::io::Write;
use std::sync::{Arc, Mutex};

use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use underworld_domain::{ActionIntent, Credential, DomainEvent, GameId, StateDelta};
use underworld_player::{
    ActionError, ActionService, ErrorObserver, ErrorSignal, GameService, StateObserver,
};

/// Accumulates every event the client has seen.
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<DomainEvent>>,
}

impl EventLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All events so far, newest first.
    pub fn recent_first(&self) -> Vec<DomainEvent> {
        let events = self.events.lock().unwrap_or_else(|p| p.into_inner());
        events.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateObserver for EventLog {
    fn on_state_delta(&self, delta: &StateDelta) {
        let mut out = std::io::stdout().lock();
        for event in delta.events.iter().rev() {
            let _ = writeln!(out, "* {}", event.name);
        }
        if let Some(room) = &delta.room {
            let _ = writeln!(out, "  room: {}", room.id);
        }
        if let Some(actions) = &delta.actions {
            let _ = writeln!(out, "  {} actions available", actions.len());
        }

        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .extend(delta.events.iter().cloned());
    }
}

/// How an error signal is shown to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Must be acknowledged before play continues.
    Blocking(String),
    /// Shown next to the action that failed.
    Inline(String),
}

impl Notice {
    pub fn for_signal(signal: &ErrorSignal) -> Self {
        if signal.is_player_dead() {
            Notice::Blocking("You have died. Start a new character to keep playing.".to_string())
        } else {
            Notice::Inline(signal.message.clone())
        }
    }
}

/// Prints error signals to stderr and remembers the last one.
#[derive(Default)]
pub struct ErrorNotice {
    last: Mutex<Option<Notice>>,
}

impl ErrorNotice {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn last(&self) -> Option<Notice> {
        self.last.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl ErrorObserver for ErrorNotice {
    fn on_error(&self, signal: &ErrorSignal) {
        let notice = Notice::for_signal(signal);
        match &notice {
            Notice::Blocking(message) => eprintln!("!!! {message}"),
            Notice::Inline(message) => eprintln!("error: {message}"),
        }
        *self.last.lock().unwrap_or_else(|p| p.into_inner()) = Some(notice);
    }
}

/// Commands that change what is being played rather than playing it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupCommand {
    ListGames {},
    NewGame {},
    SelectGame { game_id: GameId },
    LeaveGame {},
    NewPlayer {},
    UseToken { token: String },
}

/// One input line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Command {
    Action(ActionIntent),
    Setup(SetupCommand),
}

/// Counts of what happened during one [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub dispatched: usize,
    pub failed: usize,
    pub skipped: usize,
    pub setup: usize,
}

/// Read commands from `input`, one at a time, until EOF.
///
/// Blank lines are ignored; lines that are not a valid command are logged
/// and skipped. Once the player dies, actions are refused until a new
/// character is created with `new_player`.
pub async fn run<R>(
    actions: &ActionService,
    games: &GameService,
    input: R,
) -> anyhow::Result<RunSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = RunSummary::default();
    let mut dead = false;
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command: Command = match serde_json::from_str(line) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed command");
                summary.skipped += 1;
                continue;
            }
        };

        match command {
            Command::Action(_) if dead => {
                summary.skipped += 1;
                eprintln!(r#"!!! Your character is dead. Send {{"new_player": {{}}}} to continue."#);
            }
            Command::Action(intent) => {
                summary.dispatched += 1;
                match actions.dispatch(intent).await {
                    Ok(delta) => {
                        tracing::info!(events = delta.events.len(), "Action completed");
                    }
                    Err(e) => {
                        summary.failed += 1;
                        dead = e.is_player_dead();
                        report_failure(&e);
                    }
                }
            }
            Command::Setup(setup) => {
                summary.setup += 1;
                match run_setup(games, setup).await {
                    Ok(revived) => dead &= !revived,
                    Err(e) => {
                        summary.failed += 1;
                        report_failure(&e);
                    }
                }
            }
        }
    }

    Ok(summary)
}

/// Returns whether a new character is now current.
async fn run_setup(games: &GameService, command: SetupCommand) -> Result<bool, ActionError> {
    match command {
        SetupCommand::ListGames {} => {
            let ids = games.list_games().await?;
            let mut out = std::io::stdout().lock();
            for id in &ids {
                let _ = writeln!(out, "  game: {id}");
            }
            let _ = writeln!(out, "  {} games", ids.len());
        }
        SetupCommand::NewGame {} => {
            let game = games.new_game().await?;
            println!("  playing game {}", game.game_id);
        }
        SetupCommand::SelectGame { game_id } => games.select_game(game_id),
        SetupCommand::LeaveGame {} => games.leave_game(),
        SetupCommand::NewPlayer {} => {
            let player = games.new_player().await?;
            println!("  playing as {}", player.name.as_deref().unwrap_or(player.id.as_str()));
            return Ok(true);
        }
        SetupCommand::UseToken { token } => games.use_credential(Credential::new(token)),
    }
    Ok(false)
}

fn report_failure(error: &ActionError) {
    match error {
        ActionError::Transport(e) => {
            tracing::warn!(error = %e, "Request failed without a server message");
            eprintln!("error: the request could not be completed, try again");
        }
        // Already reported through the error observers.
        e => tracing::info!(error = %e, "Request rejected"),
    }
}
