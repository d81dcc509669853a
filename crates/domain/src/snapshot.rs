//! World-state snapshots returned by the server.
//!
//! The client core only needs identities; everything else is carried through
//! untouched for the rendering layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The player's current room as last seen by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Room {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }
}

/// The current player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCharacter {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl PlayerCharacter {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }
}

/// An action the server says the player may perform next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformAction {
    /// Action name; `None` for actions this server version does not name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub http_action: String,
    #[serde(default)]
    pub args: Option<Value>,
}

impl PerformAction {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: String::new(),
            link: String::new(),
            http_action: String::new(),
            args: None,
        }
    }
}
