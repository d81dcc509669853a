//! Domain events reported by the game server.
//!
//! Events arrive in the order the server reports them and that order is kept.
//! Reversing for a most-recent-first log is a presentation concern.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

macro_rules! event_names {
    ($($variant:ident => $wire:literal),* $(,)?) => {
        /// Known server event kinds.
        ///
        /// The server adds event kinds over time; names this client does not
        /// know yet are kept verbatim in [`EventName::Other`].
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum EventName {
            $($variant,)*
            Other(String),
        }

        impl EventName {
            pub fn as_str(&self) -> &str {
                match self {
                    $(EventName::$variant => $wire,)*
                    EventName::Other(name) => name,
                }
            }
        }

        impl From<String> for EventName {
            fn from(value: String) -> Self {
                let known = match value.as_str() {
                    $($wire => Some(EventName::$variant),)*
                    _ => None,
                };
                known.unwrap_or(EventName::Other(value))
            }
        }
    };
}

event_names! {
    DeadNpcBeaten => "dead_npc_beaten",
    FixtureCanBeOpenedDiscovered => "fixture_can_be_opened_discovered",
    FixtureContainedDiscovered => "fixture_contained_discovered",
    FixtureHasHiddenDiscovered => "fixture_has_hidden_discovered",
    FixtureHiddenItemsDiscovered => "fixture_hidden_items_discovered",
    FixtureViewed => "fixture_viewed",
    GameDangerLevelIncreased => "game_danger_level_increased",
    ItemTakenFromFixture => "item_taken_from_fixture",
    ItemTakenFromNpc => "item_taken_from_npc",
    NpcHealthDiscovered => "npc_health_discovered",
    NpcHiddenDiscovered => "npc_hidden_discovered",
    NpcHit => "npc_hit",
    NpcKilled => "npc_killed",
    NpcMissed => "npc_missed",
    NpcPackedDiscovered => "npc_packed_discovered",
    NpcViewed => "npc_viewed",
    NpcWeaponReadied => "npc_weapon_readied",
    PlayerGainsResurrectionAura => "player_gains_resurrection_aura",
    PlayerGainsRetributionAura => "player_gains_retribution_aura",
    PlayerGainsShieldAura => "player_gains_shield_aura",
    PlayerHealed => "player_healed",
    PlayerHit => "player_hit",
    PlayerHitNpc => "player_hit_npc",
    PlayerItemMoved => "player_item_moved",
    PlayerItemRemoved => "player_item_removed",
    PlayerItemUsed => "player_item_used",
    PlayerKilled => "player_killed",
    PlayerKilledNpc => "player_killed_npc",
    PlayerMissed => "player_missed",
    PlayerResurrected => "player_resurrected",
    PlayerRetributionAuraDissipated => "player_retribution_aura_dissipated",
    PlayerSpellForgotten => "player_spell_forgotten",
    PlayerSpellLearned => "player_spell_learned",
    PlayerSpellUsed => "player_spell_used",
    RoomExited => "room_exited",
    RoomFirstSeen => "room_first_seen",
    RoomGenerated => "room_generated",
}

impl From<EventName> for String {
    fn from(value: EventName) -> Self {
        match value {
            EventName::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl From<&str> for EventName {
    fn from(value: &str) -> Self {
        EventName::from(value.to_string())
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named occurrence the server attributes to one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub name: EventName,
    #[serde(default)]
    pub data: Option<Value>,
}

impl DomainEvent {
    pub fn new(name: EventName, data: Option<Value>) -> Self {
        Self { name, data }
    }
}
