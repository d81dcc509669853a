//! Player action intents.
//!
//! Each variant carries only the identifiers the server needs to execute the
//! action. Game state is never embedded in an intent; it would be stale by the
//! time the server saw it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{ExitId, FixtureId, ItemId, NpcId, SpellId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackNpc {
    pub npc_id: NpcId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitRoom {
    pub exit_id: ExitId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootNpc {
    pub npc_id: NpcId,
    pub item_ids: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootFixture {
    pub fixture_id: FixtureId,
    pub item_ids: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastSpellOnPlayer {
    pub spell_id: SpellId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastSpellOnNpc {
    pub spell_id: SpellId,
    pub npc_id: NpcId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseItemOnPlayer {
    pub item_id: ItemId,
}

/// Move an item to another equip location on the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePlayerItem {
    pub item_id: ItemId,
    /// Server equip location tag, e.g. `hip`, `back`, `packed`.
    pub location_tag: String,
    pub put_at_the_ready: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectFixture {
    pub fixture_id: FixtureId,
    #[serde(default)]
    pub discover_can_be_opened: bool,
    #[serde(default)]
    pub discover_contained: bool,
    #[serde(default)]
    pub discover_hidden: bool,
    #[serde(default)]
    pub discover_hidden_items: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectNpc {
    pub npc_id: NpcId,
    #[serde(default)]
    pub discover_health: bool,
    #[serde(default)]
    pub discover_name: bool,
    #[serde(default)]
    pub discover_packed_items: bool,
    #[serde(default)]
    pub discover_hidden_items: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookAtFixture {
    pub fixture_id: FixtureId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookAtNpc {
    pub npc_id: NpcId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenFixture {
    pub fixture_id: FixtureId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenFixtureHiddenCompartment {
    pub fixture_id: FixtureId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellPlayerItem {
    pub item_id: ItemId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrowItemAtNpc {
    pub npc_id: NpcId,
    pub item_id: ItemId,
}

/// One player-initiated game action and the identifiers it needs.
///
/// Serialized externally tagged by endpoint name, e.g.
/// `{"exit_room": {"exit_id": "E1"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionIntent {
    AttackNpc(AttackNpc),
    ExitRoom(ExitRoom),
    LootNpc(LootNpc),
    LootFixture(LootFixture),
    CastSpellOnPlayer(CastSpellOnPlayer),
    CastSpellOnNpc(CastSpellOnNpc),
    UseItemOnPlayer(UseItemOnPlayer),
    MovePlayerItem(MovePlayerItem),
    InspectFixture(InspectFixture),
    InspectNpc(InspectNpc),
    LookAtFixture(LookAtFixture),
    LookAtNpc(LookAtNpc),
    OpenFixture(OpenFixture),
    OpenFixtureHiddenCompartment(OpenFixtureHiddenCompartment),
    SellPlayerItem(SellPlayerItem),
    ThrowItemAtNpc(ThrowItemAtNpc),
}

impl ActionIntent {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionIntent::AttackNpc(_) => ActionKind::AttackNpc,
            ActionIntent::ExitRoom(_) => ActionKind::ExitRoom,
            ActionIntent::LootNpc(_) => ActionKind::LootNpc,
            ActionIntent::LootFixture(_) => ActionKind::LootFixture,
            ActionIntent::CastSpellOnPlayer(_) => ActionKind::CastSpellOnPlayer,
            ActionIntent::CastSpellOnNpc(_) => ActionKind::CastSpellOnNpc,
            ActionIntent::UseItemOnPlayer(_) => ActionKind::UseItemOnPlayer,
            ActionIntent::MovePlayerItem(_) => ActionKind::MovePlayerItem,
            ActionIntent::InspectFixture(_) => ActionKind::InspectFixture,
            ActionIntent::InspectNpc(_) => ActionKind::InspectNpc,
            ActionIntent::LookAtFixture(_) => ActionKind::LookAtFixture,
            ActionIntent::LookAtNpc(_) => ActionKind::LookAtNpc,
            ActionIntent::OpenFixture(_) => ActionKind::OpenFixture,
            ActionIntent::OpenFixtureHiddenCompartment(_) => {
                ActionKind::OpenFixtureHiddenCompartment
            }
            ActionIntent::SellPlayerItem(_) => ActionKind::SellPlayerItem,
            ActionIntent::ThrowItemAtNpc(_) => ActionKind::ThrowItemAtNpc,
        }
    }
}

macro_rules! intent_from_args {
    ($($args:ident),* $(,)?) => {
        $(
            impl From<$args> for ActionIntent {
                fn from(args: $args) -> Self {
                    ActionIntent::$args(args)
                }
            }
        )*
    };
}

intent_from_args!(
    AttackNpc,
    ExitRoom,
    LootNpc,
    LootFixture,
    CastSpellOnPlayer,
    CastSpellOnNpc,
    UseItemOnPlayer,
    MovePlayerItem,
    InspectFixture,
    InspectNpc,
    LookAtFixture,
    LookAtNpc,
    OpenFixture,
    OpenFixtureHiddenCompartment,
    SellPlayerItem,
    ThrowItemAtNpc,
);

/// Field-less mirror of [`ActionIntent`], used as the policy-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    AttackNpc,
    ExitRoom,
    LootNpc,
    LootFixture,
    CastSpellOnPlayer,
    CastSpellOnNpc,
    UseItemOnPlayer,
    MovePlayerItem,
    InspectFixture,
    InspectNpc,
    LookAtFixture,
    LookAtNpc,
    OpenFixture,
    OpenFixtureHiddenCompartment,
    SellPlayerItem,
    ThrowItemAtNpc,
}

impl ActionKind {
    pub const ALL: [ActionKind; 16] = [
        ActionKind::AttackNpc,
        ActionKind::ExitRoom,
        ActionKind::LootNpc,
        ActionKind::LootFixture,
        ActionKind::CastSpellOnPlayer,
        ActionKind::CastSpellOnNpc,
        ActionKind::UseItemOnPlayer,
        ActionKind::MovePlayerItem,
        ActionKind::InspectFixture,
        ActionKind::InspectNpc,
        ActionKind::LookAtFixture,
        ActionKind::LookAtNpc,
        ActionKind::OpenFixture,
        ActionKind::OpenFixtureHiddenCompartment,
        ActionKind::SellPlayerItem,
        ActionKind::ThrowItemAtNpc,
    ];

    /// Server endpoint name for this action.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ActionKind::AttackNpc => "attack_npc",
            ActionKind::ExitRoom => "exit_room",
            ActionKind::LootNpc => "loot_npc",
            ActionKind::LootFixture => "loot_fixture",
            ActionKind::CastSpellOnPlayer => "cast_spell_on_player",
            ActionKind::CastSpellOnNpc => "cast_spell_on_npc",
            ActionKind::UseItemOnPlayer => "use_item_on_player",
            ActionKind::MovePlayerItem => "move_player_item",
            ActionKind::InspectFixture => "inspect_fixture",
            ActionKind::InspectNpc => "inspect_npc",
            ActionKind::LookAtFixture => "look_at_fixture",
            ActionKind::LookAtNpc => "look_at_npc",
            ActionKind::OpenFixture => "open_fixture",
            ActionKind::OpenFixtureHiddenCompartment => "open_fixture_hidden_compartment",
            ActionKind::SellPlayerItem => "sell_player_item",
            ActionKind::ThrowItemAtNpc => "throw_item_at_npc",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_json_is_tagged_by_endpoint_name() {
        let intent: ActionIntent =
            serde_json::from_str(r#"{"exit_room": {"exit_id": "E1"}}"#).unwrap();

        assert_eq!(
            intent,
            ActionIntent::ExitRoom(ExitRoom {
                exit_id: ExitId::new("E1")
            })
        );
        assert_eq!(intent.kind(), ActionKind::ExitRoom);
    }

    #[test]
    fn inspect_flags_default_to_false() {
        let intent: ActionIntent =
            serde_json::from_str(r#"{"inspect_npc": {"npc_id": "N1", "discover_health": true}}"#)
                .unwrap();

        match intent {
            ActionIntent::InspectNpc(args) => {
                assert!(args.discover_health);
                assert!(!args.discover_name);
                assert!(!args.discover_hidden_items);
            }
            other => panic!("Expected InspectNpc, got {:?}", other),
        }
    }

    #[test]
    fn kind_serializes_to_its_endpoint() {
        for kind in ActionKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.endpoint().to_string()));
        }
    }
}
