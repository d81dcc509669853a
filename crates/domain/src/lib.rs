//! Core data types for the Underworld game client.
//!
//! Pure data only: no I/O and no async. The player crate builds the
//! dispatch, reconciliation and notification machinery on top of these.

pub mod action;
pub mod envelope;
pub mod event;
pub mod ids;
pub mod session;
pub mod setup;
pub mod snapshot;

// Re-export action types
pub use action::{
    ActionIntent, ActionKind, AttackNpc, CastSpellOnNpc, CastSpellOnPlayer, ExitRoom,
    InspectFixture, InspectNpc, LookAtFixture, LookAtNpc, LootFixture, LootNpc, MovePlayerItem,
    OpenFixture, OpenFixtureHiddenCompartment, SellPlayerItem, ThrowItemAtNpc, UseItemOnPlayer,
};

pub use envelope::{ResponseEnvelope, StateDelta};
pub use event::{DomainEvent, EventName};

// Re-export ID types
pub use ids::{ExitId, FixtureId, GameId, ItemId, NpcId, PlayerCharacterId, SpellId};

pub use session::{Credential, MissingSessionError, Session, SessionKeys};
pub use setup::{GeneratedGame, GeneratedPlayerCharacter};
pub use snapshot::{PerformAction, PlayerCharacter, Room};
