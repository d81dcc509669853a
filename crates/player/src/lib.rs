//! Underworld player client core.
//!
//! Turns player intents into server calls, reconciles the partial responses
//! into complete state deltas, and fans outcomes out to observers.

pub mod application;
pub mod infrastructure;
pub mod ports;

pub use application::{ActionError, ActionService, GameService};
pub use infrastructure::{ClientConfig, HttpGameApi, InMemorySessionStore, NotificationBus};
pub use ports::inbound::{ErrorCode, ErrorObserver, ErrorSignal, StateObserver, PLAYER_IS_DEAD};
pub use ports::outbound::{GameApiPort, SessionPort, TransportError};
