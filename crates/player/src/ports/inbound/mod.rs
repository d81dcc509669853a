//! Inbound ports: how the rendering layer hears about outcomes.

mod observers;

pub use observers::{ErrorCode, ErrorObserver, ErrorSignal, StateObserver, PLAYER_IS_DEAD};
