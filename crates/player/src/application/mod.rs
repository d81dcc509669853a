//! Application layer: action dispatch, reconciliation, error translation.

pub mod error;
pub mod gateway;
pub mod reconciliation;
pub mod services;

pub use error::{ActionError, ErrorTranslator};
pub use gateway::{ActionGateway, Dispatched, GatewayError};
pub use reconciliation::{policy_for, ReconciliationEngine, ReconciliationPolicy};
pub use services::{ActionService, GameService};
