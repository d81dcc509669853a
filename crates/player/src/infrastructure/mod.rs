//! Infrastructure adapters: HTTP transport, session storage, messaging.

pub mod config;
pub mod http_client;
pub mod messaging;
pub mod session_store;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{ClientConfig, ConfigError};
pub use http_client::HttpGameApi;
pub use messaging::NotificationBus;
pub use session_store::InMemorySessionStore;
