//! Outbound ports: what the client core needs from the outside world.

mod game_api_port;
mod session_port;

pub use game_api_port::{GameApiPort, TransportError};
pub use session_port::SessionPort;

#[cfg(any(test, feature = "testing"))]
pub use game_api_port::MockGameApiPort;
#[cfg(any(test, feature = "testing"))]
pub use session_port::MockSessionPort;
