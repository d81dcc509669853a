//! Port traits at the edges of the client core.

pub mod inbound;
pub mod outbound;
