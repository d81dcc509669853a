//! Application services consumed by the rendering layer.

pub mod action_service;
pub mod game_service;

pub use action_service::ActionService;
pub use game_service::GameService;
