//! In-process messaging between the dispatcher and its observers.

mod notification_bus;

pub use notification_bus::NotificationBus;
