//! Fixtures and recording observers for tests in this crate and downstream.

pub mod fixtures;

pub use fixtures::{RecordingErrorObserver, RecordingStateObserver};
