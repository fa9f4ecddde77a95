//! HTTP request handlers for the mock server.

pub mod events;
pub mod projects;

pub use events::*;
pub use projects::*;
