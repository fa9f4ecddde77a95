//! Dependency-Track API model types.

mod about;
mod event;
mod metrics;
mod project;

pub use about::*;
pub use event::*;
pub use metrics::*;
pub use project::*;
