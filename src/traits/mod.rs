//! Trait definitions for Dependency-Track operations.
//!
//! Each entity type implements the traits its endpoints support,
//! encapsulating path layout and verb choice in the implementations.

mod create;
mod delete;
mod get;
mod list;
mod patch;
mod update;

pub use create::Create;
pub use delete::Delete;
pub use get::Get;
pub use list::{List, DEFAULT_PAGE_SIZE};
pub use patch::Patch;
pub use update::Update;
