//! MCP (Model Context Protocol) server and tool types.
//!
//! This module provides an MCP server implementation for the Dependency-Track
//! API, allowing AI assistants to find, inspect, change and clone projects.
//!
//! # Example
//!
//! ```no_run
//! use dtrackapi::mcp::DtrackServer;
//!
//! # fn main() -> dtrackapi::Result<()> {
//! let server = DtrackServer::from_env()?;
//! // Server can now be used with rmcp transport
//! # Ok(())
//! # }
//! ```

mod params;
mod server;

pub use params::*;
pub use server::DtrackServer;
