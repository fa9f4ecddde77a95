//! Tests for MCP Server implementation.

use dtrackapi::mcp::DtrackServer;
use dtrackapi::DtrackClient;
use rmcp::handler::server::ServerHandler;

/// Verify DtrackServer implements ServerHandler.
#[test]
fn dtrack_server_implements_server_handler() {
    fn assert_server_handler<T: ServerHandler>() {}
    assert_server_handler::<DtrackServer>();
}

#[test]
fn get_info_returns_server_info_with_name_dtrackapi() {
    let client = DtrackClient::new("test-key", "http://localhost:8081").unwrap();
    let server = DtrackServer::new(client);

    let info = server.get_info();

    assert_eq!(info.server_info.name, "dtrackapi");
    assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
    assert!(info.capabilities.tools.is_some());
    assert!(info.instructions.unwrap().contains("Dependency-Track"));
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Verify DtrackServer implements Clone (required by ServerHandler).
    #[test]
    fn dtrack_server_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<DtrackServer>();
    }

    /// Verify DtrackServer implements Send + Sync (required by ServerHandler).
    #[test]
    fn dtrack_server_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DtrackServer>();
    }
}
