//! Shared helpers for the mock-server integration tests.

#![allow(dead_code)]

use mreg_reconciler::{Gateway, Session};

pub const TEST_TOKEN: &str = "test-token";

/// Gateway with a pre-issued token pointed at a mock server.
pub fn gateway(server_url: &str) -> Gateway {
    Gateway::new(Session::with_token(server_url, TEST_TOKEN))
}

/// Gateway without credentials, for login tests.
pub fn anonymous_gateway(server_url: &str) -> Gateway {
    Gateway::new(Session::anonymous(server_url))
}
