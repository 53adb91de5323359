//! Integration tests for Nameport.
//!
//! The registrar API is mocked with `wiremock`, so the suite is hermetic
//! and runs with plain `cargo test -p nameport-integration-tests`.
//!
//! # Test Categories
//!
//! - `registrar_api` - wire-level client behavior: credentials, response
//!   shape drift, rate limiting, error mapping
//! - `registration_flow` - the registration pipeline end to end against a
//!   mocked registry

use secrecy::SecretString;
use wiremock::MockServer;

use nameport_client::NameportConfig;
use nameport_core::Network;

/// Partner key sent by tests; random-looking so config validation accepts it.
pub const TEST_API_KEY: &str = "kJ8#mP2$vN5@qR9!wX3^zB6&tY1*uC4";

/// An EVM wallet used across the flow tests.
pub const TEST_WALLET: &str = "0x36de81e06e59b9674e985b00ba05acbb96d4f1a3";

/// A config pointed at a mock registrar.
#[must_use]
pub fn test_config(server: &MockServer) -> NameportConfig {
    NameportConfig {
        api_base_url: server.uri(),
        api_key: SecretString::from(TEST_API_KEY),
        app_domain: "app.nameport.test".to_owned(),
        app_uri: "https://app.nameport.test".to_owned(),
        default_network: Network::Core,
    }
}
