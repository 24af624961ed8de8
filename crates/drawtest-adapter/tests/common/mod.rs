/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for drawtest-adapter tests

use drawtest_adapter::{ClientConfig, DrawTestClient, ImageFile};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at a mock server
pub fn client_for(server: &MockServer) -> DrawTestClient {
    DrawTestClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
}

/// One small drawing per category
pub fn sample_drawings() -> Vec<ImageFile> {
    vec![
        ImageFile::new("house.png", vec![1u8, 2, 3]),
        ImageFile::new("animal.png", vec![4u8, 5, 6]),
        ImageFile::new("portrait.jpg", vec![7u8, 8, 9]),
    ]
}
