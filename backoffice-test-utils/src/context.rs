//! Test context structure and utilities.
//!
//! `TestContext` is returned by `TestBuilder::build()` and owns the mock HTTP server standing in
//! for both the backend and the identity provider.

use mockito::{Mock, Server, ServerGuard};

/// Test context structure returned by `TestBuilder`
///
/// ```ignore
/// let test = TestBuilder::new()
///     .with_listing_endpoint(TEST_TOKEN, serde_json::json!([]), 1)
///     .build()
///     .await?;
///
/// let client = ApiClient::new(test.url(), store);
///
/// test.assert_mocks();
/// ```
pub struct TestContext {
    /// Mock HTTP server
    pub(crate) server: ServerGuard,
    /// Collection of mock HTTP endpoints for assertion
    pub(crate) mocks: Vec<Mock>,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        Self {
            server: Server::new_async().await,
            mocks: Vec::new(),
        }
    }

    /// Base URL of the mock server.
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Mutable access to the mock server for endpoints created after `build()`.
    pub fn server(&mut self) -> &mut ServerGuard {
        &mut self.server
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}
