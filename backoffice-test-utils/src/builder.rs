//! Declarative test builder.
//!
//! The builder queues mock endpoints and creates all of them against a fresh mock server during
//! the final `build()` call.

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};

use crate::{
    constant::{TEST_EXCHANGE_PATH, TEST_FIREBASE_API_KEY, TEST_USERS_PATH},
    error::TestError,
    fixtures::factory,
    TestContext,
};

/// Builder for declarative test initialization.
///
/// Endpoint shortcuts cover the token exchange, the user listing and the identity provider;
/// anything else can be mocked directly with [`TestBuilder::with_mock`].
pub struct TestBuilder {
    mock_builders: Vec<Box<dyn FnOnce(&mut ServerGuard) -> Mock>>,

    exchange_endpoints: Vec<(String, Value, usize)>, // (email, response body, expected_requests)
    exchange_responses: Vec<(usize, Value, usize)>,  // (status, response body, expected_requests)
    listing_endpoints: Vec<(String, Value, usize)>,  // (bearer token, response body, expected_requests)
    listing_statuses: Vec<(usize, usize)>,           // (status, expected_requests)
    identity_endpoints: Vec<(String, usize, Value, usize)>, // (method, status, body, expected_requests)
}

impl TestBuilder {
    /// Create a new TestBuilder with no mock endpoints configured.
    pub fn new() -> Self {
        Self {
            mock_builders: Vec::new(),
            exchange_endpoints: Vec::new(),
            exchange_responses: Vec::new(),
            listing_endpoints: Vec::new(),
            listing_statuses: Vec::new(),
            identity_endpoints: Vec::new(),
        }
    }

    /// Add a custom mock endpoint.
    ///
    /// # Arguments
    /// - `builder` - Closure creating the mock against the server during `build()`
    ///
    /// # Example
    ///
    /// ```ignore
    /// let test = TestBuilder::new()
    ///     .with_mock(|server| server.mock("DELETE", "/users/u2").with_status(204).create())
    ///     .build()
    ///     .await?;
    /// ```
    pub fn with_mock<F>(mut self, builder: F) -> Self
    where
        F: FnOnce(&mut ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(builder));
        self
    }

    /// Add a successful token exchange endpoint for `email`.
    ///
    /// Matches POST [`TEST_EXCHANGE_PATH`] with the JSON body `{"email": email}` and responds with
    /// a success envelope carrying `token` and `user`.
    ///
    /// # Arguments
    /// - `email` - Email the request body must carry
    /// - `token` - Backend token to issue
    /// - `user` - Backend user record to return
    /// - `expected_requests` - Number of requests the endpoint expects
    pub fn with_exchange_endpoint(
        mut self,
        email: &str,
        token: &str,
        user: Value,
        expected_requests: usize,
    ) -> Self {
        self.exchange_endpoints.push((
            email.to_string(),
            factory::exchange_envelope(token, user),
            expected_requests,
        ));
        self
    }

    /// Add a token exchange endpoint answering any request with `status` and `body`.
    pub fn with_exchange_response(
        mut self,
        status: usize,
        body: Value,
        expected_requests: usize,
    ) -> Self {
        self.exchange_responses
            .push((status, body, expected_requests));
        self
    }

    /// Add a user listing endpoint requiring `Authorization: Bearer {token}`.
    ///
    /// # Arguments
    /// - `token` - Bearer token the request must carry
    /// - `body` - Listing body to respond with (bare array or envelope)
    /// - `expected_requests` - Number of requests the endpoint expects
    pub fn with_listing_endpoint(
        mut self,
        token: &str,
        body: Value,
        expected_requests: usize,
    ) -> Self {
        self.listing_endpoints
            .push((token.to_string(), body, expected_requests));
        self
    }

    /// Add a user listing endpoint answering any request with `status`.
    ///
    /// Successful statuses respond with an empty listing, others with an error body.
    pub fn with_listing_status(mut self, status: usize, expected_requests: usize) -> Self {
        self.listing_statuses.push((status, expected_requests));
        self
    }

    /// Add an identity provider endpoint for `accounts:{method}`.
    ///
    /// # Arguments
    /// - `method` - Identity Toolkit method, e.g. `signUp` or `signInWithPassword`
    /// - `status` - Response status
    /// - `body` - Response body
    /// - `expected_requests` - Number of requests the endpoint expects
    pub fn with_identity_endpoint(
        mut self,
        method: &str,
        status: usize,
        body: Value,
        expected_requests: usize,
    ) -> Self {
        self.identity_endpoints
            .push((method.to_string(), status, body, expected_requests));
        self
    }

    /// Build the test context, creating every queued mock endpoint.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Mock server with all endpoints created
    /// - `Err(TestError::Json)` - A response body failed to serialize
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut context = TestContext::new().await;
        let server = &mut context.server;
        let mut mocks = Vec::new();

        for (email, body, expected) in self.exchange_endpoints {
            mocks.push(
                server
                    .mock("POST", TEST_EXCHANGE_PATH)
                    .match_body(Matcher::Json(json!({ "email": email })))
                    .with_status(200)
                    .with_header("content-type", "application/json")
                    .with_body(serde_json::to_string(&body)?)
                    .expect(expected)
                    .create(),
            );
        }

        for (status, body, expected) in self.exchange_responses {
            mocks.push(
                server
                    .mock("POST", TEST_EXCHANGE_PATH)
                    .with_status(status)
                    .with_header("content-type", "application/json")
                    .with_body(serde_json::to_string(&body)?)
                    .expect(expected)
                    .create(),
            );
        }

        for (token, body, expected) in self.listing_endpoints {
            mocks.push(
                server
                    .mock("GET", TEST_USERS_PATH)
                    .match_header("authorization", format!("Bearer {}", token).as_str())
                    .with_status(200)
                    .with_header("content-type", "application/json")
                    .with_body(serde_json::to_string(&body)?)
                    .expect(expected)
                    .create(),
            );
        }

        for (status, expected) in self.listing_statuses {
            let body = if (200..300).contains(&status) {
                json!([])
            } else {
                json!({ "error": format!("listing failed with status {}", status) })
            };

            mocks.push(
                server
                    .mock("GET", TEST_USERS_PATH)
                    .with_status(status)
                    .with_header("content-type", "application/json")
                    .with_body(serde_json::to_string(&body)?)
                    .expect(expected)
                    .create(),
            );
        }

        for (method, status, body, expected) in self.identity_endpoints {
            mocks.push(
                server
                    .mock("POST", format!("/accounts:{}", method).as_str())
                    .match_query(Matcher::UrlEncoded(
                        "key".to_string(),
                        TEST_FIREBASE_API_KEY.to_string(),
                    ))
                    .with_status(status)
                    .with_header("content-type", "application/json")
                    .with_body(serde_json::to_string(&body)?)
                    .expect(expected)
                    .create(),
            );
        }

        for builder in self.mock_builders {
            mocks.push(builder(server));
        }

        context.mocks = mocks;

        Ok(context)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::TestBuilder;
    use crate::{error::TestError, fixtures::factory};

    /// Expect every queued shortcut and custom mock to be created
    #[tokio::test]
    async fn creates_queued_mocks() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_exchange_endpoint("a@x.com", "tok1", factory::backend_user("u1", None), 0)
            .with_exchange_response(500, json!({"error": "down"}), 0)
            .with_listing_endpoint("tok1", json!([]), 0)
            .with_listing_status(403, 0)
            .with_identity_endpoint("signUp", 200, json!({}), 0)
            .with_mock(|server| server.mock("DELETE", "/users/u1").expect(0).create())
            .build()
            .await?;

        assert_eq!(test.mocks.len(), 6);
        assert!(test.url().starts_with("http://"));
        test.assert_mocks();

        Ok(())
    }

    /// Expect an empty builder to yield a server without mocks
    #[tokio::test]
    async fn builds_empty_context() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;

        assert!(test.mocks.is_empty());

        Ok(())
    }
}
