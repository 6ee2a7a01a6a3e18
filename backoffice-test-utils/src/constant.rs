//! Test configuration constants for backend and identity provider setup.
//!
//! These values are placeholders for tests, not real credentials.

/// Email of the identity signed in by most tests.
pub static TEST_EMAIL: &str = "admin@example.com";

/// Backend token issued by mock exchange endpoints.
pub static TEST_TOKEN: &str = "tok1";

/// Path of the token exchange endpoint on the mock backend.
pub static TEST_EXCHANGE_PATH: &str = "/jwt";

/// Path of the user collection on the mock backend.
pub static TEST_USERS_PATH: &str = "/users";

/// Web API key passed to mock identity provider endpoints.
pub static TEST_FIREBASE_API_KEY: &str = "firebase_api_key";

/// Base URL nothing listens on.
///
/// Port 9 (discard) is closed on test hosts, so requests fail at connect time.
pub static TEST_UNREACHABLE_URL: &str = "http://127.0.0.1:9";
