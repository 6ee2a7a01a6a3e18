use backoffice::{
    error::{auth::AuthError, Error},
    model::{session::SessionOrigin, user::Role},
    service::bootstrap::BootstrapOutcome,
    store::credential::FALLBACK_TOKEN_PREFIX,
};
use backoffice_test_utils::prelude::*;
use serde_json::json;

use super::{app, identity};

/// Expect a rejected exchange to publish a degraded session with a fallback credential and to
/// fetch no listing
#[tokio::test]
async fn rejected_exchange_degrades_session() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_exchange_response(200, json!({"success": false, "message": "Unknown user"}), 1)
        .with_listing_status(200, 0)
        .build()
        .await?;
    let app = app(&test.url(), &[]);

    let outcome = app.bootstrap.handle(Some(identity(TEST_EMAIL))).await;

    assert_eq!(outcome, BootstrapOutcome::Degraded);
    let credential = app.store.credential().unwrap();
    assert!(credential.is_fallback());
    assert!(credential.token().starts_with(FALLBACK_TOKEN_PREFIX));

    let session = app.session().unwrap();
    assert_eq!(session.origin, SessionOrigin::Degraded);
    assert_eq!(session.role, Role::User);
    assert_eq!(session.email(), TEST_EMAIL);
    assert!(app.store.users().is_empty());
    test.assert_mocks();

    Ok(())
}

/// Expect an unreachable backend to degrade the session the same way
#[tokio::test]
async fn unreachable_backend_degrades_session() -> Result<(), TestError> {
    let app = app(TEST_UNREACHABLE_URL, &[]);

    let outcome = app.bootstrap.handle(Some(identity(TEST_EMAIL))).await;

    assert_eq!(outcome, BootstrapOutcome::Degraded);
    assert!(app.store.credential().unwrap().is_fallback());
    assert!(app.session().unwrap().is_degraded());

    Ok(())
}

/// Expect the fallback credential to never be sent to the backend
#[tokio::test]
async fn fallback_credential_is_not_sent() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_exchange_response(500, json!({"error": "database offline"}), 1)
        .with_mock(|server| server.mock("DELETE", "/users/u2").expect(0).create())
        .build()
        .await?;
    let app = app(&test.url(), &[]);
    app.bootstrap.handle(Some(identity(TEST_EMAIL))).await;

    let result = app.users.delete_user("u2").await;

    // A degraded session is gated as a plain user before the credential is even consulted.
    assert!(matches!(
        result,
        Err(Error::AuthError(AuthError::InsufficientRole { actual: Role::User, .. }))
    ));
    test.assert_mocks();

    Ok(())
}

/// Expect a failed exchange to end the session when fallback sessions are disabled
#[tokio::test]
async fn disabled_fallback_signs_out() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_exchange_response(200, json!({"success": false}), 1)
        .build()
        .await?;
    let app = app(&test.url(), &[("BACKOFFICE_ALLOW_FALLBACK_SESSION", "false")]);

    let outcome = app.bootstrap.handle(Some(identity(TEST_EMAIL))).await;

    assert_eq!(outcome, BootstrapOutcome::SignedOut);
    assert_eq!(app.store.credential(), None);
    assert_eq!(app.session(), None);
    test.assert_mocks();

    Ok(())
}
