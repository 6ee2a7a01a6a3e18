use backoffice::{model::user::Role, service::bootstrap::BootstrapOutcome};
use backoffice_test_utils::prelude::*;

use super::{app, identity};

/// Expect a 403 on the listing to leave an empty listing and no session
#[tokio::test]
async fn forbidden_listing_ends_session() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_exchange_endpoint(TEST_EMAIL, TEST_TOKEN, factory::backend_user("u1", Some("admin")), 1)
        .with_listing_status(403, 1)
        .build()
        .await?;
    let app = app(&test.url(), &[]);

    let outcome = app.bootstrap.handle(Some(identity(TEST_EMAIL))).await;

    assert_eq!(outcome, BootstrapOutcome::SignedOut);
    assert_eq!(app.session(), None);
    assert_eq!(app.store.credential(), None);
    assert!(app.store.users().is_empty());
    assert!(app.visible_screens().is_empty());
    test.assert_mocks();

    Ok(())
}

/// Expect a server error on the listing to keep the session with an empty listing
#[tokio::test]
async fn failing_listing_keeps_session() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_exchange_endpoint(TEST_EMAIL, TEST_TOKEN, factory::backend_user("u1", Some("admin")), 1)
        .with_listing_status(500, 1)
        .build()
        .await?;
    let app = app(&test.url(), &[]);

    let outcome = app.bootstrap.handle(Some(identity(TEST_EMAIL))).await;

    assert_eq!(outcome, BootstrapOutcome::Established(Role::Admin));
    assert_eq!(app.session().unwrap().role, Role::Admin);
    assert!(app.store.users().is_empty());
    test.assert_mocks();

    Ok(())
}
