use std::time::Duration;

use backoffice::{
    gate::screens, identity::IdentityNotifier, model::user::Role,
    service::bootstrap::BootstrapOutcome, store::credential::Credential,
};
use backoffice_test_utils::prelude::*;
use serde_json::json;
use tokio::time::timeout;

use super::{app, identity};

/// Expect an admin sign-in to exchange once, fetch the listing once with the bearer token, and
/// publish the merged session and listing
#[tokio::test]
async fn admin_sign_in_publishes_session_and_listing() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_exchange_endpoint(TEST_EMAIL, TEST_TOKEN, factory::backend_user("u1", Some("admin")), 1)
        .with_listing_endpoint(
            TEST_TOKEN,
            factory::listing_envelope(vec![
                factory::backend_user("u1", Some("admin")),
                factory::backend_user("u2", Some("seller")),
            ]),
            1,
        )
        .build()
        .await?;
    let app = app(&test.url(), &[]);

    let outcome = app.bootstrap.handle(Some(identity(TEST_EMAIL))).await;

    assert_eq!(outcome, BootstrapOutcome::Established(Role::Admin));
    assert_eq!(
        app.store.credential(),
        Some(Credential::Bearer(TEST_TOKEN.to_string()))
    );

    let session = app.session().unwrap();
    assert_eq!(session.role, Role::Admin);
    assert!(!session.is_degraded());
    // Backend fields win over identity fields, identity-only fields are kept.
    assert_eq!(session.field("email"), Some(json!("u1@example.com")));
    assert_eq!(session.field("displayName"), Some(json!("Ada Lovelace")));
    assert_eq!(session.field("role"), Some(json!("admin")));

    assert_eq!(app.store.users().len(), 2);
    assert_eq!(app.visible_screens().len(), screens::ALL_SCREENS.len());
    test.assert_mocks();

    Ok(())
}

/// Expect the same flow when driven by identity provider notifications, and sign-out to clear it
#[tokio::test]
async fn follows_identity_provider() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_exchange_endpoint(TEST_EMAIL, TEST_TOKEN, factory::backend_user("u1", Some("moderator")), 1)
        .with_listing_endpoint(TEST_TOKEN, json!([factory::backend_user("u1", Some("moderator"))]), 1)
        .build()
        .await?;
    let app = app(&test.url(), &[]);
    let notifier = IdentityNotifier::new();
    let mut observer = app.subscribe();

    let _listener = app.start_with(notifier.subscribe());

    notifier.publish(Some(identity(TEST_EMAIL)));
    timeout(Duration::from_secs(5), observer.wait_for(|state| !state.users.is_empty()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(app.session().unwrap().role, Role::Moderator);
    assert!(screens::USERS.permits(app.session().as_ref()));
    assert!(!screens::ROLE_ASSIGNMENT.permits(app.session().as_ref()));

    notifier.publish(None);
    timeout(Duration::from_secs(5), observer.wait_for(|state| state.session.is_none()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(app.store.credential(), None);
    assert!(app.store.users().is_empty());
    test.assert_mocks();

    Ok(())
}

/// Expect a seller sign-in to never fetch the listing
#[tokio::test]
async fn seller_sign_in_skips_listing() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_exchange_endpoint(TEST_EMAIL, TEST_TOKEN, factory::backend_user("u3", Some("seller")), 1)
        .with_listing_status(200, 0)
        .build()
        .await?;
    let app = app(&test.url(), &[]);

    let outcome = app.bootstrap.handle(Some(identity(TEST_EMAIL))).await;

    assert_eq!(outcome, BootstrapOutcome::Established(Role::Seller));
    assert!(app.store.users().is_empty());
    assert!(screens::PRODUCTS.permits(app.session().as_ref()));
    assert!(!screens::USERS.permits(app.session().as_ref()));
    test.assert_mocks();

    Ok(())
}
