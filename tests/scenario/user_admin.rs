use backoffice::model::user::Role;
use backoffice_test_utils::prelude::*;
use tempfile::TempDir;

use super::{app, identity};

/// Expect role changes to reach the backend and the published listing, and the credential to be
/// persisted when a credential path is configured
#[tokio::test]
async fn admin_updates_role_with_file_credential() -> Result<(), TestError> {
    let dir = TempDir::new()?;
    let path = dir.path().join("credential.json");
    let test = TestBuilder::new()
        .with_exchange_endpoint(TEST_EMAIL, TEST_TOKEN, factory::backend_user("u1", Some("admin")), 1)
        .with_listing_endpoint(
            TEST_TOKEN,
            factory::listing_envelope(vec![
                factory::backend_user("u1", Some("admin")),
                factory::backend_user("u2", Some("user")),
            ]),
            1,
        )
        .with_mock(|server| {
            server
                .mock("PATCH", "/users/u2/role")
                .match_header("authorization", "Bearer tok1")
                .with_status(200)
                .with_body(r#"{"success": true}"#)
                .expect(1)
                .create()
        })
        .build()
        .await?;
    let app = app(
        &test.url(),
        &[("BACKOFFICE_CREDENTIAL_PATH", path.to_str().unwrap())],
    );
    app.bootstrap.handle(Some(identity(TEST_EMAIL))).await;

    app.users.update_role("u2", Role::Seller).await.unwrap();

    let u2 = app
        .store
        .users()
        .into_iter()
        .find(|user| user.id().as_deref() == Some("u2"))
        .unwrap();
    assert_eq!(u2.role, Some(Role::Seller));
    assert!(std::fs::read_to_string(&path)?.contains(TEST_TOKEN));
    test.assert_mocks();

    Ok(())
}
