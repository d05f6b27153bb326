//! Integration tests for the login and session resolution flow.

mod helpers;

use crmdesk_auth::jwt::TokenDecoder;
use crmdesk_auth::rbac::require_authenticated;
use crmdesk_auth::SessionResolver;
use crmdesk_core::config::auth::AuthConfig;
use crmdesk_core::error::ErrorKind;
use crmdesk_database::repositories::StaffRepository;
use crmdesk_entity::staff::Role;
use crmdesk_service::AuthService;

use helpers::TestApp;

fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "integration-test-secret".to_string(),
        token_ttl_minutes: 60,
    }
}

#[tokio::test]
async fn test_login_issues_resolvable_credential() {
    let app = TestApp::new().await;
    let staff = app.create_staff("ines", "password123", Role::Sales).await;
    let auth = AuthService::new(&auth_config());

    let mut uow = app.uow().await;
    let (token, principal) = auth.login(&mut uow, "ines", "password123").await.unwrap();
    uow.commit().await.unwrap();
    assert_eq!(principal.id, staff.id);

    let resolver = SessionResolver::new(TokenDecoder::new(&auth_config()));
    let mut uow = app.uow().await;
    let resolved = resolver.resolve(uow.conn(), Some(&token)).await.unwrap();
    uow.commit().await.unwrap();

    let resolved = resolved.expect("credential should resolve");
    assert_eq!(resolved.id, staff.id);
    assert_eq!(resolved.role, Role::Sales);
}

#[tokio::test]
async fn test_login_accepts_email_identifier() {
    let app = TestApp::new().await;
    app.create_staff("malik", "password123", Role::Support).await;
    let auth = AuthService::new(&auth_config());

    let mut uow = app.uow().await;
    let result = auth
        .login(&mut uow, "malik@example.com", "password123")
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_login_wrong_password_is_uniform_failure() {
    let app = TestApp::new().await;
    app.create_staff("ines", "password123", Role::Sales).await;
    let auth = AuthService::new(&auth_config());

    let mut uow = app.uow().await;
    let err = auth.login(&mut uow, "ines", "wrong").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotAuthenticated);

    let err = auth.login(&mut uow, "nobody", "password123").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotAuthenticated);
    assert_eq!(err.message, "Invalid credentials");
}

#[tokio::test]
async fn test_missing_credential_is_not_authenticated_never_forbidden() {
    let app = TestApp::new().await;
    let resolver = SessionResolver::new(TokenDecoder::new(&auth_config()));

    let mut uow = app.uow().await;
    let resolved = resolver.resolve(uow.conn(), None).await.unwrap();
    assert!(resolved.is_none());

    // Even for a management-only operation, the failure is the
    // authentication gate, not the role gate.
    let err = require_authenticated(resolved).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotAuthenticated);
}

#[tokio::test]
async fn test_deleted_identity_no_longer_resolves() {
    let app = TestApp::new().await;
    let staff = app.create_staff("ghost", "password123", Role::Support).await;
    let auth = AuthService::new(&auth_config());

    let mut uow = app.uow().await;
    let (token, _) = auth.login(&mut uow, "ghost", "password123").await.unwrap();
    uow.commit().await.unwrap();

    let mut uow = app.uow().await;
    StaffRepository::delete(uow.conn(), staff.id).await.unwrap();
    uow.commit().await.unwrap();

    let resolver = SessionResolver::new(TokenDecoder::new(&auth_config()));
    let mut uow = app.uow().await;
    let resolved = resolver.resolve(uow.conn(), Some(&token)).await.unwrap();
    assert!(resolved.is_none());
}

#[tokio::test]
async fn test_credential_signed_with_other_secret_does_not_resolve() {
    let app = TestApp::new().await;
    app.create_staff("ines", "password123", Role::Sales).await;

    let other_config = AuthConfig {
        jwt_secret: "some-other-secret".to_string(),
        token_ttl_minutes: 60,
    };
    let auth = AuthService::new(&other_config);
    let mut uow = app.uow().await;
    let (token, _) = auth.login(&mut uow, "ines", "password123").await.unwrap();
    uow.commit().await.unwrap();

    let resolver = SessionResolver::new(TokenDecoder::new(&auth_config()));
    let mut uow = app.uow().await;
    let resolved = resolver.resolve(uow.conn(), Some(&token)).await.unwrap();
    assert!(resolved.is_none());
}
