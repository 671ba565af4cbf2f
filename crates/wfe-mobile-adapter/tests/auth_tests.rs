/*
[INPUT]:  Mock authentication responses
[OUTPUT]: Test results for auth flow
[POS]:    Integration tests - authentication
[UPDATE]: When auth endpoints or flow changes
*/

mod common;

use common::{client_for, setup_mock_server, unreachable_base_url};
use wfe_mobile_adapter::{AuthManager, ClientConfig, WfeClient, WfeError};
use tokio_test::assert_ok;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_auth_manager_creation() {
    let server = setup_mock_server().await;
    let auth_manager = AuthManager::new(client_for(&server));

    assert!(auth_manager.session().is_none());
    assert!(auth_manager.authenticated_client().is_none());
}

#[tokio::test]
async fn test_login_with_text_token() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/auth/basic"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain.jwt.token"))
        .expect(1)
        .mount(&server)
        .await;

    let auth_manager = AuthManager::new(client_for(&server));
    let session = assert_ok!(auth_manager.login("ipetrov", "secret").await);

    assert_eq!(session.token, "plain.jwt.token");
    assert_eq!(session.display_name, "ipetrov");
}

#[tokio::test]
async fn test_wrong_credentials_leave_no_session() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/auth/basic"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
        .expect(1)
        .mount(&server)
        .await;

    let auth_manager = AuthManager::new(client_for(&server));
    let err = auth_manager.login("ipetrov", "wrong").await.unwrap_err();

    assert!(matches!(err, WfeError::Authentication { .. }));
    assert!(auth_manager.sessions().token().is_none());
}

#[tokio::test]
async fn test_unreachable_server_is_authentication_error() {
    let client = assert_ok!(WfeClient::with_config_and_base_url(
        ClientConfig::default(),
        &unreachable_base_url()
    ));
    let auth_manager = AuthManager::new(client);

    let err = auth_manager.login("ipetrov", "secret").await.unwrap_err();
    assert!(err.is_auth_error());
    assert!(!auth_manager.sessions().is_logged_in());
}
