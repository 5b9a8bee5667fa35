use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clientdesk::config::DashboardOptions;
use clientdesk::error::Error;
use clientdesk::session::{
    FileTokenStore, LoginCredentials, MemoryTokenStore, RegisterRequest, SessionStatus, TokenStore,
};
use clientdesk::Dashboard;

#[derive(Serialize)]
struct Claims {
    sub: String,
    username: String,
    role: String,
    exp: i64,
}

fn make_token(expires_in: i64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    let claims = Claims {
        sub: "u1".to_string(),
        username: "admin".to_string(),
        role: "Admin".to_string(),
        exp: now + expires_in,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap()
}

fn dashboard_for(server: &MockServer, store: Arc<dyn TokenStore>) -> Dashboard {
    let options = DashboardOptions::default().with_api_url(&server.uri());
    Dashboard::with_token_store(options, store)
}

#[tokio::test]
async fn test_login_success() {
    let mock_server = MockServer::start().await;
    let token = make_token(3600);

    Mock::given(method("POST"))
        .and(path("/Utilisateur/login"))
        .and(body_json(json!({
            "username": "admin",
            "password": "secret",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": token,
            "user": {
                "UtilisateurID": "u1",
                "NomUtilisateur": "admin",
                "Role": "Admin",
            },
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let dashboard = dashboard_for(&mock_server, store.clone());

    let user = dashboard
        .session()
        .login(&LoginCredentials {
            username: "admin".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(user.display_name, "admin");
    assert_eq!(user.role, "Admin");

    let session = dashboard.session();
    assert!(session.is_authenticated());
    assert_eq!(session.token(), Some(token.clone()));
    assert_eq!(session.credentials().current(), Some(token.clone()));
    assert_eq!(store.load().unwrap(), Some(token));
}

#[tokio::test]
async fn test_login_rejection_surfaces_the_response_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Utilisateur/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Nom d'utilisateur ou mot de passe incorrect"))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let dashboard = dashboard_for(&mock_server, store.clone());

    let result = dashboard
        .session()
        .login(&LoginCredentials {
            username: "admin".to_string(),
            password: "wrong".to_string(),
        })
        .await;

    match result {
        Err(Error::Auth(message)) => {
            assert!(message.contains("incorrect"));
        }
        other => panic!("expected an auth error, got {:?}", other),
    }

    assert!(!dashboard.session().is_authenticated());
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn test_authenticated_requests_carry_the_bearer_token() {
    let mock_server = MockServer::start().await;
    let token = make_token(3600);

    Mock::given(method("GET"))
        .and(path("/Client"))
        .and(header("Authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "clientId": "c1",
            "type": "Individual",
            "contactLastName": "Smith",
            "phoneNumber": "0600000000",
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token(&token));
    let dashboard = dashboard_for(&mock_server, store);
    dashboard.session().initialize();
    assert!(dashboard.session().is_authenticated());

    let registry = dashboard.registry();
    registry.refresh().await.unwrap();

    assert_eq!(registry.records().len(), 1);
}

#[tokio::test]
async fn test_initialize_restores_a_persisted_file_token() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("session-token");

    let token = make_token(3600);
    std::fs::write(&token_path, &token).unwrap();

    let store = Arc::new(FileTokenStore::new(&token_path));
    let dashboard = dashboard_for(&mock_server, store);

    assert_eq!(dashboard.session().status(), SessionStatus::Initializing);
    dashboard.session().initialize();

    assert_eq!(dashboard.session().status(), SessionStatus::Ready);
    let user = dashboard.session().current_user().unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.display_name, "admin");
}

#[tokio::test]
async fn test_initialize_clears_an_expired_file_token() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("session-token");

    std::fs::write(&token_path, make_token(-60)).unwrap();

    let store = Arc::new(FileTokenStore::new(&token_path));
    let dashboard = dashboard_for(&mock_server, store.clone());
    dashboard.session().initialize();

    assert_eq!(dashboard.session().status(), SessionStatus::Ready);
    assert!(!dashboard.session().is_authenticated());
    assert_eq!(store.load().unwrap(), None);
    assert!(!token_path.exists());
}

#[tokio::test]
async fn test_logout_drops_the_session_everywhere() {
    let mock_server = MockServer::start().await;
    let token = make_token(3600);

    Mock::given(method("POST"))
        .and(path("/Utilisateur/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": token,
            "user": {
                "UtilisateurID": "u1",
                "NomUtilisateur": "admin",
                "Role": "Admin",
            },
        })))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let dashboard = dashboard_for(&mock_server, store.clone());

    dashboard
        .session()
        .login(&LoginCredentials {
            username: "admin".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert!(dashboard.session().is_authenticated());

    dashboard.session().logout();

    assert!(!dashboard.session().is_authenticated());
    assert_eq!(dashboard.session().current_user(), None);
    assert_eq!(dashboard.session().token(), None);
    assert_eq!(dashboard.session().credentials().current(), None);
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn test_register_passes_the_response_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Utilisateur/register"))
        .and(body_json(json!({
            "username": "clerk",
            "password": "secret",
            "role": "User",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "UtilisateurID": "u9",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dashboard = dashboard_for(&mock_server, Arc::new(MemoryTokenStore::new()));

    let body = dashboard
        .session()
        .register(&RegisterRequest {
            username: "clerk".to_string(),
            password: "secret".to_string(),
            role: "User".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(body["UtilisateurID"], "u9");
    // registering does not sign anyone in
    assert!(!dashboard.session().is_authenticated());
}

#[tokio::test]
async fn test_register_rejection_surfaces_the_response_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Utilisateur/register"))
        .respond_with(ResponseTemplate::new(409).set_body_string("Nom d'utilisateur deja pris"))
        .mount(&mock_server)
        .await;

    let dashboard = dashboard_for(&mock_server, Arc::new(MemoryTokenStore::new()));

    let result = dashboard
        .session()
        .register(&RegisterRequest {
            username: "clerk".to_string(),
            password: "secret".to_string(),
            role: "User".to_string(),
        })
        .await;

    match result {
        Err(Error::Auth(message)) => assert!(message.contains("deja pris")),
        other => panic!("expected an auth error, got {:?}", other),
    }
}
