//! Wire-level tests of the reqwest transport against a mock provider.

use mofh_client::MofhServerManager;
use mofh_config::{ApiSurface, AuthMode, ProviderConfig};
use mofh_core::{HostingAccount, MofhError, Package};
use mofh_plugin_api::ServerManager;
use std::time::Duration;
use wiremock::matchers::{basic_auth, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ProviderConfig {
    let mut config = ProviderConfig::new("127.0.0.1", "reseller", "secret-key", "cpanel.example.com");
    config.port = Some(server.address().port());
    config.secure = false;
    config
}

fn account() -> HostingAccount {
    HostingAccount::new(
        "example1",
        "example.com",
        "hunter22",
        "owner@example.com",
        Package::new("basic"),
    )
}

#[tokio::test]
async fn test_post_with_basic_auth_and_form_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/json-api/suspendacct.php"))
        .and(basic_auth("reseller", "secret-key"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("user=example1"))
        .and(body_string_contains("reason=Suspended+by+billing+system"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status": 1}"#))
        .expect(1)
        .mount(&server)
        .await;

    let manager = MofhServerManager::new(config_for(&server)).unwrap();
    manager.suspend_account(&account()).await.unwrap();
}

#[tokio::test]
async fn test_get_with_parameter_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json-api/listpkgs.php"))
        .and(query_param("api_user", "reseller"))
        .and(query_param("api_key", "secret-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"package": ["basic", "pro"]}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.auth_mode = AuthMode::Parameters;
    let manager = MofhServerManager::new(config).unwrap();

    let packages = manager.get_packages().await.unwrap();
    assert_eq!(packages.len(), 2);
}

#[tokio::test]
async fn test_create_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json-api/listpkgs.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"package": ["basic"]}"#))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/json-api/createacct.php"))
        .and(body_string_contains("contactemail=owner%40example.com"))
        .and(body_string_contains("plan=basic"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"status": 1, "vp_username": "mofh_31337000"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let manager = MofhServerManager::new(config_for(&server)).unwrap();
    let mut account = account();
    manager.create_account(&mut account).await.unwrap();

    assert_eq!(account.username, "mofh_31337000");
}

#[tokio::test]
async fn test_server_error_is_not_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/json-api/removeacct.php"))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"status": 1}"#))
        .mount(&server)
        .await;

    let manager = MofhServerManager::new(config_for(&server)).unwrap();
    let err = manager.cancel_account(&account()).await.unwrap_err();

    assert_eq!(err.http_status(), Some(500));
    assert_eq!(err.error_code(), "TRANSPORT_ERROR");
}

#[tokio::test]
async fn test_xml_surface_without_php_extension() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/xml-api/version"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<version><version>1.0.7</version></version>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.surface = ApiSurface::Xml;
    config.php_extension = false;
    let manager = MofhServerManager::new(config).unwrap();

    assert_eq!(manager.provider_version().await.unwrap().as_deref(), Some("1.0.7"));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json-api/listpkgs.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"package": []}"#)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.timeout_secs = 1;
    let manager = MofhServerManager::new(config).unwrap();

    let err = manager.test_connection().await.unwrap_err();

    assert!(matches!(err, MofhError::Transport { status: None, .. }));
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn test_connection_failure_does_not_leak_api_key() {
    const KEY: &str = "SUPERSECRETKEY-4711";

    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut config = ProviderConfig::new("127.0.0.1", "reseller", KEY, "cpanel.example.com");
    config.port = Some(port);
    config.secure = false;
    config.auth_mode = AuthMode::Parameters;
    let manager = MofhServerManager::new(config).unwrap();

    let err = manager.get_packages().await.unwrap_err();

    let MofhError::Transport { status, message, .. } = &err else {
        panic!("expected a transport error, got {:?}", err);
    };
    assert_eq!(*status, None);
    assert!(message.starts_with("connection failed"), "{}", message);
    assert!(!message.contains(KEY), "{}", message);
    assert!(!err.to_string().contains(KEY), "{}", err);
    assert!(!format!("{:?}", err).contains(KEY));
}

#[tokio::test]
async fn test_timeout_with_parameter_auth_does_not_leak_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json-api/version.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"version": "1.0"}"#)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.auth_mode = AuthMode::Parameters;
    config.timeout_secs = 1;
    let manager = MofhServerManager::new(config).unwrap();

    let err = manager.provider_version().await.unwrap_err();

    assert!(matches!(err, MofhError::Transport { status: None, .. }));
    assert!(!err.to_string().contains("secret-key"), "{}", err);
    assert!(!err.to_string().contains("api_key"), "{}", err);
}
