//! Credential headers as the server sees them.

use crate::common::isolated_client;
use rocker::auth::{cipher, encoding, text, UserOptions};
use rocker::client::{ClientConfig, Request};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_rc4_header_decrypts_to_user_and_password() {
    let mock_server = MockServer::start().await;

    let token = encoding::encode(cipher::encrypt(&text::encode("k"), b"a:b").unwrap());
    let expected = format!("rc4 {}", token);

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("Authorization", expected.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"nick\":\"a\"}"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = isolated_client(mock_server.uri(), ClientConfig::default());
    client.set_secret("k").unwrap();
    client.set_user("a", "b").unwrap();

    let response = client.dispatch(Request::get("me").with_auth()).await.unwrap();
    assert_eq!(response.status(), 200);

    let decrypted = cipher::decrypt(b"k", &encoding::decode(&token).unwrap()).unwrap();
    assert_eq!(decrypted, b"a:b");
}

#[tokio::test]
async fn test_custom_mechanism_without_encoding() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("Authorization", "token a:b"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = isolated_client(mock_server.uri(), ClientConfig::default());
    client
        .set_user_with(
            "a",
            "b",
            UserOptions::default()
                .with_mechanism("token")
                .without_encoding(),
        )
        .unwrap();

    client.dispatch(Request::get("me").with_auth()).await.unwrap();
}

#[tokio::test]
async fn test_cleared_credentials_send_no_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"error\":\"auth\"}"))
        .mount(&mock_server)
        .await;

    let mut client = isolated_client(mock_server.uri(), ClientConfig::default());
    client.set_user("a", "b").unwrap();
    client.clear_credentials();

    let response = client.dispatch(Request::get("me").with_auth()).await.unwrap();
    assert_eq!(response.status(), 401);

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}
