//! Account and file flows through the endpoint layer.

use crate::common::isolated_client;
use rocker::client::ClientConfig;
use rocker::{RockerApi, SaveFileOptions};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_register_then_upload_and_remove() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(201).set_body_string("{\"id\":7}"))
        .expect(1)
        .mount(&mock_server)
        .await;

    // a@b.se:pw
    Mock::given(method("PUT"))
        .and(path("/file/cat.png"))
        .and(header("Authorization", "basic YUBiLnNlOnB3"))
        .and(query_param("versions[thumb]", "64x64"))
        .and(query_param("base64_decode", "1"))
        .respond_with(ResponseTemplate::new(201).set_body_string("{\"name\":\"7/cat.png\"}"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/file/cat.png"))
        .and(header("Authorization", "basic YUBiLnNlOnB3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut api =
        RockerApi::from_client(isolated_client(mock_server.uri(), ClientConfig::default()));

    let created = api
        .create_user("a@b.se", "a", "pw", Vec::<(String, String)>::new())
        .await
        .unwrap();
    assert!(created.is_created());

    let stored = api
        .upload_file(
            [0x89u8, b'P', b'N', b'G'],
            "cat.png",
            "image/png",
            vec![("thumb".to_string(), "64x64".to_string())],
        )
        .await
        .unwrap();
    let name = stored["name"].as_str().unwrap();
    assert_eq!(name, "7/cat.png");

    let removed = api.remove_file(name).await.unwrap();
    assert_eq!(removed.status(), 204);
}

#[tokio::test]
async fn test_save_file_passes_status_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/file/big.bin"))
        .respond_with(ResponseTemplate::new(413).set_body_string("{\"error\":\"too large\"}"))
        .mount(&mock_server)
        .await;

    let api = RockerApi::from_client(isolated_client(mock_server.uri(), ClientConfig::default()));
    let response = api
        .save_file(
            vec![0u8; 16],
            "big.bin",
            "application/octet-stream",
            SaveFileOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 413);
    assert_eq!(response.body()["error"], "too large");
}
