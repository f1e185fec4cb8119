//! Tests against a running Rocker server.

use rocker::RockerApi;

fn api() -> RockerApi {
    RockerApi::from_env().expect("ROCKER_BASE_URI must point at a Rocker server")
}

#[tokio::test]
#[ignore]
async fn live_server_version() {
    let version = api().server_version().await.expect("server_version failed");
    assert!(!version.is_empty());
}

#[tokio::test]
#[ignore]
async fn live_available_operations() {
    let operations = api()
        .available_operations()
        .await
        .expect("available_operations failed");
    assert!(operations.is_object() || operations.is_array());
}

#[tokio::test]
#[ignore]
async fn live_me_with_env_credentials() {
    let api = api();
    if api.inner().user().is_none() {
        eprintln!("ROCKER_USER not set, skipping");
        return;
    }
    api.me().await.expect("me failed");
}
