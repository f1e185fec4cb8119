//! Admission control over real HTTP.

use crate::common::{isolated_client, PeakTransport};
use rocker::client::{AdmissionConfig, ClientConfig, InFlightCounter, Request};
use rocker::RockerClient;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(ceiling: usize) -> ClientConfig {
    ClientConfig::builder()
        .with_max_concurrent_requests(ceiling)
        .with_admission(AdmissionConfig::default().with_initial_delay(Duration::from_millis(20)))
        .build()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_clients_share_one_ceiling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/operations"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{\"ok\":true}")
                .set_delay(Duration::from_millis(100)),
        )
        .expect(8)
        .mount(&mock_server)
        .await;

    let counter = Arc::new(InFlightCounter::new());
    let first_transport = PeakTransport::new(&counter);
    let second_transport = PeakTransport::new(&counter);
    let peaks = [
        Arc::clone(&first_transport.peak),
        Arc::clone(&second_transport.peak),
    ];

    let first = RockerClient::with_transport(mock_server.uri(), config(2), first_transport)
        .unwrap()
        .with_counter(Arc::clone(&counter));
    let second = RockerClient::with_transport(mock_server.uri(), config(2), second_transport)
        .unwrap()
        .with_counter(Arc::clone(&counter));

    let mut handles = Vec::new();
    for i in 0..8 {
        let client = if i % 2 == 0 { first.clone() } else { second.clone() };
        handles.push(tokio::spawn(async move {
            client.dispatch(Request::get("operations")).await
        }));
    }

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.body()["ok"], true);
    }

    for peak in peaks {
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }
    assert_eq!(counter.in_flight(), 0);
}

#[tokio::test]
async fn test_submit_callbacks_all_fire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"nick\":\"a\"}"))
        .mount(&mock_server)
        .await;

    let client = isolated_client(mock_server.uri(), config(1));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tx = tx.clone();
            client.submit(Request::get("me"), move |result| {
                let _ = tx.send(result.map(|r| r.status()));
            })
        })
        .collect();
    drop(tx);

    futures::future::join_all(handles).await;

    let mut statuses = Vec::new();
    while let Some(status) = rx.recv().await {
        statuses.push(status.unwrap());
    }
    assert_eq!(statuses, vec![200; 4]);
    assert_eq!(client.in_flight(), 0);
}

#[tokio::test]
async fn test_html_error_page_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/operations"))
        .respond_with(
            ResponseTemplate::new(502).set_body_string("<html><body>Bad Gateway</body></html>"),
        )
        .mount(&mock_server)
        .await;

    let client = isolated_client(mock_server.uri(), config(1));
    let err = client
        .dispatch(Request::get("operations"))
        .await
        .unwrap_err();

    assert!(err.is_parse());
    assert_eq!(err.status(), Some(502));
    assert_eq!(client.in_flight(), 0);
}
