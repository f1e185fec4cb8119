//! Shared helpers for integration tests.

use rocker::client::{
    ClientConfig, InFlightCounter, RawResponse, ReqwestTransport, Transport, TransportRequest,
};
use rocker::RockerClient;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Client on its own counter, so tests do not see each other's requests.
pub fn isolated_client(uri: String, config: ClientConfig) -> RockerClient {
    RockerClient::with_config(uri, config)
        .expect("Failed to create client")
        .with_counter(Arc::new(InFlightCounter::new()))
}

/// Real HTTP transport that records the highest in-flight count it saw.
pub struct PeakTransport {
    inner: ReqwestTransport,
    counter: Arc<InFlightCounter>,
    pub peak: Arc<AtomicUsize>,
}

impl PeakTransport {
    pub fn new(counter: &Arc<InFlightCounter>) -> Self {
        Self {
            inner: ReqwestTransport::new(&ClientConfig::default())
                .expect("Failed to create transport"),
            counter: Arc::clone(counter),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Transport for PeakTransport {
    async fn send(&self, request: TransportRequest) -> rocker::client::Result<RawResponse> {
        self.peak.fetch_max(self.counter.in_flight(), Ordering::SeqCst);
        self.inner.send(request).await
    }
}
