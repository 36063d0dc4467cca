#![allow(dead_code)]

use httpmock::MockServer;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storefront_gateway_client::{ApiClient, ClientOptions, QueryCache, Storefront};
use tracing_subscriber::fmt::MakeWriter;

/// Storefront whose gateway and backend both point at the mock server.
pub fn storefront(server: &MockServer) -> Storefront {
    storefront_with(server, ClientOptions::default(), None)
}

pub fn storefront_with(
    server: &MockServer,
    options: ClientOptions,
    stale_after: Option<Duration>,
) -> Storefront {
    let gateway = ApiClient::new(&server.base_url(), options.clone()).unwrap();
    let backend = ApiClient::new(
        &server.base_url(),
        ClientOptions {
            timeout: None,
            ..options
        },
    )
    .unwrap();

    Storefront::with_clients(
        Arc::new(gateway),
        Arc::new(backend),
        Arc::new(QueryCache::new(stale_after)),
    )
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Routes events on the current thread into a fresh buffer until the guard drops.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
