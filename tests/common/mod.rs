use std::net::TcpListener;
use std::time::Duration;

use httpmock::MockServer;
use patent_search_client::{Client, Config};

pub fn init_tracing() {
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Client pointed at `server`, under the same `/api` prefix the real backend uses.
pub fn client(server: &MockServer) -> anyhow::Result<Client> {
    init_tracing();
    Ok(Client::new(Config::from_base_url(&server.url("/api"))?)?)
}

pub fn client_with_timeout(server: &MockServer, timeout: Duration) -> anyhow::Result<Client> {
    init_tracing();
    let config = Config::builder()
        .base_url(server.url("/api").parse::<url::Url>()?)
        .timeout(timeout)
        .build();
    Ok(Client::new(config)?)
}

/// Client pointed at a local port nothing listens on.
pub fn unreachable_client() -> anyhow::Result<Client> {
    init_tracing();
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?.port()
    };
    Ok(Client::new(Config::from_base_url(&format!(
        "http://127.0.0.1:{port}/api"
    ))?)?)
}
