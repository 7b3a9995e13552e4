//! HTTP provider backed by the dashboard REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::trace;

use super::{DataProvider, Resource};
use crate::error::FetchError;

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Fetches resources from the backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
    base_url: String,
    description: String,
}

impl HttpProvider {
    /// Create a new builder for configuring the provider.
    pub fn builder() -> HttpProviderBuilder {
        HttpProviderBuilder::default()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a resource.
    pub fn url(&self, resource: Resource) -> String {
        format!("{}{}", self.base_url, resource.path())
    }
}

#[async_trait]
impl DataProvider for HttpProvider {
    async fn fetch(&self, resource: Resource) -> Result<Value, FetchError> {
        let url = self.url(resource);
        trace!(%url, "GET");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        Ok(response.json::<Value>().await?)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`HttpProvider`].
#[derive(Debug, Default)]
pub struct HttpProviderBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl HttpProviderBuilder {
    /// Set the backend base URL (default: `http://127.0.0.1:5000`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout (default: 3 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the provider.
    pub fn build(self) -> Result<HttpProvider, FetchError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(3));
        let client = Client::builder().timeout(timeout).build()?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let description = format!("api: {base_url}");

        Ok(HttpProvider {
            client,
            base_url,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on an ephemeral port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}/")
    }

    #[test]
    fn test_builder_defaults() {
        let provider = HttpProvider::builder().build().unwrap();
        assert_eq!(provider.base_url(), "http://127.0.0.1:5000");
        assert_eq!(provider.description(), "api: http://127.0.0.1:5000");
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let provider = HttpProvider::builder()
            .base_url("http://soc.internal:8080/")
            .build()
            .unwrap();
        assert_eq!(
            provider.url(Resource::Connections),
            "http://soc.internal:8080/api/connections"
        );
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let base = serve_once("200 OK", r#"{"threats_detected": 42, "alerts": 3, "active_connections": 9}"#).await;
        let provider = HttpProvider::builder().base_url(base).build().unwrap();

        let value = provider.fetch(Resource::Status).await.unwrap();
        assert_eq!(value["threats_detected"], 42);
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let base = serve_once("500 Internal Server Error", r#"{"error": "boom"}"#).await;
        let provider = HttpProvider::builder().base_url(base).build().unwrap();

        let err = provider.fetch(Resource::Threats).await.unwrap_err();
        assert_eq!(err, FetchError::Status(500));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = HttpProvider::builder()
            .base_url(format!("http://{addr}"))
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();

        let err = provider.fetch(Resource::Logs).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Connection(_) | FetchError::Http(_) | FetchError::Timeout
        ));
    }
}
