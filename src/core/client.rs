use crate::core::stream::ChatStream;
use crate::utils::error::{ClientError, Result};
use futures_util::StreamExt;
use reqwest::{header, Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = concat!("storefront-gateway-client/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Overall request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    /// Keep session cookies between requests and send them back.
    pub include_credentials: bool,
    /// Pre-existing session, sent verbatim as the `Cookie` header.
    pub session_cookie: Option<String>,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            include_credentials: true,
            session_cookie: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Thin JSON-over-HTTP client bound to one base URL.
///
/// Every call issues exactly one request and returns the response body as
/// parsed JSON, untouched. Non-2xx answers become [`ClientError::Status`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
    session_cookie: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidConfigValue {
                field: "base_url".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let mut builder = Client::builder()
            .user_agent(options.user_agent.as_str())
            .cookie_store(options.include_credentials);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let session_cookie = if options.include_credentials {
            options.session_cookie
        } else {
            if options.session_cookie.is_some() {
                tracing::warn!("Session cookie ignored because credentials are disabled");
            }
            None
        };

        Ok(Self {
            base_url,
            client: builder.build()?,
            session_cookie,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins path segments onto the base URL, percent-encoding each one, and
    /// appends the query pairs whose value is present.
    pub fn url(&self, segments: &[&str], query: &[(&str, Option<String>)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::ConfigError {
                message: format!("Base URL {} cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);

        let present: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (*k, v)))
            .collect();
        if !present.is_empty() {
            url.query_pairs_mut().extend_pairs(present);
        }

        Ok(url)
    }

    pub async fn get(&self, segments: &[&str], query: &[(&str, Option<String>)]) -> Result<Value> {
        let url = self.url(segments, query)?;
        self.send::<()>(Method::GET, url, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> Result<Value> {
        let url = self.url(segments, &[])?;
        self.send(Method::POST, url, Some(body)).await
    }

    pub async fn post_empty(&self, segments: &[&str]) -> Result<Value> {
        let url = self.url(segments, &[])?;
        self.send::<()>(Method::POST, url, None).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> Result<Value> {
        let url = self.url(segments, &[])?;
        self.send(Method::PUT, url, Some(body)).await
    }

    pub async fn put_empty(&self, segments: &[&str]) -> Result<Value> {
        let url = self.url(segments, &[])?;
        self.send::<()>(Method::PUT, url, None).await
    }

    /// POSTs `body` and hands back the response as a stream of text chunks.
    ///
    /// Only the status line is inspected: an unsuccessful status yields
    /// [`ClientError::StreamFailed`] and the error body is never read.
    pub async fn post_stream<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<ChatStream> {
        let url = self.url(segments, &[])?;
        tracing::debug!("📡 POST {} (stream)", url);

        let response = self
            .with_credentials(self.client.post(url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 Stream response status: {}", status);
        if !status.is_success() {
            return Err(ClientError::StreamFailed {
                status: status.as_u16(),
            });
        }

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(ClientError::from));
        Ok(ChatStream::new(chunks))
    }

    fn with_credentials(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => request.header(header::COOKIE, cookie),
            None => request,
        }
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Value> {
        let path = url.path().to_string();
        tracing::debug!("📡 {} {}", method, url);

        let mut request = self.with_credentials(self.client.request(method.clone(), url));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("📡 {} {} -> {}", method, path, status);

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("📡 Could not read error body of {} {}: {}", method, path, e);
                    String::new()
                }
            };
            return Err(ClientError::Status {
                method: method.to_string(),
                path,
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, ClientOptions::default()).unwrap()
    }

    #[test]
    fn test_url_joins_segments() {
        let url = client("http://localhost:5000")
            .url(&["api", "agent", "thread", "t-1"], &[])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/agent/thread/t-1");
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let url = client("https://shop.example.com/gateway/")
            .url(&["api", "health"], &[])
            .unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/gateway/api/health");
    }

    #[test]
    fn test_url_encodes_segments() {
        let url = client("http://localhost")
            .url(&["api", "orders", "a/b c"], &[])
            .unwrap();
        assert_eq!(url.path(), "/api/orders/a%2Fb%20c");
    }

    #[test]
    fn test_url_skips_absent_query_values() {
        let url = client("http://localhost")
            .url(
                &["api", "rag", "search"],
                &[
                    ("query", Some("red shoes".to_string())),
                    ("max_price", None),
                    ("top_k", Some("3".to_string())),
                ],
            )
            .unwrap();
        assert_eq!(url.query(), Some("query=red+shoes&top_k=3"));

        let url = client("http://localhost")
            .url(&["api", "health"], &[("verbose", None)])
            .unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(ApiClient::new("mailto:shop@example.com", ClientOptions::default()).is_err());
        assert!(matches!(
            ApiClient::new("not a url", ClientOptions::default()),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_truncated_error_body_still_reports_status() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            // promises more bytes than it sends, then hangs up
            let _ = socket
                .write_all(b"HTTP/1.1 502 Bad Gateway\r\nContent-Length: 100\r\n\r\nupstream")
                .await;
        });

        let err = client(&format!("http://{}", addr))
            .get(&["api", "health"], &[])
            .await
            .unwrap_err();

        match err {
            ClientError::Status { status, body, .. } => {
                assert_eq!(status, 502);
                assert_eq!(body, "");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
