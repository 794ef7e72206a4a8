use anyhow::{Context, Result};
use async_trait::async_trait;
use gempa_core::domain::FeedDocument;
use gempa_core::error::FetchError;
use gempa_core::ports::FeedPort;
use std::time::Duration;
use tracing::debug;

/// HTTP feed adapter that implements FeedPort
pub struct HttpFeedAdapter {
    client: reqwest::Client,
    feed_url: String,
    timeout: Duration,
}

impl HttpFeedAdapter {
    pub fn new(feed_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gempa-watch/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            feed_url: feed_url.into(),
            timeout,
        })
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                millis: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Decode a feed body into a document
pub fn decode_feed(body: &[u8]) -> Result<FeedDocument, FetchError> {
    serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))
}

#[async_trait]
impl FeedPort for HttpFeedAdapter {
    async fn fetch_latest(&self) -> Result<FeedDocument, FetchError> {
        debug!("GET {}", self.feed_url);

        let response = self
            .client
            .get(&self.feed_url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        debug!("Received {} bytes from feed", body.len());

        decode_feed(&body)
    }

    async fn probe_asset(&self, url: &str) -> Result<bool, FetchError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one connection with a canned response; yields the request head
    async fn serve_once(response: &'static str) -> Result<(String, JoinHandle<String>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base = format!("http://{}", listener.local_addr()?);

        let server = tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return String::new();
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });

        Ok((base, server))
    }

    #[test]
    fn test_decode_feed_document() {
        let body = br#"{"Infogempa":{"gempa":{
            "DateTime":"2024-01-01T00:00:00+07:00",
            "Wilayah":"Jakarta",
            "Magnitude":"5.5",
            "Kedalaman":"10 km",
            "Lintang":"6.2 LS",
            "Bujur":"106.8 BT",
            "Potensi":"Tidak berpotensi tsunami"
        }}}"#;

        let record = decode_feed(body).unwrap().into_record();
        assert_eq!(record.region, "Jakarta");
        assert_eq!(record.magnitude, "5.5");
    }

    #[test]
    fn test_decode_truncated_body() {
        let err = decode_feed(br#"{"Infogempa":{"gem"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_decode_wrong_shape() {
        let err = decode_feed(br#"{"features":[]}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_adapter_keeps_url() -> Result<()> {
        let url = "http://127.0.0.1:9/autogempa.json";
        let adapter = HttpFeedAdapter::new(url, Duration::from_secs(1))?;
        assert_eq!(adapter.feed_url(), "http://127.0.0.1:9/autogempa.json");
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() -> Result<()> {
        // port 9 (discard) is closed on any sane test machine
        let url = "http://127.0.0.1:9/autogempa.json";
        let adapter = HttpFeedAdapter::new(url, Duration::from_secs(2))?;
        let err = adapter.fetch_latest().await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_) | FetchError::Timeout { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_server_error_status_is_failure() -> Result<()> {
        let (base, server) = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await?;

        let url = format!("{base}/autogempa.json");
        let adapter = HttpFeedAdapter::new(url, Duration::from_secs(5))?;
        let err = adapter.fetch_latest().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(503)));

        let request = server.await?;
        assert!(request.starts_with("GET /autogempa.json"));
        Ok(())
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() -> Result<()> {
        let (base, server) = serve_once(
            concat!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n",
                "Content-Length: 8\r\nConnection: close\r\n\r\nnot json",
            ),
        )
        .await?;

        let url = format!("{base}/autogempa.json");
        let adapter = HttpFeedAdapter::new(url, Duration::from_secs(5))?;
        let err = adapter.fetch_latest().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));

        server.await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_asset_is_unavailable() -> Result<()> {
        let (base, server) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await?;

        let url = format!("{base}/autogempa.json");
        let adapter = HttpFeedAdapter::new(url, Duration::from_secs(5))?;
        let asset = format!("{base}/shakemap.jpg");
        assert!(!adapter.probe_asset(&asset).await?);

        let request = server.await?;
        assert!(request.starts_with("HEAD /shakemap.jpg"));
        Ok(())
    }

    #[tokio::test]
    async fn test_present_asset_is_available() -> Result<()> {
        let (base, server) = serve_once(
            concat!(
                "HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\n",
                "Content-Length: 0\r\nConnection: close\r\n\r\n",
            ),
        )
        .await?;

        let url = format!("{base}/autogempa.json");
        let adapter = HttpFeedAdapter::new(url, Duration::from_secs(5))?;
        let asset = format!("{base}/shakemap.jpg");
        assert!(adapter.probe_asset(&asset).await?);

        server.await?;
        Ok(())
    }
}
