//! Input acquisition: reads an upload from disk or downloads it over HTTP.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::{debug, info};

/// Downloads `url`, failing on a non-success HTTP status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse().with_context(|| format!("invalid URL {url}"))?,
    );

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Returns `true` if `source` should be fetched over HTTP rather than read from disk.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads the raw upload from a local path or an HTTP(S) URL.
#[tracing::instrument(fields(source = %source))]
pub async fn load_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(source) {
        let client = BasicClient::new()?;
        fetch_bytes(&client, source)
            .await
            .with_context(|| format!("failed to download {source}"))?
    } else {
        debug!("Reading local upload");
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read {source}"))?
    };

    info!(bytes = bytes.len(), "Upload loaded");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::{Request, Response, StatusCode};
    use std::env;
    use std::fs;

    /// Answers every request with a fixed status and body.
    struct StaticClient {
        status: StatusCode,
        body: &'static str,
    }

    #[async_trait]
    impl HttpClient for StaticClient {
        async fn execute(&self, _req: Request) -> reqwest::Result<Response> {
            let resp = http::Response::builder()
                .status(self.status)
                .body(self.body)
                .unwrap();
            Ok(Response::from(resp))
        }
    }

    #[tokio::test]
    async fn test_fetch_bytes_returns_body_on_success() {
        let client = StaticClient {
            status: StatusCode::OK,
            body: "Date\n2024-01-01\n",
        };

        let bytes = fetch_bytes(&client, "https://example.com/visitors.csv")
            .await
            .unwrap();
        assert_eq!(bytes, b"Date\n2024-01-01\n");
    }

    #[tokio::test]
    async fn test_fetch_bytes_fails_on_error_status() {
        let client = StaticClient {
            status: StatusCode::NOT_FOUND,
            body: "not found",
        };

        let result = fetch_bytes(&client, "https://example.com/missing.csv").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_invalid_url() {
        let client = StaticClient {
            status: StatusCode::OK,
            body: "",
        };

        assert!(fetch_bytes(&client, "not a url").await.is_err());
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/visitors.csv"));
        assert!(is_remote("http://localhost:8080/visitors.csv"));
        assert!(!is_remote("visitors.csv"));
        assert!(!is_remote("httpdata/visitors.csv"));
    }

    #[tokio::test]
    async fn test_load_local_file() {
        let path = format!("{}/park_visitor_stats_fetch.csv", env::temp_dir().display());
        fs::write(&path, "Date\n2024-01-01\n").unwrap();

        let bytes = load_source(&path).await.unwrap();
        assert_eq!(bytes, b"Date\n2024-01-01\n");

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_missing_file_is_error() {
        assert!(load_source("/nonexistent/visitors.csv").await.is_err());
    }
}
