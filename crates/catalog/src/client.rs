//! Catalog client trait and its HTTP implementation.
//!
//! Async HTTP client using `reqwest`; the API key travels per request
//! because one process serves several profiles.

use std::future::Future;
use std::pin::Pin;

use burrow_models::{Access, Game, Upload};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.itch.io";

/// Errors from the catalog client.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog rejected request: {0}")]
    Rejected(String),
}

/// Read access to the remote catalog.
///
/// Implemented by [`HttpCatalog`] in production and by mocks in tests.
pub trait CatalogClient: Send + Sync {
    /// Fetches fresh metadata for a game.
    fn get_game<'a>(
        &'a self,
        access: &'a Access,
        game_id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<Game, CatalogError>> + Send + 'a>>;

    /// Lists every upload of a game, with their current builds.
    fn list_game_uploads<'a>(
        &'a self,
        access: &'a Access,
        game_id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Upload>, CatalogError>> + Send + 'a>>;
}

#[derive(Debug, Deserialize)]
struct GameResponse {
    #[serde(default)]
    errors: Vec<String>,
    game: Option<Game>,
}

#[derive(Debug, Deserialize)]
struct UploadsResponse {
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    uploads: Vec<Upload>,
}

/// Catalog client speaking the JSON HTTP API.
pub struct HttpCatalog {
    http: reqwest::Client,
    base_url: String,
}

impl Default for HttpCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpCatalog {
    /// Creates a client against the public API.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Points the client at another base URL (mirrors, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Performs an authenticated GET request.
    async fn get(&self, endpoint: &str, access: &Access) -> Result<Vec<u8>, CatalogError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut req = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", access.api_key));
        if access.credentials.download_key_id > 0 {
            req = req.query(&[(
                "download_key_id",
                access.credentials.download_key_id.to_string(),
            )]);
        }

        let resp = req.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.bytes().await?.to_vec())
    }
}

impl CatalogClient for HttpCatalog {
    fn get_game<'a>(
        &'a self,
        access: &'a Access,
        game_id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<Game, CatalogError>> + Send + 'a>> {
        Box::pin(async move {
            let body = self.get(&format!("/games/{game_id}"), access).await?;
            let resp: GameResponse = serde_json::from_slice(&body)?;
            if !resp.errors.is_empty() {
                return Err(CatalogError::Rejected(resp.errors.join(", ")));
            }
            resp.game.ok_or_else(|| {
                CatalogError::Rejected(format!("game {game_id} missing from response"))
            })
        })
    }

    fn list_game_uploads<'a>(
        &'a self,
        access: &'a Access,
        game_id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Upload>, CatalogError>> + Send + 'a>> {
        Box::pin(async move {
            let body = self
                .get(&format!("/games/{game_id}/uploads"), access)
                .await?;
            let resp: UploadsResponse = serde_json::from_slice(&body)?;
            if !resp.errors.is_empty() {
                return Err(CatalogError::Rejected(resp.errors.join(", ")));
            }
            Ok(resp.uploads)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_models::GameCredentials;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Starts a one-shot HTTP server answering with `status` and `body`.
    /// The handle resolves to the raw request it received.
    async fn mock_server(status: u16, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let mut request = String::new();
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let n = stream.read(&mut buf).await.unwrap_or(0);
                request = String::from_utf8_lossy(&buf[..n]).into_owned();

                let resp = format!(
                    "HTTP/1.1 {status} OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
            request
        });

        (url, handle)
    }

    fn access(download_key_id: i64) -> Access {
        Access {
            api_key: "secret-key".into(),
            credentials: GameCredentials { download_key_id },
        }
    }

    #[tokio::test]
    async fn get_game_parses_response() {
        let json = r#"{"game":{"id":42,"title":"Overland","url":"https://finji.example.io/overland"}}"#;
        let (url, handle) = mock_server(200, json).await;

        let client = HttpCatalog::new().with_base_url(url);
        let game = client.get_game(&access(0), 42).await.unwrap();

        assert_eq!(game.id, 42);
        assert_eq!(game.title, "Overland");

        let request = handle.await.unwrap();
        assert!(request.starts_with("GET /games/42 "));
        assert!(request.to_lowercase().contains("authorization: bearer secret-key"));
    }

    #[tokio::test]
    async fn list_uploads_sends_download_key() {
        let json = r#"{"uploads":[
            {"id":1,"filename":"a.zip","storage":"build","build":{"id":10}},
            {"id":2,"filename":"b.zip"}
        ]}"#;
        let (url, handle) = mock_server(200, json).await;

        let client = HttpCatalog::new().with_base_url(url);
        let uploads = client.list_game_uploads(&access(77), 42).await.unwrap();

        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0].build.as_ref().unwrap().id, 10);
        assert!(uploads[1].build.is_none());

        let request = handle.await.unwrap();
        assert!(request.starts_with("GET /games/42/uploads?download_key_id=77 "));
    }

    #[tokio::test]
    async fn api_error_status() {
        let (url, handle) = mock_server(401, r#"{"errors":["invalid key"]}"#).await;

        let client = HttpCatalog::new().with_base_url(url);
        let result = client.get_game(&access(0), 42).await;

        match result {
            Err(CatalogError::Api { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid key"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
        handle.abort();
    }

    #[tokio::test]
    async fn errors_in_success_body_are_rejected() {
        let (url, handle) = mock_server(200, r#"{"errors":["game not found"]}"#).await;

        let client = HttpCatalog::new().with_base_url(url);
        let result = client.list_game_uploads(&access(0), 9).await;

        assert!(matches!(result, Err(CatalogError::Rejected(msg)) if msg == "game not found"));
        handle.abort();
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = HttpCatalog::new().with_base_url("http://localhost:9000/");
        assert_eq!(client.base_url, "http://localhost:9000");
    }
}
