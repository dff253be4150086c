//! HTTP client for the Figma REST API.
//!
//! Authenticated requests carry the personal access token in the
//! `X-FIGMA-TOKEN` header. Image downloads go to signed CDN URLs and are sent
//! without it. There are no retries and no timeouts: a hung request hangs the
//! tool call.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::Value;

use super::comments::NewComment;
use super::document::{DocumentNode, FigmaFile};
use super::error::{FigmaError, FigmaResult};
use super::FigmaApi;

/// Base URL of the Figma REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.figma.com/v1";

/// Header carrying the personal access token.
pub const TOKEN_HEADER: &str = "X-FIGMA-TOKEN";

/// Body of `GET /files/{key}`, reduced to the fields we use.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileResponse {
    name: String,
    version: String,
    document: DocumentNode,
    thumbnail_url: String,
}

/// Body of `GET /images/{key}`.
#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    err: Option<String>,
    #[serde(default)]
    images: HashMap<String, Option<String>>,
}

/// Figma REST API client.
#[derive(Debug, Clone)]
pub struct FigmaClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl FigmaClient {
    /// Creates a client against the public Figma API.
    ///
    /// A missing key is not an error here; it is reported by the first
    /// request that needs it.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_API_BASE_URL)
    }

    /// Creates a client against a custom API base URL.
    #[must_use]
    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    /// Returns the API base URL (without trailing slash).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the configured API token.
    ///
    /// # Errors
    ///
    /// Returns [`FigmaError::MissingApiKey`] if no token was configured.
    pub fn resolve_api_key(&self) -> FigmaResult<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(FigmaError::MissingApiKey)
    }

    fn file_url(&self, key: &str) -> String {
        format!("{}/files/{key}", self.base_url)
    }

    fn images_url(&self, key: &str, ids: &[String]) -> String {
        format!(
            "{}/images/{key}?ids={}&format=png&page_size=1",
            self.base_url,
            ids.join(",")
        )
    }

    fn comments_url(&self, key: &str) -> String {
        format!("{}/files/{key}/comments", self.base_url)
    }

    /// Sends an authenticated GET and returns the status and body text.
    async fn get(&self, endpoint: &str, url: &str) -> FigmaResult<(u16, String)> {
        let api_key = self.resolve_api_key()?;
        tracing::debug!(endpoint, "Figma API request");

        let response = self
            .http
            .get(url)
            .header(TOKEN_HEADER, api_key)
            .send()
            .await
            .map_err(|e| FigmaError::transport(endpoint, e))?;

        read_body(endpoint, response).await
    }

    /// Sends an authenticated POST with a JSON body and returns the status and body text.
    async fn post(&self, endpoint: &str, url: &str, body: &NewComment) -> FigmaResult<(u16, String)> {
        let api_key = self.resolve_api_key()?;
        tracing::debug!(endpoint, "Figma API request");

        let response = self
            .http
            .post(url)
            .header(TOKEN_HEADER, api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| FigmaError::transport(endpoint, e))?;

        read_body(endpoint, response).await
    }
}

async fn read_body(endpoint: &str, response: reqwest::Response) -> FigmaResult<(u16, String)> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| FigmaError::transport(endpoint, e))?;
    tracing::trace!(endpoint, status, bytes = body.len(), "Figma API response");
    Ok((status, body))
}

const fn is_success(status: u16) -> bool {
    status >= 200 && status < 300
}

fn check_status(endpoint: &str, status: u16, body: &str) -> FigmaResult<()> {
    if is_success(status) {
        Ok(())
    } else {
        Err(FigmaError::HttpStatus {
            endpoint: endpoint.to_string(),
            status,
            body: body.to_string(),
        })
    }
}

/// Parses a JSON body, failing on non-success status.
fn parse_json_body(endpoint: &str, status: u16, body: &str) -> FigmaResult<Value> {
    check_status(endpoint, status, body)?;
    serde_json::from_str(body).map_err(|e| FigmaError::invalid_response(endpoint, e.to_string()))
}

/// Parses a file body.
///
/// Node trees can nest deeper than serde_json's default recursion limit, so
/// the limit is lifted and the stack grows on demand instead.
fn parse_file_body(endpoint: &str, status: u16, body: &str) -> FigmaResult<FileResponse> {
    check_status(endpoint, status, body)?;

    let mut deserializer = serde_json::Deserializer::from_str(body);
    deserializer.disable_recursion_limit();

    FileResponse::deserialize(serde_stacker::Deserializer::new(&mut deserializer))
        .and_then(|file| deserializer.end().map(|()| file))
        .map_err(|e| FigmaError::invalid_response(endpoint, e.to_string()))
}

/// Parses an images response.
///
/// Figma reports rendering failures through the `err` field, so it is checked
/// before the HTTP status. Ids mapped to `null` are dropped.
fn parse_images_body(
    endpoint: &str,
    status: u16,
    body: &str,
) -> FigmaResult<HashMap<String, String>> {
    let parsed: Result<ImagesResponse, _> = serde_json::from_str(body);

    if let Ok(ImagesResponse {
        err: Some(message), ..
    }) = &parsed
    {
        return Err(FigmaError::Api {
            message: message.clone(),
        });
    }

    check_status(endpoint, status, body)?;

    let response = parsed.map_err(|e| FigmaError::invalid_response(endpoint, e.to_string()))?;

    Ok(response
        .images
        .into_iter()
        .filter_map(|(id, url)| url.map(|url| (id, url)))
        .collect())
}

#[async_trait]
impl FigmaApi for FigmaClient {
    async fn fetch_file(&self, key: &str) -> FigmaResult<FigmaFile> {
        let endpoint = format!("GET /files/{key}");
        let (status, body) = self.get(&endpoint, &self.file_url(key)).await?;
        let file = parse_file_body(&endpoint, status, &body)?;

        let thumbnail_b64 = self.download_image(&file.thumbnail_url).await?;

        Ok(FigmaFile {
            name: file.name,
            version: file.version,
            document: file.document,
            thumbnail_url: file.thumbnail_url,
            thumbnail_b64,
        })
    }

    async fn fetch_thumbnails(
        &self,
        key: &str,
        ids: &[String],
    ) -> FigmaResult<HashMap<String, String>> {
        self.resolve_api_key()?;
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let endpoint = format!("GET /images/{key}");
        let (status, body) = self.get(&endpoint, &self.images_url(key, ids)).await?;
        parse_images_body(&endpoint, status, &body)
    }

    async fn fetch_comments(&self, key: &str) -> FigmaResult<Value> {
        let endpoint = format!("GET /files/{key}/comments");
        let (status, body) = self.get(&endpoint, &self.comments_url(key)).await?;
        parse_json_body(&endpoint, status, &body)
    }

    async fn post_comment(&self, key: &str, comment: &NewComment) -> FigmaResult<Value> {
        let endpoint = format!("POST /files/{key}/comments");
        let (status, body) = self
            .post(&endpoint, &self.comments_url(key), comment)
            .await?;
        parse_json_body(&endpoint, status, &body)
    }

    async fn download_image(&self, url: &str) -> FigmaResult<String> {
        const ENDPOINT: &str = "image download";
        tracing::debug!("Downloading image");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FigmaError::transport(ENDPOINT, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FigmaError::HttpStatus {
                endpoint: ENDPOINT.to_string(),
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FigmaError::transport(ENDPOINT, e))?;

        Ok(BASE64_STANDARD.encode(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_reported() {
        let client = FigmaClient::new(None);
        assert!(matches!(
            client.resolve_api_key(),
            Err(FigmaError::MissingApiKey)
        ));
    }

    #[test]
    fn blank_key_is_reported() {
        let client = FigmaClient::new(Some("   ".to_string()));
        assert!(client.resolve_api_key().is_err());
    }

    #[test]
    fn configured_key_is_returned() {
        let client = FigmaClient::new(Some("figd_abc".to_string()));
        assert_eq!(client.resolve_api_key().unwrap(), "figd_abc");
    }

    #[tokio::test]
    async fn requests_fail_without_key() {
        let client = FigmaClient::new(None);
        let err = client.fetch_comments("abc").await.unwrap_err();
        assert!(matches!(err, FigmaError::MissingApiKey));

        let err = client
            .fetch_thumbnails("abc", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, FigmaError::MissingApiKey));
    }

    #[tokio::test]
    async fn empty_thumbnail_batch_skips_request() {
        // Unroutable base URL: any request would fail.
        let client = FigmaClient::with_base_url(Some("key".to_string()), "http://127.0.0.1:1");
        let urls = client.fetch_thumbnails("abc", &[]).await.unwrap();
        assert!(urls.is_empty());
    }

    #[test]
    fn endpoint_urls() {
        let client = FigmaClient::new(None);
        assert_eq!(client.base_url(), "https://api.figma.com/v1");
        assert_eq!(client.file_url("abc"), "https://api.figma.com/v1/files/abc");
        assert_eq!(
            client.comments_url("abc"),
            "https://api.figma.com/v1/files/abc/comments"
        );
        assert_eq!(
            client.images_url("abc", &["0:1".to_string(), "0:2".to_string()]),
            "https://api.figma.com/v1/images/abc?ids=0:1,0:2&format=png&page_size=1"
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = FigmaClient::with_base_url(None, "http://localhost:8080/v1/");
        assert_eq!(client.file_url("k"), "http://localhost:8080/v1/files/k");
    }

    #[test]
    fn parse_file() {
        let body = r#"{
            "name": "Design System",
            "version": "123456",
            "thumbnailUrl": "https://s3.example.com/thumb.png",
            "document": {"id": "0:0", "name": "Document", "type": "DOCUMENT", "children": []}
        }"#;
        let file = parse_file_body("GET /files/abc", 200, body).unwrap();
        assert_eq!(file.name, "Design System");
        assert_eq!(file.version, "123456");
        assert_eq!(file.thumbnail_url, "https://s3.example.com/thumb.png");
        assert_eq!(file.document.node_type, "DOCUMENT");
    }

    #[test]
    fn parse_file_http_error() {
        let err = parse_file_body("GET /files/abc", 404, r#"{"status":404,"err":"Not found"}"#)
            .unwrap_err();
        assert!(matches!(err, FigmaError::HttpStatus { status: 404, .. }));
    }

    #[test]
    fn parse_file_malformed_body() {
        let err = parse_file_body("GET /files/abc", 200, "<html>").unwrap_err();
        assert!(matches!(err, FigmaError::InvalidResponse { .. }));

        let err = parse_file_body("GET /files/abc", 200, r#"{"name": "x"}"#).unwrap_err();
        assert!(matches!(err, FigmaError::InvalidResponse { .. }));
    }

    #[test]
    fn parse_images_drops_null_urls() {
        let body = r#"{"err": null, "images": {"0:1": "https://img/1.png", "0:2": null}}"#;
        let images = parse_images_body("GET /images/abc", 200, body).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images.get("0:1").map(String::as_str), Some("https://img/1.png"));
        assert!(!images.contains_key("0:2"));
    }

    #[test]
    fn parse_images_reports_api_error() {
        let body = r#"{"err": "Invalid parameter: ids", "status": 400}"#;
        let err = parse_images_body("GET /images/abc", 400, body).unwrap_err();
        assert_eq!(err.to_string(), "Error getting thumbnails: Invalid parameter: ids");
    }

    #[test]
    fn parse_images_api_error_on_success_status() {
        let body = r#"{"err": "Render timeout", "images": {}}"#;
        assert!(matches!(
            parse_images_body("GET /images/abc", 200, body),
            Err(FigmaError::Api { .. })
        ));
    }

    #[test]
    fn parse_images_http_error_without_err_field() {
        let err = parse_images_body("GET /images/abc", 500, "Internal Server Error").unwrap_err();
        assert!(matches!(err, FigmaError::HttpStatus { status: 500, .. }));
    }

    #[test]
    fn parse_comments_passthrough() {
        let body = r#"{"comments": [{"id": "1", "message": "hi"}]}"#;
        let value = parse_json_body("GET /files/abc/comments", 200, body).unwrap();
        assert_eq!(value["comments"][0]["message"], "hi");
    }

    #[test]
    fn parse_comments_http_error_keeps_body() {
        let err = parse_json_body("POST /files/abc/comments", 403, "Forbidden").unwrap_err();
        match err {
            FigmaError::HttpStatus { status, body, .. } => {
                assert_eq!(status, 403);
                assert_eq!(body, "Forbidden");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn nested_file_body(depth: usize) -> String {
        let mut node = r#"{"id":"bottom","name":"Bottom","type":"CANVAS"}"#.to_string();
        for level in (0..depth).rev() {
            node = format!(
                r#"{{"id":"{level}","name":"Group {level}","type":"GROUP","children":[{node}]}}"#
            );
        }
        format!(
            r#"{{"name":"Deep","version":"7","thumbnailUrl":"https://s3.example.com/t.png","document":{node}}}"#
        )
    }

    #[test]
    fn parse_deeply_nested_file() {
        let file = parse_file_body("GET /files/abc", 200, &nested_file_body(200)).unwrap();
        assert_eq!(file.name, "Deep");
        assert_eq!(file.document.id, "0");
        assert_eq!(crate::figma::collect_canvas_ids(&file.document), vec!["bottom"]);
    }

    #[test]
    fn parse_file_trailing_garbage() {
        let body = format!("{} trailing", nested_file_body(1));
        let err = parse_file_body("GET /files/abc", 200, &body).unwrap_err();
        assert!(matches!(err, FigmaError::InvalidResponse { .. }));
    }

    mod http {
        use serde_json::{json, Value};
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;
        use tokio::task::JoinHandle;

        use crate::figma::client::{FigmaClient, TOKEN_HEADER};
        use crate::figma::{FigmaApi, FigmaError, NewComment};

        /// A request as received on the wire.
        struct Captured {
            head: String,
            body: String,
        }

        impl Captured {
            fn request_line(&self) -> &str {
                self.head.lines().next().unwrap_or_default()
            }

            fn header(&self, name: &str) -> Option<&str> {
                self.head.lines().skip(1).find_map(|line| {
                    let (key, value) = line.split_once(':')?;
                    key.trim()
                        .eq_ignore_ascii_case(name)
                        .then(|| value.trim())
                })
            }
        }

        fn client(base_url: &str, api_key: Option<&str>) -> FigmaClient {
            FigmaClient {
                http: reqwest::Client::builder().no_proxy().build().unwrap(),
                api_key: api_key.map(str::to_string),
                base_url: base_url.to_string(),
            }
        }

        /// Serves one response on a loopback port and returns the request it got.
        async fn serve_once(status: u16, body: &'static [u8]) -> (String, JoinHandle<Captured>) {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();

            let handle = tokio::spawn(async move {
                let (mut stream, _) = listener.accept().await.unwrap();

                let mut raw = Vec::new();
                let mut chunk = [0u8; 4096];
                let captured = loop {
                    let n = stream.read(&mut chunk).await.unwrap();
                    assert!(n > 0, "connection closed before request completed");
                    raw.extend_from_slice(&chunk[..n]);

                    let Some(end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
                        continue;
                    };
                    let head = String::from_utf8(raw[..end].to_vec()).unwrap();
                    let length = head
                        .lines()
                        .find_map(|line| {
                            let (key, value) = line.split_once(':')?;
                            key.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if raw.len() >= end + 4 + length {
                        let body = String::from_utf8(raw[end + 4..end + 4 + length].to_vec()).unwrap();
                        break Captured { head, body };
                    }
                };

                let head = format!(
                    "HTTP/1.1 {status} Status\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                stream.write_all(head.as_bytes()).await.unwrap();
                stream.write_all(body).await.unwrap();
                let _ = stream.shutdown().await;

                captured
            });

            (format!("http://{addr}"), handle)
        }

        #[tokio::test]
        async fn get_sends_token_header() {
            let (addr, server) = serve_once(200, br#"{"comments":[]}"#).await;
            let client = client(&format!("{addr}/v1"), Some("figd_test"));

            let comments = client.fetch_comments("abc").await.unwrap();
            assert_eq!(comments, json!({"comments": []}));

            let request = server.await.unwrap();
            assert_eq!(request.request_line(), "GET /v1/files/abc/comments HTTP/1.1");
            assert_eq!(request.header(TOKEN_HEADER), Some("figd_test"));
        }

        #[tokio::test]
        async fn thumbnails_request_query() {
            let (addr, server) =
                serve_once(200, br#"{"err":null,"images":{"0:1":"https://cdn/1.png"}}"#).await;
            let client = client(&addr, Some("figd_test"));

            let ids = vec!["0:1".to_string(), "0:2".to_string()];
            let urls = client.fetch_thumbnails("abc", &ids).await.unwrap();
            assert_eq!(urls.len(), 1);
            assert_eq!(urls["0:1"], "https://cdn/1.png");

            let request = server.await.unwrap();
            assert_eq!(
                request.request_line(),
                "GET /images/abc?ids=0:1,0:2&format=png&page_size=1 HTTP/1.1"
            );
            assert_eq!(request.header(TOKEN_HEADER), Some("figd_test"));
        }

        #[tokio::test]
        async fn post_sends_json_body_and_token() {
            let (addr, server) = serve_once(200, br#"{"id":"99","message":"Looks good"}"#).await;
            let client = client(&addr, Some("figd_test"));

            let comment = NewComment::pinned("Looks good", 10.0, 20.5, Some("1:2".to_string()));
            let created = client.post_comment("abc", &comment).await.unwrap();
            assert_eq!(created["id"], "99");

            let request = server.await.unwrap();
            assert_eq!(request.request_line(), "POST /files/abc/comments HTTP/1.1");
            assert_eq!(request.header(TOKEN_HEADER), Some("figd_test"));
            assert_eq!(request.header("content-type"), Some("application/json"));

            let sent: Value = serde_json::from_str(&request.body).unwrap();
            assert_eq!(
                sent,
                json!({
                    "message": "Looks good",
                    "client_meta": {"node_id": "1:2", "node_offset": {"x": 10.0, "y": 20.5}}
                })
            );
        }

        #[tokio::test]
        async fn reply_body_carries_comment_id() {
            let (addr, server) = serve_once(200, br#"{"id":"100"}"#).await;
            let client = client(&addr, Some("figd_test"));

            client.reply_to_comment("abc", "42", "Thanks").await.unwrap();

            let request = server.await.unwrap();
            let sent: Value = serde_json::from_str(&request.body).unwrap();
            assert_eq!(sent, json!({"message": "Thanks", "comment_id": "42"}));
        }

        #[tokio::test]
        async fn error_status_keeps_body() {
            let (addr, server) = serve_once(403, b"Invalid token").await;
            let client = client(&addr, Some("figd_bad"));

            let err = client.fetch_comments("abc").await.unwrap_err();
            match err {
                FigmaError::HttpStatus { status, body, .. } => {
                    assert_eq!(status, 403);
                    assert_eq!(body, "Invalid token");
                }
                other => panic!("unexpected error: {other}"),
            }
            server.await.unwrap();
        }

        #[tokio::test]
        async fn image_download_is_unauthenticated() {
            let (addr, server) = serve_once(200, b"\x89PNG").await;
            let client = client("http://unused.invalid", Some("figd_test"));

            let data = client.download_image(&format!("{addr}/thumb.png")).await.unwrap();
            assert_eq!(data, "iVBORw==");

            let request = server.await.unwrap();
            assert_eq!(request.request_line(), "GET /thumb.png HTTP/1.1");
            assert_eq!(request.header(TOKEN_HEADER), None);
        }
    }
}
