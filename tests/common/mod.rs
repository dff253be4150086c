//! Shared test fixtures: an in-memory Figma API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use figma_mcp::figma::{DocumentNode, FigmaApi, FigmaError, FigmaFile, FigmaResult, NewComment};

pub const FILE_KEY: &str = "8SvxepW26v4d0AyyTAw23c";
pub const FILE_URL: &str = "https://www.figma.com/design/8SvxepW26v4d0AyyTAw23c/MyFile";

/// In-memory stand-in for the Figma REST API.
#[derive(Default)]
pub struct FakeFigma {
    pub files: HashMap<String, FigmaFile>,
    /// node id → image URL, as returned by the images endpoint.
    pub thumbnails: HashMap<String, String>,
    /// image URL → base64 data.
    pub images: HashMap<String, String>,
    pub comments: Value,
    pub thumbnail_error: Option<String>,
    pub thumbnail_requests: Mutex<Vec<Vec<String>>>,
    pub posted: Mutex<Vec<(String, NewComment)>>,
}

impl FakeFigma {
    /// A file with two pages (`0:1`, `0:3` nested under a section) and renders for both.
    pub fn with_sample_file() -> Self {
        let document: DocumentNode = serde_json::from_value(json!({
            "id": "0:0",
            "name": "Document",
            "type": "DOCUMENT",
            "children": [
                {"id": "0:1", "name": "Cover", "type": "CANVAS", "children": [
                    {"id": "1:1", "name": "Hero", "type": "FRAME"}
                ]},
                {"id": "0:2", "name": "Section", "type": "SECTION", "children": [
                    {"id": "0:3", "name": "Components", "type": "CANVAS"}
                ]}
            ]
        }))
        .unwrap();

        let mut fake = Self::default();
        fake.files.insert(
            FILE_KEY.to_string(),
            FigmaFile {
                name: "MyFile".to_string(),
                version: "4242".to_string(),
                document,
                thumbnail_url: "https://cdn.test/file.png".to_string(),
                thumbnail_b64: "RklMRQ==".to_string(),
            },
        );
        fake.add_render("0:1", "https://cdn.test/0-1.png", "Q09WRVI=");
        fake.add_render("0:3", "https://cdn.test/0-3.png", "Q09NUA==");
        fake.comments = json!({"comments": [{"id": "1", "message": "Nice"}]});
        fake
    }

    pub fn add_render(&mut self, node_id: &str, url: &str, data: &str) {
        self.thumbnails.insert(node_id.to_string(), url.to_string());
        self.images.insert(url.to_string(), data.to_string());
    }
}

#[async_trait]
impl FigmaApi for FakeFigma {
    async fn fetch_file(&self, key: &str) -> FigmaResult<FigmaFile> {
        self.files
            .get(key)
            .cloned()
            .ok_or_else(|| FigmaError::HttpStatus {
                endpoint: format!("GET /files/{key}"),
                status: 404,
                body: "Not found".to_string(),
            })
    }

    async fn fetch_thumbnails(
        &self,
        _key: &str,
        ids: &[String],
    ) -> FigmaResult<HashMap<String, String>> {
        self.thumbnail_requests.lock().unwrap().push(ids.to_vec());
        if let Some(message) = &self.thumbnail_error {
            return Err(FigmaError::Api {
                message: message.clone(),
            });
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.thumbnails.get(id).map(|url| (id.clone(), url.clone())))
            .collect())
    }

    async fn fetch_comments(&self, _key: &str) -> FigmaResult<Value> {
        Ok(self.comments.clone())
    }

    async fn post_comment(&self, key: &str, comment: &NewComment) -> FigmaResult<Value> {
        self.posted
            .lock()
            .unwrap()
            .push((key.to_string(), comment.clone()));
        Ok(json!({"id": "99", "message": comment.message}))
    }

    async fn download_image(&self, url: &str) -> FigmaResult<String> {
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| FigmaError::HttpStatus {
                endpoint: "image download".to_string(),
                status: 403,
                body: String::new(),
            })
    }
}
