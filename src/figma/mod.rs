//! Figma REST API access.
//!
//! This module provides the pieces the MCP tools are built from:
//!
//! - [`FigmaApi`]: the operations the tools need, as an async trait
//! - [`FigmaClient`]: the HTTP implementation against `api.figma.com`
//! - [`parse_file_key`]: file key extraction from Figma links
//! - [`collect_canvas_ids`]: page discovery in a document tree
//!
//! Comment payloads are passed through as raw JSON. Nothing is cached; every
//! call goes to the network.

pub mod client;
pub mod comments;
pub mod document;
pub mod error;
pub mod url;

pub use client::{FigmaClient, DEFAULT_API_BASE_URL};
pub use comments::{ClientMeta, NewComment, Offset};
pub use document::{collect_canvas_ids, CanvasThumbnail, DocumentNode, FigmaFile, CANVAS_NODE_TYPE};
pub use error::{FigmaError, FigmaResult};
pub use url::parse_file_key;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

/// Operations against the Figma REST API used by the MCP tools.
#[async_trait]
pub trait FigmaApi: Send + Sync {
    /// Fetches a file's document tree and metadata, with its thumbnail inlined.
    async fn fetch_file(&self, key: &str) -> FigmaResult<FigmaFile>;

    /// Fetches rendered PNG URLs for the given node ids in one batch.
    ///
    /// Ids that Figma could not render are absent from the map.
    async fn fetch_thumbnails(&self, key: &str, ids: &[String])
        -> FigmaResult<HashMap<String, String>>;

    /// Fetches all comments on a file.
    async fn fetch_comments(&self, key: &str) -> FigmaResult<Value>;

    /// Posts a comment (or reply) to a file.
    async fn post_comment(&self, key: &str, comment: &NewComment) -> FigmaResult<Value>;

    /// Downloads an image and returns it base64-encoded.
    async fn download_image(&self, url: &str) -> FigmaResult<String>;

    /// Replies to an existing comment.
    async fn reply_to_comment(
        &self,
        key: &str,
        comment_id: &str,
        message: &str,
    ) -> FigmaResult<Value> {
        self.post_comment(key, &NewComment::reply(comment_id, message))
            .await
    }
}

/// Renders and downloads a thumbnail for every page of a document.
///
/// Results follow [`collect_canvas_ids`] order. Pages Figma returned no image
/// for are skipped.
///
/// # Errors
///
/// Returns an error if the batch thumbnail request or any download fails.
pub async fn fetch_canvas_thumbnails(
    api: &dyn FigmaApi,
    key: &str,
    document: &DocumentNode,
) -> FigmaResult<Vec<CanvasThumbnail>> {
    let canvas_ids = collect_canvas_ids(document);
    if canvas_ids.is_empty() {
        return Ok(Vec::new());
    }

    let urls = api.fetch_thumbnails(key, &canvas_ids).await?;

    let mut thumbnails = Vec::with_capacity(urls.len());
    for id in canvas_ids {
        let Some(url) = urls.get(&id) else {
            tracing::debug!(canvas_id = %id, "No thumbnail rendered for canvas");
            continue;
        };
        let data = api.download_image(url).await?;
        thumbnails.push(CanvasThumbnail {
            id,
            url: url.clone(),
            data,
        });
    }

    Ok(thumbnails)
}
