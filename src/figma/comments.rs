//! Request bodies for the Figma comments endpoint.
//!
//! Responses are passed through as raw JSON; only outgoing bodies are typed.

use serde::Serialize;

/// A position on the canvas, in canvas or node-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Offset {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

/// Where a new comment is pinned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClientMeta {
    /// Pinned relative to a node.
    FrameOffset {
        /// Node the comment is attached to.
        node_id: String,
        /// Offset from the node's top-left corner.
        node_offset: Offset,
    },
    /// Pinned at an absolute canvas position.
    Canvas(Offset),
}

/// Body of `POST /files/{key}/comments`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewComment {
    /// Comment text.
    pub message: String,

    /// Pin location (top-level comments only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_meta: Option<ClientMeta>,

    /// Comment being replied to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
}

impl NewComment {
    /// Creates a top-level comment pinned at `(x, y)`, optionally relative to a node.
    #[must_use]
    pub fn pinned(message: impl Into<String>, x: f64, y: f64, node_id: Option<String>) -> Self {
        let offset = Offset { x, y };
        let client_meta = match node_id {
            Some(node_id) => ClientMeta::FrameOffset {
                node_id,
                node_offset: offset,
            },
            None => ClientMeta::Canvas(offset),
        };
        Self {
            message: message.into(),
            client_meta: Some(client_meta),
            comment_id: None,
        }
    }

    /// Creates a reply to an existing comment.
    #[must_use]
    pub fn reply(comment_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            client_meta: None,
            comment_id: Some(comment_id.into()),
        }
    }
}
